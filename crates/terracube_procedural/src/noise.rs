//! # Simplex Noise
//!
//! 2D simplex noise driven by a seeded permutation table. Same seed, same
//! values, on every platform: the shuffle uses a fixed xorshift stream.

/// World seed for deterministic generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for one purpose (heightmap, detail, ...).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0 ^ purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

/// Gradient directions for 2D simplex corners.
const GRADIENTS: [[f64; 2]; 8] = [
    [1.0, 0.0],
    [-1.0, 0.0],
    [0.0, 1.0],
    [0.0, -1.0],
    [1.0, 1.0],
    [-1.0, 1.0],
    [1.0, -1.0],
    [-1.0, -1.0],
];

/// 2D simplex noise generator with values in `[-1, 1]`.
pub struct SimplexNoise {
    /// 256-entry permutation, doubled so lookups never wrap.
    perm: [u8; 512],
}

impl SimplexNoise {
    /// Skew factor `(sqrt(3) - 1) / 2`.
    const SKEW: f64 = 0.366_025_403_784_438_6;
    /// Unskew factor `(3 - sqrt(3)) / 6`.
    const UNSKEW: f64 = 0.211_324_865_405_187_1;
    /// Normalizes the summed corner contributions to `[-1, 1]`.
    const SCALE: f64 = 70.0;

    /// Builds the permutation table for `seed`.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        let mut table: [u8; 256] = std::array::from_fn(|i| i as u8);

        // Fisher-Yates over a xorshift64 stream; zero would stall the stream.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }

        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);
        Self { perm }
    }

    #[inline]
    fn hash(&self, i: i32, j: i32) -> usize {
        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        self.perm[ii + self.perm[jj] as usize] as usize
    }

    #[inline]
    fn corner(&self, x: f64, y: f64, hash: usize) -> f64 {
        let falloff = 0.5 - x * x - y * y;
        if falloff <= 0.0 {
            return 0.0;
        }
        let grad = GRADIENTS[hash & 7];
        let f2 = falloff * falloff;
        f2 * f2 * (grad[0] * x + grad[1] * y)
    }

    /// Samples noise at `(x, y)`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::SKEW;
        let i = (x + skew).floor() as i32;
        let j = (y + skew).floor() as i32;

        let unskew = f64::from(i + j) * Self::UNSKEW;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Lower or upper triangle of the skewed cell.
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::UNSKEW;
        let y1 = y0 - f64::from(j1) + Self::UNSKEW;
        let x2 = x0 - 1.0 + 2.0 * Self::UNSKEW;
        let y2 = y0 - 1.0 + 2.0 * Self::UNSKEW;

        let n0 = self.corner(x0, y0, self.hash(i, j));
        let n1 = self.corner(x1, y1, self.hash(i + i1, j + j1));
        let n2 = self.corner(x2, y2, self.hash(i + 1, j + 1));

        (Self::SCALE * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    /// Fractal noise: `octaves` layers, each at double the frequency and
    /// `persistence` times the amplitude of the previous one.
    ///
    /// Normalized back to `[-1, 1]`.
    #[must_use]
    pub fn fractal(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut norm = 0.0;

        for _ in 0..octaves {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            norm += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if norm > 0.0 {
            total / norm
        } else {
            0.0
        }
    }
}
