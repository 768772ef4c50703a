//! # Cube Faces
//!
//! Corner and winding tables shared by the packed mesher and the colored
//! cube builder.
//!
//! ```text
//!        p7 ──────── p8
//!       ╱│          ╱│        +Y
//!     p4 ──────── p3 │         │
//!      │ │        │  │         └── +X
//!      │ p6 ──────│─ p5       ╱
//!      │╱         │ ╱       +Z
//!     p1 ──────── p2
//! ```
//!
//! Every face lists its corners counter-clockwise as seen from outside, so
//! `(c0, c1, c2)` and `(c0, c2, c3)` are front-facing triangles.

/// One of the six cube faces.
///
/// The discriminant is the 3-bit face id stored in packed vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Face {
    /// +Z.
    Front = 0,
    /// -Z.
    Back = 1,
    /// +X.
    Left = 2,
    /// -X.
    Right = 3,
    /// +Y.
    Top = 4,
    /// -Y.
    Bottom = 5,
}

/// Unit cube corners `p1..p8` as sign vectors.
pub(crate) const CORNER_SIGNS: [[i32; 3]; 8] = [
    [-1, -1, 1],  // p1
    [1, -1, 1],   // p2
    [1, 1, 1],    // p3
    [-1, 1, 1],   // p4
    [1, -1, -1],  // p5
    [-1, -1, -1], // p6
    [-1, 1, -1],  // p7
    [1, 1, -1],   // p8
];

impl Face {
    /// All faces in emission order.
    pub const ALL: [Self; 6] = [
        Self::Front,
        Self::Back,
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
    ];

    /// Face id as stored in a packed vertex.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u32 {
        self as u32
    }

    /// Looks up a face by id.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(Self::Front),
            1 => Some(Self::Back),
            2 => Some(Self::Left),
            3 => Some(Self::Right),
            4 => Some(Self::Top),
            5 => Some(Self::Bottom),
            _ => None,
        }
    }

    /// Outward unit normal; also the offset to the neighbor that hides this face.
    #[inline]
    #[must_use]
    pub const fn normal(self) -> [i32; 3] {
        match self {
            Self::Front => [0, 0, 1],
            Self::Back => [0, 0, -1],
            Self::Left => [1, 0, 0],
            Self::Right => [-1, 0, 0],
            Self::Top => [0, 1, 0],
            Self::Bottom => [0, -1, 0],
        }
    }

    /// Indices into the corner table, counter-clockwise from outside.
    #[inline]
    #[must_use]
    pub(crate) const fn corners(self) -> [usize; 4] {
        match self {
            Self::Front => [0, 1, 2, 3],  // p1 p2 p3 p4
            Self::Back => [4, 5, 6, 7],   // p5 p6 p7 p8
            Self::Left => [1, 4, 7, 2],   // p2 p5 p8 p3
            Self::Right => [5, 0, 3, 6],  // p6 p1 p4 p7
            Self::Top => [3, 2, 7, 6],    // p4 p3 p8 p7
            Self::Bottom => [5, 4, 1, 0], // p6 p5 p2 p1
        }
    }

    /// Atlas cell offsets added to each corner's `(u, v)`.
    ///
    /// Side faces flip `v` so the texture stands upright.
    #[inline]
    #[must_use]
    pub(crate) const fn uv_offsets(self) -> [[u32; 2]; 4] {
        match self {
            Self::Top | Self::Bottom => [[0, 0], [1, 0], [1, 1], [0, 1]],
            _ => [[0, 1], [1, 1], [1, 0], [0, 0]],
        }
    }

    /// Baked directional shading for flat-colored cubes.
    #[inline]
    #[must_use]
    pub const fn brightness(self) -> f32 {
        match self {
            Self::Front | Self::Back => 0.86,
            Self::Left | Self::Right => 0.8,
            Self::Top => 1.0,
            Self::Bottom => 0.7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corner(i: usize) -> [i32; 3] {
        CORNER_SIGNS[i]
    }

    #[test]
    fn test_ids_roundtrip() {
        for face in Face::ALL {
            assert_eq!(Face::from_id(face.id()), Some(face));
        }
        assert_eq!(Face::from_id(6), None);
        assert_eq!(Face::from_id(7), None);
    }

    #[test]
    fn test_corners_lie_on_face() {
        for face in Face::ALL {
            let n = face.normal();
            for c in face.corners() {
                let p = corner(c);
                let along = p[0] * n[0] + p[1] * n[1] + p[2] * n[2];
                assert_eq!(along, 1, "{face:?} corner p{} is not on the face", c + 1);
            }
        }
    }

    #[test]
    fn test_winding_points_outward() {
        for face in Face::ALL {
            let [a, b, c, _] = face.corners().map(corner);
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let cross = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let n = face.normal();
            let dot = cross[0] * n[0] + cross[1] * n[1] + cross[2] * n[2];
            assert!(dot > 0, "{face:?} winds inward");
        }
    }
}
