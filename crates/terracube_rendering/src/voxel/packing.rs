//! # Packed Vertex Codec
//!
//! One `u32` per vertex:
//!
//! ```text
//!  31 30      26 25      21 20  18 17     12 11      6 5       0
//! ┌──┬──────────┬──────────┬──────┬─────────┬─────────┬─────────┐
//! │ 0│    v     │    u     │ face │    z    │    y    │    x    │
//! └──┴──────────┴──────────┴──────┴─────────┴─────────┴─────────┘
//! ```
//!
//! Positions are stored as `coord + COORD_OFFSET` in 6 bits, so every value
//! in `-32..=31` round-trips exactly. Out-of-range inputs are truncated by
//! the masks, never rejected. Bit 31 is always zero.

use bytemuck::{Pod, Zeroable};

use super::face::Face;

/// Added to each position component before masking.
pub const COORD_OFFSET: i32 = 32;

const POS_MASK: u32 = 0x3F;
const FACE_MASK: u32 = 0x7;
const UV_MASK: u32 = 0x1F;

const Y_SHIFT: u32 = 6;
const Z_SHIFT: u32 = 12;
const FACE_SHIFT: u32 = 18;
const U_SHIFT: u32 = 21;
const V_SHIFT: u32 = 26;

/// Face id, u and v bits.
const SURFACE_BITS: u32 = (FACE_MASK << FACE_SHIFT) | (UV_MASK << U_SHIFT) | (UV_MASK << V_SHIFT);

/// Encodes a vertex.
///
/// `face` is the 3-bit face id (see [`Face::id`]); `u` and `v` are atlas cell
/// coordinates in `0..32`.
#[inline]
#[must_use]
pub const fn pack(x: i32, y: i32, z: i32, face: u32, u: u32, v: u32) -> u32 {
    let px = (x + COORD_OFFSET) as u32 & POS_MASK;
    let py = (y + COORD_OFFSET) as u32 & POS_MASK;
    let pz = (z + COORD_OFFSET) as u32 & POS_MASK;
    px | (py << Y_SHIFT) | (pz << Z_SHIFT) | surface_bits(face, u, v)
}

/// Replaces face id, u and v, keeping the position bits.
#[inline]
#[must_use]
pub const fn update_face_and_uv(packed: u32, face: u32, u: u32, v: u32) -> u32 {
    (packed & !SURFACE_BITS) | surface_bits(face, u, v)
}

#[inline]
const fn surface_bits(face: u32, u: u32, v: u32) -> u32 {
    ((face & FACE_MASK) << FACE_SHIFT) | ((u & UV_MASK) << U_SHIFT) | ((v & UV_MASK) << V_SHIFT)
}

/// Decoded fields of a packed vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackedVertex {
    /// Position X, offset removed.
    pub x: i32,
    /// Position Y, offset removed.
    pub y: i32,
    /// Position Z, offset removed.
    pub z: i32,
    /// Raw 3-bit face id.
    pub face: u32,
    /// Atlas u.
    pub u: u32,
    /// Atlas v.
    pub v: u32,
}

impl UnpackedVertex {
    /// Face, if the id is one of the six valid ones.
    #[inline]
    #[must_use]
    pub const fn face(&self) -> Option<Face> {
        Face::from_id(self.face)
    }
}

/// Decodes a vertex.
#[inline]
#[must_use]
pub const fn unpack(packed: u32) -> UnpackedVertex {
    UnpackedVertex {
        x: (packed & POS_MASK) as i32 - COORD_OFFSET,
        y: ((packed >> Y_SHIFT) & POS_MASK) as i32 - COORD_OFFSET,
        z: ((packed >> Z_SHIFT) & POS_MASK) as i32 - COORD_OFFSET,
        face: (packed >> FACE_SHIFT) & FACE_MASK,
        u: (packed >> U_SHIFT) & UV_MASK,
        v: (packed >> V_SHIFT) & UV_MASK,
    }
}

// =============================================================================
// GPU VERTEX
// =============================================================================

/// A packed vertex as it sits in a vertex buffer.
///
/// The shader reads it as a single `u32` at location 0 and unpacks it with
/// the same shifts and masks as [`unpack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct PackedVertex(pub u32);

impl PackedVertex {
    /// Vertex attributes: the whole word at location 0.
    pub const ATTRIBS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![
        0 => Uint32,  // packed position | face | uv
    ];

    /// Packs a vertex.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32, face: Face, u: u32, v: u32) -> Self {
        Self(pack(x, y, z, face.id(), u, v))
    }

    /// Decodes this vertex.
    #[inline]
    #[must_use]
    pub const fn unpack(self) -> UnpackedVertex {
        unpack(self.0)
    }

    /// Raw packed word.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_vertex() {
        assert_eq!(pack(0, 0, 0, 0, 0, 0), 32 | (32 << 6) | (32 << 12));
        assert_eq!(
            unpack(pack(0, 0, 0, 0, 0, 0)),
            UnpackedVertex { x: 0, y: 0, z: 0, face: 0, u: 0, v: 0 }
        );
    }

    const POSITION_BITS: u32 = 0x3_FFFF;

    #[test]
    fn test_every_position_roundtrips() {
        for z in -32i32..=31 {
            for y in -32..=31 {
                for x in -32..=31 {
                    let face = (x + y + z).rem_euclid(6) as u32;
                    let u = (x + 32) as u32 % 32;
                    let v = (z + 32) as u32 % 32;
                    let got = unpack(pack(x, y, z, face, u, v));
                    assert_eq!(got, UnpackedVertex { x, y, z, face, u, v });
                }
            }
        }
    }

    #[test]
    fn test_every_face_and_uv_roundtrips() {
        for (x, y, z) in [(-32, -32, -32), (31, 31, 31), (-1, 0, 17), (5, -20, 31)] {
            for face in 0..6 {
                for u in 0..32 {
                    for v in 0..32 {
                        let got = unpack(pack(x, y, z, face, u, v));
                        assert_eq!(got, UnpackedVertex { x, y, z, face, u, v });
                    }
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_truncates() {
        // 32 + 32 = 64 wraps to 0 in six bits.
        assert_eq!(unpack(pack(32, 0, 0, 0, 0, 0)).x, -32);
        // u = 33 keeps its low five bits.
        assert_eq!(unpack(pack(0, 0, 0, 0, 33, 0)).u, 1);
        // face 9 keeps its low three bits.
        assert_eq!(unpack(pack(0, 0, 0, 9, 0, 0)).face, 1);
    }

    #[test]
    fn test_top_bit_clear() {
        let packed = pack(-32, 31, -1, 7, 31, 31);
        assert_eq!(packed >> 31, 0);
    }

    #[test]
    fn test_update_keeps_position() {
        let original = pack(-7, 12, 31, Face::Front.id(), 3, 0);
        let updated = update_face_and_uv(original, Face::Bottom.id(), 2, 9);
        let v = unpack(updated);
        assert_eq!((v.x, v.y, v.z), (-7, 12, 31));
        assert_eq!(v.face(), Some(Face::Bottom));
        assert_eq!((v.u, v.v), (2, 9));
    }

    #[test]
    fn test_update_keeps_position_everywhere() {
        for z in [-32, -1, 0, 31] {
            for y in -32..=31 {
                for x in -32..=31 {
                    let original = pack(x, y, z, 7, 31, 31);
                    for face in 0..6 {
                        for u in 0..32 {
                            let v = 31 - u;
                            let updated = update_face_and_uv(original, face, u, v);
                            assert_eq!(updated & POSITION_BITS, original & POSITION_BITS);
                            assert_eq!(unpack(updated), UnpackedVertex { x, y, z, face, u, v });
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_update_clears_old_fields() {
        let original = pack(1, 2, 3, 7, 31, 31);
        let v = unpack(update_face_and_uv(original, 0, 0, 0));
        assert_eq!((v.face, v.u, v.v), (0, 0, 0));
    }

    #[test]
    fn test_newtype_matches_free_fn() {
        let vertex = PackedVertex::new(4, -5, 6, Face::Left, 13, 12);
        assert_eq!(vertex.bits(), pack(4, -5, 6, 2, 13, 12));
        assert_eq!(vertex.unpack().face(), Some(Face::Left));
        assert_eq!(std::mem::size_of::<PackedVertex>(), 4);
    }
}
