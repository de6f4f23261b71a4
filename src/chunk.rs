//! Dense `S`×`S`×`S` voxel chunk: cell storage, the wire codec glue, and
//! visibility recomputation.

use crate::attributes::ObjectAttributes;
use crate::cell::{Cell, SENTINEL};
use crate::error::ChunkError;

/// Chunk edge length, in cells.
pub const S: i32 = 12;
pub const CHUNK_CELLS: usize = (S * S * S) as usize;
pub const CHUNK_BYTES: usize = CHUNK_CELLS * 4;

/// Boundary-face bits returned by [`Chunk::set_from_bytes`].
pub const FACE_NEG_X: u8 = 0x01;
pub const FACE_NEG_Y: u8 = 0x02;
pub const FACE_NEG_Z: u8 = 0x04;
pub const FACE_POS_X: u8 = 0x08;
pub const FACE_POS_Y: u8 = 0x10;
pub const FACE_POS_Z: u8 = 0x20;

#[derive(Clone)]
pub struct Chunk {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
    cells: Box<[Cell; CHUNK_CELLS]>,
    pub dirty: bool,
}

fn in_range(v: i32) -> bool {
    (0..S).contains(&v)
}

/// Row-major offset `|x| + |y|*S + |z|*S^2`. Callers must have already
/// established `x, y, z` are in `[0, S)` (directly, or via neighbor
/// wrapping) before calling this -- it performs no bounds check itself.
fn offset_unchecked(x: i32, y: i32, z: i32) -> usize {
    (x.unsigned_abs() + y.unsigned_abs() * S as u32 + z.unsigned_abs() * (S * S) as u32) as usize
}

impl Chunk {
    pub fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Chunk {
            cx,
            cy,
            cz,
            cells: Box::new([Cell::default(); CHUNK_CELLS]),
            dirty: false,
        }
    }

    /// Relative cell access, `x, y, z` in `[0, S)`. Rejects negative or
    /// overflowing indices rather than aliasing them via absolute value --
    /// use [`Chunk::neighbour_cell`] to reach across a chunk boundary.
    pub fn cell_rel(&self, x: i32, y: i32, z: i32) -> Result<&Cell, ChunkError> {
        if in_range(x) && in_range(y) && in_range(z) {
            Ok(&self.cells[offset_unchecked(x, y, z)])
        } else {
            Err(ChunkError::OutOfRange { x, y, z, edge: S })
        }
    }

    pub fn cell_rel_mut(&mut self, x: i32, y: i32, z: i32) -> Result<&mut Cell, ChunkError> {
        if in_range(x) && in_range(y) && in_range(z) {
            self.dirty = true;
            Ok(&mut self.cells[offset_unchecked(x, y, z)])
        } else {
            Err(ChunkError::OutOfRange { x, y, z, edge: S })
        }
    }

    /// World-space real coordinates, floored to this chunk's local space.
    pub fn cell_abs(&self, wx: f64, wy: f64, wz: f64) -> Result<&Cell, ChunkError> {
        let (_, lx) = floor_div_rem(wx);
        let (_, ly) = floor_div_rem(wy);
        let (_, lz) = floor_div_rem(wz);
        self.cell_rel(lx, ly, lz)
    }

    /// Returns either the in-chunk cell, the corresponding cell in `neigh`
    /// after wrapping the out-of-range axis by `S`, or the shared sentinel
    /// if no neighbor is available.
    pub fn neighbour_cell<'a>(
        &'a self,
        x: i32,
        y: i32,
        z: i32,
        neigh: Option<&'a Chunk>,
    ) -> &'a Cell {
        if in_range(x) && in_range(y) && in_range(z) {
            &self.cells[offset_unchecked(x, y, z)]
        } else if let Some(n) = neigh {
            let wx = wrap(x);
            let wy = wrap(y);
            let wz = wrap(z);
            &n.cells[offset_unchecked(wx, wy, wz)]
        } else {
            &SENTINEL
        }
    }

    /// Decodes a full chunk payload in scan order (`x` fastest, then `y`,
    /// then `z`) and returns the OR of boundary-face bits touched by a
    /// changed cell. A payload shorter than [`CHUNK_BYTES`] is a decode
    /// underrun: all-or-nothing, no partial write is applied.
    pub fn set_from_bytes(&mut self, buf: &[u8]) -> Result<u8, ChunkError> {
        if buf.len() < CHUNK_BYTES {
            return Err(ChunkError::DecodeUnderrun {
                expected: CHUNK_BYTES,
                got: buf.len(),
            });
        }

        let mut mask = 0u8;
        let mut offs = 0usize;
        for z in 0..S {
            for y in 0..S {
                for x in 0..S {
                    let base = offs * 4;
                    let chunk_bytes: [u8; 4] = buf[base..base + 4].try_into().unwrap();
                    let idx = offset_unchecked(x, y, z);
                    let changed = self.cells[idx].decode_from(&chunk_bytes);
                    if changed {
                        if x == 0 {
                            mask |= FACE_NEG_X;
                        }
                        if x == S - 1 {
                            mask |= FACE_POS_X;
                        }
                        if y == 0 {
                            mask |= FACE_NEG_Y;
                        }
                        if y == S - 1 {
                            mask |= FACE_POS_Y;
                        }
                        if z == 0 {
                            mask |= FACE_NEG_Z;
                        }
                        if z == S - 1 {
                            mask |= FACE_POS_Z;
                        }
                    }
                    offs += 1;
                }
            }
        }
        self.dirty = true;
        Ok(mask)
    }

    /// Encodes all cells into `buf`, same scan order as `set_from_bytes`.
    /// `buf` must be at least [`CHUNK_BYTES`] long.
    pub fn get_bytes(&self, buf: &mut [u8]) {
        debug_assert!(buf.len() >= CHUNK_BYTES);
        let mut offs = 0usize;
        for z in 0..S {
            for y in 0..S {
                for x in 0..S {
                    let idx = offset_unchecked(x, y, z);
                    let encoded = self.cells[idx].encode();
                    let base = offs * 4;
                    buf[base..base + 4].copy_from_slice(&encoded);
                    offs += 1;
                }
            }
        }
    }

    /// Local-only visibility pass: zeroes every `visible` flag, then sets
    /// it where any of the six neighbors is transparent. Out-of-chunk
    /// neighbors use the sentinel (transparent), so the outer shell is
    /// always visible in this pass. See
    /// [`crate::world::WorldContext::calc_visibility_world`] for the
    /// neighbor-aware variant.
    pub fn calc_visibility_local(&mut self, attrs: &ObjectAttributes) {
        self.calc_visibility_with_neighbours(attrs, [None; 6]);
    }

    /// Same recomputation, but consulting up to six real neighbor chunks
    /// (order: `+y, -y, -x, +x, -z, +z`, i.e. top, bottom, left, right,
    /// front, back) instead of the sentinel.
    pub fn calc_visibility_with_neighbours(
        &mut self,
        attrs: &ObjectAttributes,
        neighbours: [Option<&Chunk>; 6],
    ) {
        let [top, bot, left, right, front, back] = neighbours;

        for z in 0..S {
            for y in 0..S {
                for x in 0..S {
                    self.cells[offset_unchecked(x, y, z)].visible = false;
                }
            }
        }

        for z in 0..S {
            for y in 0..S {
                for x in 0..S {
                    let idx = offset_unchecked(x, y, z);
                    if self.cells[idx].type_id() == 0 {
                        continue;
                    }

                    let transparent_neighbour = attrs
                        .is_transparent(self.neighbour_cell(x, y + 1, z, top))
                        || attrs.is_transparent(self.neighbour_cell(x, y - 1, z, bot))
                        || attrs.is_transparent(self.neighbour_cell(x - 1, y, z, left))
                        || attrs.is_transparent(self.neighbour_cell(x + 1, y, z, right))
                        || attrs.is_transparent(self.neighbour_cell(x, y, z - 1, front))
                        || attrs.is_transparent(self.neighbour_cell(x, y, z + 1, back));

                    if transparent_neighbour {
                        self.cells[idx].visible = true;
                    }
                }
            }
        }
    }
}

fn wrap(v: i32) -> i32 {
    if v < 0 {
        v + S
    } else if v >= S {
        v - S
    } else {
        v
    }
}

fn floor_div_rem(v: f64) -> (i32, i32) {
    let s = S as f64;
    let q = (v / s).floor();
    let r = v - q * s;
    (q as i32, r as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::ObjectAttributes;

    #[test]
    fn cell_rel_rejects_negative_and_overflowing_indices() {
        let chunk = Chunk::new(0, 0, 0);
        assert!(chunk.cell_rel(-1, 0, 0).is_err());
        assert!(chunk.cell_rel(0, S, 0).is_err());
        assert!(chunk.cell_rel(0, 0, S - 1).is_ok());
    }

    #[test]
    fn scenario_s2_face_mask_on_boundary_edit() {
        let mut chunk = Chunk::new(0, 0, 0);
        let mut buf = vec![0u8; CHUNK_BYTES];
        chunk.get_bytes(&mut buf);

        let set_cell = |buf: &mut Vec<u8>, x: i32, y: i32, z: i32, type_id: u16| {
            let mut offs = 0usize;
            'outer: for zz in 0..S {
                for yy in 0..S {
                    for xx in 0..S {
                        if xx == x && yy == y && zz == z {
                            break 'outer;
                        }
                        offs += 1;
                    }
                }
            }
            let base = offs * 4;
            let encoded = Cell::new(type_id, 0, 0, 0).encode();
            buf[base..base + 4].copy_from_slice(&encoded);
        };
        set_cell(&mut buf, 0, 5, 5, 1);
        set_cell(&mut buf, S - 1, 5, 5, 2);

        let mask = chunk.set_from_bytes(&buf).unwrap();
        assert_eq!(mask, FACE_NEG_X | FACE_POS_X);
    }

    #[test]
    fn decode_underrun_is_fatal_error_not_panic() {
        let mut chunk = Chunk::new(0, 0, 0);
        let buf = vec![0u8; CHUNK_BYTES - 1];
        assert!(matches!(
            chunk.set_from_bytes(&buf),
            Err(ChunkError::DecodeUnderrun { .. })
        ));
    }

    #[test]
    fn property_visibility_solid_cube_only_outer_shell_visible() {
        let mut chunk = Chunk::new(0, 0, 0);
        for z in 0..S {
            for y in 0..S {
                for x in 0..S {
                    *chunk.cell_rel_mut(x, y, z).unwrap() = Cell::new(1, 0, 0, 0);
                }
            }
        }
        let mut attrs = ObjectAttributes::new();
        attrs.set_object_type(1, false, true, true, false, [0.0; 4]);

        chunk.calc_visibility_local(&attrs);

        for z in 0..S {
            for y in 0..S {
                for x in 0..S {
                    let on_shell =
                        x == 0 || x == S - 1 || y == 0 || y == S - 1 || z == 0 || z == S - 1;
                    let cell = chunk.cell_rel(x, y, z).unwrap();
                    assert_eq!(cell.visible, on_shell, "at ({x},{y},{z})");
                }
            }
        }
    }

    #[test]
    fn neighbour_cell_wraps_into_provided_neighbour_chunk() {
        let chunk = Chunk::new(0, 0, 0);
        let mut neigh = Chunk::new(1, 0, 0);
        *neigh.cell_rel_mut(0, 3, 3).unwrap() = Cell::new(7, 0, 0, 0);

        let cell = chunk.neighbour_cell(S, 3, 3, Some(&neigh));
        assert_eq!(cell.type_id(), 7);
    }

    #[test]
    fn neighbour_cell_falls_back_to_sentinel_without_neighbour() {
        let chunk = Chunk::new(0, 0, 0);
        let cell = chunk.neighbour_cell(S, 0, 0, None);
        assert_eq!(cell.type_id(), 0);
        assert!(cell.visible);
    }
}
