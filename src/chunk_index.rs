//! Sparse chunk store: three nested [`AxisArray`]s keyed Y, then X, then Z.
//! Indexing `y` outermost lets empty sky/underworld layers cost almost
//! nothing, since a whole horizontal layer with no chunks never allocates
//! an X-axis array at all.

use crate::axis::AxisArray;
use crate::chunk::{Chunk, S};

type ZLevel = AxisArray<Chunk>;
type XLevel = AxisArray<ZLevel>;

pub struct ChunkIndex {
    y_levels: AxisArray<XLevel>,
    /// Process-wide observability counter: incremented on chunk creation,
    /// decremented on purge.
    chnk_alloc: i64,
}

impl Default for ChunkIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkIndex {
    pub fn new() -> Self {
        ChunkIndex {
            y_levels: AxisArray::new(),
            chnk_alloc: 0,
        }
    }

    pub fn chnk_alloc(&self) -> i64 {
        self.chnk_alloc
    }

    /// Non-allocating lookup: `None` if any axis level is missing.
    pub fn chunk(&self, x: i32, y: i32, z: i32) -> Option<&Chunk> {
        self.y_levels.get(y)?.get(x)?.get(z)
    }

    pub fn chunk_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut Chunk> {
        self.y_levels.get_mut(y)?.get_mut(x)?.get_mut(z)
    }

    /// Allocate-on-demand lookup: lazily creates missing X/Z axis levels
    /// and the leaf chunk, incrementing `chnk_alloc` only on actual chunk
    /// creation.
    pub fn chunk_or_alloc(&mut self, x: i32, y: i32, z: i32) -> &mut Chunk {
        let x_level = self.y_levels.get_mut(y);
        if x_level.is_none() {
            self.y_levels.add(y, AxisArray::new());
        }
        let x_level = self.y_levels.get_mut(y).unwrap();

        let z_level = x_level.get_mut(x);
        if z_level.is_none() {
            x_level.add(x, AxisArray::new());
        }
        let z_level = x_level.get_mut(x).unwrap();

        if z_level.get(z).is_none() {
            z_level.add(z, Chunk::new(x, y, z));
            self.chnk_alloc += 1;
        }
        z_level.get_mut(z).unwrap()
    }

    /// World-space real coordinates: floor-divides by `S` (negative-safe)
    /// and delegates to the chunk-coordinate lookup.
    pub fn chunk_at(&self, wx: f64, wy: f64, wz: f64) -> Option<&Chunk> {
        let (cx, cy, cz) = world_to_chunk_coord(wx, wy, wz);
        self.chunk(cx, cy, cz)
    }

    pub fn chunk_at_or_alloc(&mut self, wx: f64, wy: f64, wz: f64) -> &mut Chunk {
        let (cx, cy, cz) = world_to_chunk_coord(wx, wy, wz);
        self.chunk_or_alloc(cx, cy, cz)
    }

    /// Removes and deallocates the leaf chunk if present. Does not collapse
    /// empty parent (X/Y) arrays -- a bare empty array costs little and
    /// simplicity wins over reclaiming it eagerly.
    pub fn purge(&mut self, x: i32, y: i32, z: i32) -> bool {
        let Some(x_level) = self.y_levels.get_mut(y) else {
            return false;
        };
        let Some(z_level) = x_level.get_mut(x) else {
            return false;
        };
        let removed = z_level.remove(z).is_some();
        if removed {
            self.chnk_alloc -= 1;
        }
        removed
    }

    /// Ascending `(y, x, z)` enumeration of every populated chunk
    /// coordinate, for diagnostics and tests.
    pub fn dump_chunks(&self) -> Vec<(i32, i32, i32)> {
        let mut out = Vec::new();
        for (y, x_level) in self.y_levels.iter() {
            for (x, z_level) in x_level.iter() {
                for (z, _chunk) in z_level.iter() {
                    out.push((y, x, z));
                }
            }
        }
        out
    }
}

fn world_to_chunk_coord(wx: f64, wy: f64, wz: f64) -> (i32, i32, i32) {
    let s = S as f64;
    (
        (wx / s).floor() as i32,
        (wy / s).floor() as i32,
        (wz / s).floor() as i32,
    )
}
