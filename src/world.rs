//! `WorldContext`: owns the chunk index, the object-attribute table, the
//! light queues, and the change-notification seam. The single entry point
//! an embedding host constructs and threads through the API -- no
//! process-wide statics, so tests can build an isolated instance.

use crate::attributes::ObjectAttributes;
use crate::chunk::Chunk;
use crate::chunk_index::ChunkIndex;
use crate::config::WorldConfig;
use crate::light::{LightItem, LightSubstrate};

type ChunkChangeSink = Box<dyn FnMut(i32, i32, i32)>;
type ActiveCellChangeSink = Box<dyn FnMut(i32, i32, i32, u16, Option<u64>)>;

pub struct WorldContext {
    config: WorldConfig,
    chunk_index: ChunkIndex,
    attributes: ObjectAttributes,
    light: LightSubstrate,
    chunk_change: Option<ChunkChangeSink>,
    active_cell_change: Option<ActiveCellChangeSink>,
}

impl WorldContext {
    pub fn new(config: WorldConfig) -> Self {
        log::debug!(
            "world init: max_types={} max_light_radius={}",
            config.max_types,
            config.max_light_radius
        );
        WorldContext {
            config,
            chunk_index: ChunkIndex::new(),
            attributes: ObjectAttributes::new(),
            light: LightSubstrate::new(),
            chunk_change: None,
            active_cell_change: None,
        }
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn attributes(&self) -> &ObjectAttributes {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut ObjectAttributes {
        &mut self.attributes
    }

    // -- Chunk index passthrough --------------------------------------

    pub fn chunk(&self, x: i32, y: i32, z: i32) -> Option<&Chunk> {
        self.chunk_index.chunk(x, y, z)
    }

    pub fn chunk_or_alloc(&mut self, x: i32, y: i32, z: i32) -> &mut Chunk {
        let created_before = self.chunk_index.chunk(x, y, z).is_some();
        let chunk = self.chunk_index.chunk_or_alloc(x, y, z);
        if !created_before {
            log::debug!("chunk allocated at ({x}, {y}, {z}), chnk_alloc={}", self.chunk_index.chnk_alloc());
        }
        chunk
    }

    pub fn purge(&mut self, x: i32, y: i32, z: i32) -> bool {
        let purged = self.chunk_index.purge(x, y, z);
        if purged {
            log::debug!("chunk purged at ({x}, {y}, {z}), chnk_alloc={}", self.chunk_index.chnk_alloc());
        }
        purged
    }

    pub fn chnk_alloc(&self) -> i64 {
        self.chunk_index.chnk_alloc()
    }

    pub fn dump_chunks(&self) -> Vec<(i32, i32, i32)> {
        self.chunk_index.dump_chunks()
    }

    /// World-aware visibility recomputation: consults the six real
    /// neighbor chunks from the index (falling back to the sentinel where
    /// a neighbor chunk is genuinely absent), unlike
    /// [`Chunk::calc_visibility_local`] which never looks outside the
    /// chunk itself.
    pub fn calc_visibility_world(&mut self, cx: i32, cy: i32, cz: i32) {
        let neighbour_coords = [
            (cx, cy + 1, cz),
            (cx, cy - 1, cz),
            (cx - 1, cy, cz),
            (cx + 1, cy, cz),
            (cx, cy, cz - 1),
            (cx, cy, cz + 1),
        ];
        let neighbour_clones: [Option<Chunk>; 6] =
            neighbour_coords.map(|(x, y, z)| self.chunk_index.chunk(x, y, z).cloned());
        let neighbour_refs: [Option<&Chunk>; 6] = [
            neighbour_clones[0].as_ref(),
            neighbour_clones[1].as_ref(),
            neighbour_clones[2].as_ref(),
            neighbour_clones[3].as_ref(),
            neighbour_clones[4].as_ref(),
            neighbour_clones[5].as_ref(),
        ];

        if let Some(chunk) = self.chunk_index.chunk_mut(cx, cy, cz) {
            chunk.calc_visibility_with_neighbours(&self.attributes, neighbour_refs);
        }
    }

    // -- Light substrate passthrough ------------------------------------

    pub fn light_upd_start(&mut self) {
        self.light.upd_start();
    }

    pub fn light_select_queue(&mut self, which: u32) {
        self.light.select_queue(which);
    }

    pub fn light_enqueue(&mut self, wx: i32, wy: i32, wz: i32, lv: u8) {
        self.light.enqueue(wx, wy, wz, lv);
    }

    pub fn light_enqueue_neighbours(&mut self, wx: i32, wy: i32, wz: i32, lv: u8) {
        self.light.enqueue_neighbours(wx, wy, wz, lv);
    }

    pub fn light_freeze_queue(&mut self) {
        self.light.freeze_queue();
    }

    pub fn light_thaw_queue(&mut self) {
        self.light.thaw_queue();
    }

    pub fn light_dequeue(&mut self) -> Option<LightItem> {
        self.light.dequeue()
    }

    // -- Change-notification seam ---------------------------------------

    pub fn set_chunk_change_sink(&mut self, sink: impl FnMut(i32, i32, i32) + 'static) {
        self.chunk_change = Some(Box::new(sink));
    }

    pub fn set_active_cell_change_sink(
        &mut self,
        sink: impl FnMut(i32, i32, i32, u16, Option<u64>) + 'static,
    ) {
        self.active_cell_change = Some(Box::new(sink));
    }

    /// Invoked by the host after applying external edits. Fire-and-forget:
    /// no return value is inspected. A panicking sink is caught and logged
    /// rather than unwinding into the core, since the sink is foreign code
    /// the core cannot trust to behave.
    pub fn emit_chunk_change(&mut self, cx: i32, cy: i32, cz: i32) {
        if let Some(sink) = self.chunk_change.as_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink(cx, cy, cz);
            }));
            if result.is_err() {
                log::warn!("chunk_change sink panicked for ({cx}, {cy}, {cz})");
            }
        }
    }

    /// Invoked when a cell's `active` flag transitions.
    pub fn emit_active_cell_change(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        type_id: u16,
        payload: Option<u64>,
    ) {
        if let Some(sink) = self.active_cell_change.as_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                sink(wx, wy, wz, type_id, payload);
            }));
            if result.is_err() {
                log::warn!("active_cell_change sink panicked for ({wx}, {wy}, {wz})");
            }
        }
    }
}

impl Default for WorldContext {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn change_seam_is_fire_and_forget_and_optional() {
        let mut world = WorldContext::default();
        // No sink registered: emit is a no-op, not an error.
        world.emit_chunk_change(0, 0, 0);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        world.set_chunk_change_sink(move |x, y, z| seen_clone.borrow_mut().push((x, y, z)));
        world.emit_chunk_change(1, 2, 3);
        assert_eq!(*seen.borrow(), vec![(1, 2, 3)]);
    }

    #[test]
    fn panicking_sink_is_caught_and_does_not_abort() {
        let mut world = WorldContext::default();
        world.set_chunk_change_sink(|_, _, _| panic!("misbehaving host callback"));
        world.emit_chunk_change(0, 0, 0);
    }

    #[test]
    fn calc_visibility_world_sees_real_neighbour_chunk() {
        let mut world = WorldContext::default();
        world
            .attributes_mut()
            .set_object_type(1, false, true, true, false, [0.0; 4]);

        {
            let chunk = world.chunk_or_alloc(0, 0, 0);
            for z in 0..crate::chunk::S {
                for y in 0..crate::chunk::S {
                    for x in 0..crate::chunk::S {
                        *chunk.cell_rel_mut(x, y, z).unwrap() = crate::cell::Cell::new(1, 0, 0, 0);
                    }
                }
            }
        }
        {
            let neigh = world.chunk_or_alloc(1, 0, 0);
            for z in 0..crate::chunk::S {
                for y in 0..crate::chunk::S {
                    *neigh.cell_rel_mut(0, y, z).unwrap() = crate::cell::Cell::new(1, 0, 0, 0);
                }
            }
        }

        world.calc_visibility_world(0, 0, 0);

        let chunk = world.chunk(0, 0, 0).unwrap();
        let edge = crate::chunk::S - 1;
        // The +x face now borders a solid neighbour chunk instead of the
        // sentinel, so it should no longer be marked visible.
        let cell = chunk.cell_rel(edge, 5, 5).unwrap();
        assert!(!cell.visible);
    }
}
