//! Fixed-size, type-id-indexed table of per-material rendering/gameplay
//! attributes. Written at world setup, read-mostly afterward.

use crate::cell::{Cell, MAX_TYPES};
use crate::error::AttrError;

pub const MAX_MODEL_DIM: usize = 6;
pub const MAX_MODEL_SIZE: usize = MAX_MODEL_DIM * MAX_MODEL_DIM * MAX_MODEL_DIM;

#[derive(Debug, Clone)]
pub struct ObjectAttr {
    pub uv: [f64; 4],
    pub transparent: bool,
    pub blocking: bool,
    pub has_txt: bool,
    pub model: bool,
    pub active: bool,
    pub model_dim: u8,
    pub model_blocks: Vec<u16>,
}

impl Default for ObjectAttr {
    fn default() -> Self {
        ObjectAttr {
            uv: [0.0; 4],
            transparent: false,
            blocking: false,
            has_txt: false,
            model: false,
            active: false,
            model_dim: 0,
            model_blocks: Vec::new(),
        }
    }
}

pub struct ObjectAttributes {
    entries: Vec<ObjectAttr>,
}

impl Default for ObjectAttributes {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectAttributes {
    /// Entry 0 is the canonical "empty/air" slot: transparent, non-blocking,
    /// non-textured, by construction.
    pub fn new() -> Self {
        let mut entries = vec![ObjectAttr::default(); MAX_TYPES as usize];
        entries[0].transparent = true;
        ObjectAttributes { entries }
    }

    fn check(&self, type_id: u32) -> Result<(), AttrError> {
        if type_id >= MAX_TYPES {
            Err(AttrError::InvalidType {
                type_id,
                max_types: MAX_TYPES,
            })
        } else {
            Ok(())
        }
    }

    pub fn get(&self, type_id: u32) -> Result<&ObjectAttr, AttrError> {
        self.check(type_id)?;
        Ok(&self.entries[type_id as usize])
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_object_type(
        &mut self,
        type_id: u32,
        transparent: bool,
        blocking: bool,
        has_txt: bool,
        active: bool,
        uv: [f64; 4],
    ) {
        debug_assert!(type_id < MAX_TYPES, "type id out of range");
        let entry = &mut self.entries[type_id as usize];
        entry.transparent = transparent;
        entry.blocking = blocking;
        entry.has_txt = has_txt;
        entry.active = active;
        entry.uv = uv;
    }

    pub fn set_object_model(&mut self, type_id: u32, dim: u8, blocks: &[u16]) {
        debug_assert!(type_id < MAX_TYPES, "type id out of range");
        debug_assert!((dim as usize) <= MAX_MODEL_DIM, "model dim too large");
        let entry = &mut self.entries[type_id as usize];
        entry.model = true;
        entry.model_dim = dim;
        let len = blocks.len().min(MAX_MODEL_SIZE);
        entry.model_blocks = blocks[..len].to_vec();
    }

    pub fn is_active(&self, type_id: u32) -> bool {
        self.entries
            .get(type_id as usize)
            .map(|e| e.active)
            .unwrap_or(false)
    }

    /// One-indirection transparency read for a cell's current material.
    pub fn is_transparent(&self, cell: &Cell) -> bool {
        self.entries
            .get(cell.type_id() as usize)
            .map(|e| e.transparent)
            .unwrap_or(true)
    }
}
