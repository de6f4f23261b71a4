#![forbid(unsafe_code)]

//! In-memory world-storage and volumetric-content core for a voxel sandbox
//! engine: a sparse chunked voxel store, a packed cell wire format, a
//! ring-buffered light-propagation substrate, and a procedural volume
//! composer. Rendering, meshing, persistence, networking, and scripting
//! are external collaborators this crate does not implement.

pub mod attributes;
pub mod axis;
pub mod cell;
pub mod chunk;
pub mod chunk_index;
pub mod config;
pub mod error;
pub mod light;
pub mod noise_source;
pub mod ring_queue;
pub mod volume;
pub mod world;

pub use attributes::{ObjectAttr, ObjectAttributes, MAX_MODEL_DIM, MAX_MODEL_SIZE};
pub use axis::AxisArray;
pub use cell::{Cell, MAX_TYPES};
pub use chunk::{Chunk, CHUNK_BYTES, CHUNK_CELLS, S};
pub use chunk_index::ChunkIndex;
pub use config::WorldConfig;
pub use error::{AttrError, ChunkError, QueueError};
pub use light::{light_queue_capacity, LightItem, LightSubstrate};
pub use noise_source::{NoiseSource, PerlinNoiseSource};
pub use ring_queue::RingQueue;
pub use volume::{DrawOp, VolumeDraw};
pub use world::WorldContext;
