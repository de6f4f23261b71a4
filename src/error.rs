//! Error taxonomy for the world-storage core.
//!
//! Per the propagation policy: low-level misuse (bad offsets, undersized
//! buffers, invalid type ids) is always a `Result::Err`, never a panic.
//! Recoverable absence (missing chunk, empty queue) stays `Option::None`
//! at the call site and is not represented here.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("relative cell index ({x}, {y}, {z}) out of range [0, {edge})")]
    OutOfRange { x: i32, y: i32, z: i32, edge: i32 },

    #[error("chunk payload decode underrun: expected at least {expected} bytes, got {got}")]
    DecodeUnderrun { expected: usize, got: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttrError {
    #[error("type id {type_id} out of range [0, {max_types})")]
    InvalidType { type_id: u32, max_types: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
    #[error("ring queue is full (capacity {capacity} items)")]
    Full { capacity: usize },

    #[error("ring queue capacity must be > 1, got {capacity}")]
    InvalidCapacity { capacity: usize },
}
