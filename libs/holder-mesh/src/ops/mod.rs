//! # Operations
//!
//! Solid-level operations used by the holder pipeline.

pub mod boolean;

pub use boolean::{subtract, union};
