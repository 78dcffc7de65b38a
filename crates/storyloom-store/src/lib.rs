//! Storyloom Store — concrete `KeyValueStore` implementations.
//!
//! The session layer only needs a get/set/remove string store. Two media
//! are provided: a process-local map with an optional capacity limit, and a
//! JSON file on disk.

pub mod file_store;
pub mod memory_store;
