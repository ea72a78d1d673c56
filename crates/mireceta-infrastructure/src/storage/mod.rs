//! Implementations of the durable key-value storage capability.

mod json_file;
mod memory;
mod noop;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use noop::NoopStorage;
