//! 存储后端

pub mod memory;

pub use memory::MemoryBackend;
