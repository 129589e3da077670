//! File system implementations

pub mod memory;
pub mod os;

pub use memory::MemoryFileSystem;
pub use os::OsFileSystem;
