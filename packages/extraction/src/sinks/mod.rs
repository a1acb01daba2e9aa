//! Page sink implementations.

mod file;
mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

pub use crate::traits::sink::PageSink;
