pub mod file_chunk_merger;
pub mod memory_chunk_merger;
pub mod merge_error;

pub use file_chunk_merger::FileChunkMerger;
pub use memory_chunk_merger::MemoryChunkMerger;
pub use merge_error::MergeError;
