pub mod chunk_merger;

pub use chunk_merger::ChunkMerger;
