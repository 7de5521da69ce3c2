pub mod chunk;
pub mod chunk_download_error;
pub mod chunk_error;

pub use chunk::Chunk;
pub use chunk_download_error::ChunkDownloadError;
pub use chunk_error::ChunkError;
