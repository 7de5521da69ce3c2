pub mod chunk_downloader;

pub use chunk_downloader::{ChunkDownloader, ChunkDownloaderFactory};
