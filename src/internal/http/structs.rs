pub mod http_chunk_downloader;

pub use http_chunk_downloader::{HttpChunkDownloader, HttpChunkDownloaderFactory};
