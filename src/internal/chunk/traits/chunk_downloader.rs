//! 分片下载器接入点：网络传输与重试策略都在本 crate 之外实现。

use async_trait::async_trait;

use crate::internal::chunk::structs::{Chunk, ChunkDownloadError};
use crate::internal::sink::structs::ConcurrentWriteSink;

/// 负责一个分片的实际传输。
///
/// 实现方把收到的字节按**绝对偏移**写入共享的 [`ConcurrentWriteSink`]，
/// 并通过 [`Chunk::add_position`] / [`Chunk::can_try_again_on_failover`] 更新分片状态。
/// 返回 `Ok` 时分片应已完整（`chunk.is_download_completed()`）。
#[async_trait]
pub trait ChunkDownloader: Send {
    async fn download(
        &mut self,
        chunk: &mut Chunk,
        sink: &ConcurrentWriteSink,
    ) -> Result<(), ChunkDownloadError>;
}

/// 为每个分片创建一个下载器。闭包 `Fn(&Chunk) -> Box<dyn ChunkDownloader>` 自动实现本 trait。
pub trait ChunkDownloaderFactory: Send + Sync {
    fn create(&self, chunk: &Chunk) -> Box<dyn ChunkDownloader>;
}

impl<F> ChunkDownloaderFactory for F
where
    F: Fn(&Chunk) -> Box<dyn ChunkDownloader> + Send + Sync,
{
    fn create(&self, chunk: &Chunk) -> Box<dyn ChunkDownloader> {
        (self)(chunk)
    }
}
