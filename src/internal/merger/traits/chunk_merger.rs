use std::path::Path;

use async_trait::async_trait;

use crate::internal::chunk::functions::partition;
use crate::internal::chunk::structs::{Chunk, ChunkError};
use crate::internal::chunk::traits::ChunkDownloader;
use crate::internal::config::structs::DownloadConfiguration;
use crate::internal::merger::structs::MergeError;

/// 分片合并器：切分资源、提供分片下载器、合并分片。
#[async_trait]
pub trait ChunkMerger: Send + Sync {
    fn configuration(&self) -> &DownloadConfiguration;

    /// 按 `parts` 切分大小为 `total_size` 的资源，分片带上配置中的重试次数与超时。
    fn chunk_file(&self, total_size: u64, parts: usize) -> Result<Vec<Chunk>, ChunkError> {
        partition(total_size, parts, self.configuration())
    }

    /// 使用配置中的 `chunk_count` 切分。
    fn chunk_file_with_config(&self, total_size: u64) -> Result<Vec<Chunk>, ChunkError> {
        self.chunk_file(total_size, self.configuration().chunk_count)
    }

    /// 为一个分片创建下载器。
    fn chunk_downloader(&self, chunk: &Chunk) -> Box<dyn ChunkDownloader>;

    /// 下载全部分片并写入 `target`。
    ///
    /// - 目标目录不存在时先创建；路径没有目录部分时使用丢弃型目标；
    /// - 每个分片按绝对偏移写入，与到达顺序无关；
    /// - 只有在所有分片完成并刷新落盘后才返回 `Ok`；
    /// - 下载器对分片状态的修改会写回 `chunks`，失败时也一样。
    async fn merge_chunks(&self, chunks: &mut [Chunk], target: &Path) -> Result<(), MergeError>;
}
