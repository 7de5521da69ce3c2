use std::path::Path;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info};

use crate::internal::chunk::structs::Chunk;
use crate::internal::chunk::traits::{ChunkDownloader, ChunkDownloaderFactory};
use crate::internal::config::structs::DownloadConfiguration;
use crate::internal::merger::functions::drive_chunks::{drive_chunks, expected_total};
use crate::internal::merger::functions::prepare_destination::{
    prepare_destination, Destination,
};
use crate::internal::merger::traits::ChunkMerger;
use crate::internal::sink::structs::ConcurrentWriteSink;

use super::merge_error::MergeError;

/// 在内存中拼装产物；全部分片完成后一次写出目标文件，产物字节可通过
/// [`take_merged`](Self::take_merged) 取回。
pub struct MemoryChunkMerger<F> {
    config: DownloadConfiguration,
    factory: F,
    merged: Mutex<Option<Bytes>>,
}

impl<F> MemoryChunkMerger<F>
where
    F: ChunkDownloaderFactory,
{
    pub fn new(config: DownloadConfiguration, factory: F) -> Self {
        Self {
            config,
            factory,
            merged: Mutex::new(None),
        }
    }

    /// 取走最近一次成功合并的产物。
    pub fn take_merged(&self) -> Option<Bytes> {
        self.merged
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

#[async_trait]
impl<F> ChunkMerger for MemoryChunkMerger<F>
where
    F: ChunkDownloaderFactory,
{
    fn configuration(&self) -> &DownloadConfiguration {
        &self.config
    }

    fn chunk_downloader(&self, chunk: &Chunk) -> Box<dyn ChunkDownloader> {
        self.factory.create(chunk)
    }

    async fn merge_chunks(&self, chunks: &mut [Chunk], target: &Path) -> Result<(), MergeError> {
        let total = expected_total(chunks)?;
        info!(
            path = %target.display(),
            chunks = chunks.len(),
            total,
            "开始合并分片（内存）"
        );

        let destination = prepare_destination(target).await?;

        // 内存缓冲每次都从空开始，之前完成的分片也必须重新下载
        let resumed = chunks.iter().filter(|c| c.position > 0).count();
        if resumed > 0 {
            debug!(resumed, "内存合并不支持续传，重置分片进度");
        }
        chunks.iter_mut().for_each(Chunk::clear);

        let sink = ConcurrentWriteSink::in_memory(self.config.sink.clone());

        let content = match drive_chunks(self, chunks, &sink).await {
            Ok(()) => sink.read_all().await.map_err(MergeError::from),
            Err(e) => Err(e),
        };
        let closed = sink.close().await;
        let content = content?;
        closed?;

        let actual = content.len() as u64;
        if actual != total {
            return Err(MergeError::IncompleteArtifact {
                expected: total,
                actual,
            });
        }

        if let Destination::File(path) = destination {
            tokio::fs::write(&path, &content)
                .await
                .map_err(MergeError::WriteDestination)?;
        }

        *self.merged.lock().unwrap_or_else(PoisonError::into_inner) = Some(content);
        info!(path = %target.display(), total, "分片合并完成");
        Ok(())
    }
}
