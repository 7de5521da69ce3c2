use std::path::Path;

use async_trait::async_trait;
use tracing::info;

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

/// 写入管道直接落到目标文件，文件预分配为资源大小。
pub struct FileChunkMerger<F> {
    config: DownloadConfiguration,
    factory: F,
}

impl<F> FileChunkMerger<F>
where
    F: ChunkDownloaderFactory,
{
    pub fn new(config: DownloadConfiguration, factory: F) -> Self {
        Self { config, factory }
    }
}

#[async_trait]
impl<F> ChunkMerger for FileChunkMerger<F>
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
            "开始合并分片（文件）"
        );

        let options = self.config.sink.clone();
        let sink = match prepare_destination(target).await? {
            Destination::File(path) => ConcurrentWriteSink::create(&path, Some(total), options)
                .await
                .map_err(MergeError::from_sink_creation)?,
            Destination::Null => ConcurrentWriteSink::discard(options),
        };

        let driven = drive_chunks(self, chunks, &sink).await;
        let closed = sink.close().await;
        // 文件已预分配为资源大小，完整性由分片进度保证
        driven?;
        closed?;

        info!(path = %target.display(), total, "分片合并完成");
        Ok(())
    }
}
