//! 合并编排：每个分片一个任务，受 `parallel_count` 限制，共享同一个写入管道。

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::internal::chunk::structs::{Chunk, ChunkDownloadError};
use crate::internal::merger::structs::MergeError;
use crate::internal::merger::traits::ChunkMerger;
use crate::internal::sink::structs::ConcurrentWriteSink;

/// 资源总大小 = 各分片宽度之和。
pub(crate) fn expected_total(chunks: &[Chunk]) -> Result<u64, MergeError> {
    if chunks.is_empty() {
        return Err(MergeError::InvalidArgument("分片列表为空".to_string()));
    }
    if let Some(chunk) = chunks.iter().find(|c| c.end < c.start) {
        return Err(MergeError::InvalidArgument(format!(
            "分片 {} 的区间 [{}, {}] 无效",
            chunk.id, chunk.start, chunk.end
        )));
    }
    Ok(chunks.iter().map(Chunk::length).sum())
}

/// 运行所有分片下载器并等待全部结束。
///
/// 不会因为某个分片失败而提前返回：先等所有任务结束、写回分片状态，再返回第一个错误。
pub(crate) async fn drive_chunks<M>(
    merger: &M,
    chunks: &mut [Chunk],
    sink: &ConcurrentWriteSink,
) -> Result<(), MergeError>
where
    M: ChunkMerger + ?Sized,
{
    let parallel = merger.configuration().parallel_count.max(1);
    let semaphore = Arc::new(Semaphore::new(parallel));
    let mut handles = Vec::with_capacity(chunks.len());

    for (index, chunk) in chunks.iter().enumerate() {
        let mut downloader = merger.chunk_downloader(chunk);
        let mut chunk = chunk.clone();
        let sink = sink.clone();
        let semaphore = Arc::clone(&semaphore);

        let handle = tokio::spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => {
                    if chunk.is_download_completed() {
                        Ok(())
                    } else {
                        downloader.download(&mut chunk, &sink).await
                    }
                }
                Err(_) => Err(ChunkDownloadError::Other("并发信号量已关闭".into())),
            };
            (chunk, result)
        });

        handles.push((index, handle));
    }

    let mut first_error = None;
    for (index, handle) in handles {
        match handle.await {
            Ok((chunk, result)) => {
                chunks[index] = chunk;
                if let Err(source) = result {
                    warn!(index, error = %source, "分片下载失败");
                    if first_error.is_none() {
                        first_error = Some(MergeError::ChunkFailed { index, source });
                    }
                }
            }
            Err(join_err) => {
                if first_error.is_none() {
                    first_error = Some(MergeError::TaskJoin(join_err));
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    if let Some((index, chunk)) = chunks
        .iter()
        .enumerate()
        .find(|(_, c)| !c.is_download_completed())
    {
        return Err(MergeError::IncompleteChunk {
            index,
            received: chunk.position,
            expected: chunk.length(),
        });
    }

    debug!(chunks = chunks.len(), parallel, "所有分片下载完成");
    Ok(())
}
