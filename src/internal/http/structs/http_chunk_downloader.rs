use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::internal::chunk::structs::{Chunk, ChunkDownloadError};
use crate::internal::chunk::traits::{ChunkDownloader, ChunkDownloaderFactory};
use crate::internal::config::structs::DownloadConfiguration;
use crate::internal::http::functions::range_request::{
    fetch_range_response, range_header, with_timeout, FetchRangeParams,
};
use crate::internal::sink::structs::ConcurrentWriteSink;

/// 通过 HTTP Range 请求下载一个分片。
#[derive(Debug, Clone)]
pub struct HttpChunkDownloader {
    client: Client,
    url: Url,
    retry_delay: Duration,
}

impl HttpChunkDownloader {
    pub fn new(client: Client, url: Url, retry_delay: Duration) -> Self {
        Self {
            client,
            url,
            retry_delay,
        }
    }

    /// 请求一次，把响应流写入管道；响应提前结束返回 `Truncated`。
    async fn fetch_into(
        &self,
        chunk: &mut Chunk,
        sink: &ConcurrentWriteSink,
    ) -> Result<(), ChunkDownloadError> {
        let range = range_header(chunk);
        let resp = fetch_range_response(FetchRangeParams {
            client: &self.client,
            url: &self.url,
            range: &range,
            timeout: chunk.timeout,
        })
        .await?;

        let mut stream = resp.bytes_stream();
        while !chunk.is_download_completed() {
            let piece = match with_timeout(chunk.timeout, stream.next()).await? {
                Some(piece) => piece?,
                None => break,
            };
            // 服务器多给的字节不属于本分片
            let take = piece.len().min(chunk.remaining() as usize);
            if take == 0 {
                continue;
            }
            sink.write_bytes(chunk.write_offset(), piece.slice(..take))?;
            chunk.add_position(take as u64);
        }

        if chunk.is_download_completed() {
            Ok(())
        } else {
            Err(ChunkDownloadError::Truncated {
                expected: chunk.length(),
                received: chunk.position,
            })
        }
    }
}

#[async_trait]
impl ChunkDownloader for HttpChunkDownloader {
    async fn download(
        &mut self,
        chunk: &mut Chunk,
        sink: &ConcurrentWriteSink,
    ) -> Result<(), ChunkDownloadError> {
        loop {
            if chunk.is_download_completed() {
                return Ok(());
            }

            let error = match self.fetch_into(chunk, sink).await {
                Ok(()) => {
                    debug!(id = chunk.id, start = chunk.start, end = chunk.end, "分片下载完成");
                    return Ok(());
                }
                Err(e @ (ChunkDownloadError::Sink(_) | ChunkDownloadError::RangeNotSupported)) => {
                    return Err(e);
                }
                Err(e) => e,
            };

            if !chunk.can_try_again_on_failover() {
                return Err(ChunkDownloadError::RetriesExhausted {
                    start: chunk.start,
                    end: chunk.end,
                    attempts: chunk.failover_count,
                    message: error.to_string(),
                });
            }

            warn!(
                id = chunk.id,
                attempt = chunk.failover_count,
                position = chunk.position,
                error = %error,
                "分片下载失败，稍后续传"
            );
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}

/// 为每个分片创建指向同一 URL 的 [`HttpChunkDownloader`]。
#[derive(Debug, Clone)]
pub struct HttpChunkDownloaderFactory {
    client: Client,
    url: Url,
    retry_delay: Duration,
}

impl HttpChunkDownloaderFactory {
    pub fn new(client: Client, url: Url, config: &DownloadConfiguration) -> Self {
        Self {
            client,
            url,
            retry_delay: config.retry_delay,
        }
    }
}

impl ChunkDownloaderFactory for HttpChunkDownloaderFactory {
    fn create(&self, _chunk: &Chunk) -> Box<dyn ChunkDownloader> {
        Box::new(HttpChunkDownloader::new(
            self.client.clone(),
            self.url.clone(),
            self.retry_delay,
        ))
    }
}
