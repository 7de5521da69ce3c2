//! 发起单段 Range 请求，返回响应供流式读取。

use std::time::Duration;

use reqwest::header::RANGE;
use reqwest::{Client, Response, StatusCode};
use url::Url;

use crate::internal::chunk::structs::{Chunk, ChunkDownloadError};

/// 生成分片剩余部分的 Range 请求头：`bytes=<write_offset>-<end>`，两端都包含。
pub fn range_header(chunk: &Chunk) -> String {
    format!("bytes={}-{}", chunk.write_offset(), chunk.end)
}

/// 发起 Range 请求时的参数（形参超过 3 个时用 struct 承载）。
pub(crate) struct FetchRangeParams<'a> {
    pub client: &'a Client,
    pub url: &'a Url,
    pub range: &'a str,
    pub timeout: Duration,
}

/// 发起 Range GET 请求；服务器未返回 206 时视为不支持 Range。
pub(crate) async fn fetch_range_response(
    params: FetchRangeParams<'_>,
) -> Result<Response, ChunkDownloadError> {
    let request = params
        .client
        .get(params.url.clone())
        .header(RANGE, params.range)
        .send();

    let resp = with_timeout(params.timeout, request).await??;
    if resp.status() != StatusCode::PARTIAL_CONTENT {
        return Err(ChunkDownloadError::RangeNotSupported);
    }
    Ok(resp)
}

/// `timeout` 为 0 时不限时。
pub(crate) async fn with_timeout<T>(
    timeout: Duration,
    future: impl Future<Output = T>,
) -> Result<T, ChunkDownloadError> {
    if timeout.is_zero() {
        return Ok(future.await);
    }
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| ChunkDownloadError::Timeout)
}
