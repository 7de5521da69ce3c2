//! 分片下载器错误类型。

use thiserror::Error;

use crate::internal::sink::structs::sink_error::SinkError;

#[derive(Debug, Error)]
pub enum ChunkDownloadError {
    #[error("写入管道失败: {0}")]
    Sink(#[from] SinkError),

    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("服务器不支持 Range 请求")]
    RangeNotSupported,

    #[error("请求超时")]
    Timeout,

    #[error("响应体提前结束：期望 {expected} 字节，收到 {received} 字节")]
    Truncated { expected: u64, received: u64 },

    #[error("分片 [{start}, {end}] 已重试 {attempts} 次仍失败: {message}")]
    RetriesExhausted {
        start: u64,
        end: u64,
        attempts: u32,
        message: String,
    },

    #[error("{0}")]
    Other(String),
}
