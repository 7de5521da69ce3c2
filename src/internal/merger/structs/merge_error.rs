//! 合并相关错误类型。

use thiserror::Error;

use crate::internal::chunk::structs::ChunkDownloadError;
use crate::internal::sink::structs::SinkError;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("创建目标失败: {0}")]
    CreateDestination(std::io::Error),

    #[error("写出目标文件失败: {0}")]
    WriteDestination(std::io::Error),

    #[error("写入管道失败: {0}")]
    Sink(#[from] SinkError),

    #[error("分片 {index} 下载失败: {source}")]
    ChunkFailed {
        index: usize,
        #[source]
        source: ChunkDownloadError,
    },

    #[error("分片任务失败: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("分片 {index} 未完成：收到 {received} / {expected} 字节")]
    IncompleteChunk {
        index: usize,
        received: u64,
        expected: u64,
    },

    #[error("产物长度不符：期望 {expected} 字节，实际 {actual} 字节")]
    IncompleteArtifact { expected: u64, actual: u64 },
}

impl MergeError {
    /// 创建写入管道时的 I/O 失败归为「创建目标失败」。
    pub(crate) fn from_sink_creation(error: SinkError) -> Self {
        match error {
            SinkError::Io(e) => Self::CreateDestination(e),
            other => Self::Sink(other),
        }
    }
}
