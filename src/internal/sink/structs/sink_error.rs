//! 写入管道错误类型。

use std::io;
use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O 失败: {0}")]
    Io(#[from] io::Error),

    #[error("写入管道已关闭")]
    Closed,

    /// 后台写入任务记录的失败；一旦出现，之后的每次阻塞调用都会返回它。
    #[error("{0}")]
    Drain(#[from] DrainFailure),

    #[error("后台写入任务意外退出")]
    WorkerLost,
}

impl SinkError {
    /// 复制一份错误，交给等待同一关闭结果的其他调用方。
    pub(crate) fn replay(&self) -> Self {
        match self {
            Self::Io(e) => Self::Io(io::Error::new(e.kind(), e.to_string())),
            Self::Closed => Self::Closed,
            Self::Drain(failure) => Self::Drain(failure.clone()),
            Self::WorkerLost => Self::WorkerLost,
        }
    }
}

/// 后台写入任务的失败结果。`offset` 为 `None` 表示关闭底层句柄时失败。
#[derive(Debug, Clone, Error)]
#[error("后台写入失败（偏移 {offset:?}）: {source}")]
pub struct DrainFailure {
    pub offset: Option<u64>,
    #[source]
    pub source: Arc<io::Error>,
}

impl DrainFailure {
    pub(crate) fn new(offset: Option<u64>, source: io::Error) -> Self {
        Self {
            offset,
            source: Arc::new(source),
        }
    }

    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }
}
