use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChunkError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),
}
