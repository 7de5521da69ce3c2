//! 分片领域：分片描述、分片器，以及外部分片下载器的接入点。

pub mod functions;
pub mod structs;
pub mod traits;
