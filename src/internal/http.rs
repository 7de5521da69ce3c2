//! HTTP Range 分片下载器：[`ChunkDownloader`](crate::chunk::ChunkDownloader) 的参考实现。
//!
//! 每个分片发起 `Range: bytes=<write_offset>-<end>` 请求，把响应流按绝对偏移写入共享写入管道；
//! 失败时消耗分片的重试次数并从已收到的位置续传。

pub mod functions;
pub mod structs;
