//! 分片合并：按配置切分资源，为每个分片创建下载器，并通过共享写入管道拼出最终产物。
//!
//! 两种实现共享 [`traits::ChunkMerger`] 约定：
//! - [`structs::FileChunkMerger`]：写入管道直接落到目标文件（预分配为资源大小）；
//! - [`structs::MemoryChunkMerger`]：先在内存中拼装，全部分片完成后一次写出目标文件。

pub mod functions;
pub mod structs;
pub mod traits;
