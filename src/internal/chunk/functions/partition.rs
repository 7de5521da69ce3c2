//! 分片器：把已知大小的资源切成首尾相接、互不重叠的闭区间。

use tracing::debug;

use crate::internal::chunk::structs::{Chunk, ChunkError};
use crate::internal::config::structs::DownloadConfiguration;

/// 按期望分片数切分 `[0, total_size)`。
///
/// - `requested_parts` 小于 1 时按 1 处理；
/// - 分片宽度为 `total_size / parts` 向下取整，余数全部并入最后一个分片；
/// - 分片数多于字节数时退化为每字节一个分片，不会产生零宽分片；
/// - `total_size == 0` 返回 [`ChunkError::InvalidArgument`]。
pub fn partition(
    total_size: u64,
    requested_parts: usize,
    config: &DownloadConfiguration,
) -> Result<Vec<Chunk>, ChunkError> {
    if total_size == 0 {
        return Err(ChunkError::InvalidArgument(
            "资源大小必须大于 0".to_string(),
        ));
    }

    let mut parts = requested_parts.max(1) as u64;
    let mut chunk_size = total_size / parts;

    if chunk_size < 1 {
        chunk_size = 1;
        parts = total_size;
    }

    debug!(total = total_size, parts, chunk_size, "切分资源");

    let chunks = (0..parts)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i == parts - 1 {
                total_size - 1
            } else {
                start + chunk_size - 1
            };
            Chunk::new(i as usize, start, end).stamped(config)
        })
        .collect();

    Ok(chunks)
}
