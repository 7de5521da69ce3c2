use serde::{Deserialize, Serialize};

/// 默认内存回收阈值：50MB。回收间隔 = 阈值 / 首个写入包大小。
pub const DEFAULT_RELEASE_THRESHOLD_BYTES: usize = 50 * 1024 * 1024;

/// 并发写入管道的参数。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkOptions {
    /// 计算回收间隔所用的字节预算
    pub release_threshold_bytes: usize,
    /// 未落盘写入包的上限；仅约束 `write_throttled`，`None` 表示不限
    pub max_pending_packets: Option<usize>,
}

impl Default for SinkOptions {
    fn default() -> Self {
        Self {
            release_threshold_bytes: DEFAULT_RELEASE_THRESHOLD_BYTES,
            max_pending_packets: None,
        }
    }
}

impl SinkOptions {
    pub fn release_threshold_bytes(mut self, bytes: usize) -> Self {
        self.release_threshold_bytes = bytes;
        self
    }

    pub fn max_pending_packets(mut self, limit: usize) -> Self {
        self.max_pending_packets = Some(limit);
        self
    }
}
