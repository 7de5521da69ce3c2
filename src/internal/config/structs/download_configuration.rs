use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::sink_options::SinkOptions;

/// 默认每个分片的失败重试次数
pub const DEFAULT_MAX_TRY_AGAIN: u32 = 3;

/// 默认单次请求超时（毫秒）
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// 默认重试延迟（毫秒）
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

/// 一次下载会话的共享配置。
///
/// 分片器只读取 `max_try_again_on_failover` 与 `timeout` 两项并写入每个分片；
/// 其余字段由合并器与分片下载器使用。本结构不做任何校验。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadConfiguration {
    pub max_try_again_on_failover: u32,
    pub timeout: Duration,
    /// 期望的分片数
    pub chunk_count: usize,
    /// 同时运行的分片下载器上限；0 和 1 都表示逐个下载
    pub parallel_count: usize,
    pub retry_delay: Duration,
    pub sink: SinkOptions,
}

impl Default for DownloadConfiguration {
    fn default() -> Self {
        Self {
            max_try_again_on_failover: DEFAULT_MAX_TRY_AGAIN,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            chunk_count: 1,
            parallel_count: 1,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            sink: SinkOptions::default(),
        }
    }
}

impl DownloadConfiguration {
    pub fn max_try_again_on_failover(mut self, attempts: u32) -> Self {
        self.max_try_again_on_failover = attempts;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn chunk_count(mut self, parts: usize) -> Self {
        self.chunk_count = parts;
        self
    }

    pub fn parallel_count(mut self, parallel: usize) -> Self {
        self.parallel_count = parallel;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn sink(mut self, sink: SinkOptions) -> Self {
        self.sink = sink;
        self
    }
}
