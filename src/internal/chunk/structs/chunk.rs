use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::internal::config::structs::DownloadConfiguration;

/// 资源中的一段闭区间 `[start, end]`。
///
/// 由分片器创建，创建时从配置拷贝重试次数与超时；之后只有外部分片下载器会修改
/// `position` 与 `failover_count`。分片本身不持有任何缓冲区。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// 分片序号，从 0 开始
    pub id: usize,
    pub start: u64,
    /// 闭区间上界
    pub end: u64,
    /// 已收到的字节数（相对 start）
    pub position: u64,
    pub max_try_again_on_failover: u32,
    pub failover_count: u32,
    pub timeout: Duration,
}

impl Chunk {
    pub fn new(id: usize, start: u64, end: u64) -> Self {
        Self {
            id,
            start,
            end,
            position: 0,
            max_try_again_on_failover: 0,
            failover_count: 0,
            timeout: Duration::ZERO,
        }
    }

    /// 写入共享配置中的重试次数与超时。
    pub fn stamped(mut self, config: &DownloadConfiguration) -> Self {
        self.max_try_again_on_failover = config.max_try_again_on_failover;
        self.timeout = config.timeout;
        self
    }

    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// 下一个待写字节的绝对偏移。
    pub fn write_offset(&self) -> u64 {
        self.start + self.position
    }

    pub fn remaining(&self) -> u64 {
        self.length().saturating_sub(self.position)
    }

    pub fn is_download_completed(&self) -> bool {
        self.position == self.length()
    }

    /// 记录新收到的字节，不会超过分片长度。
    pub fn add_position(&mut self, received: u64) {
        self.position = (self.position + received).min(self.length());
    }

    /// 消耗一次重试机会；返回 `false` 表示预算已用完。
    pub fn can_try_again_on_failover(&mut self) -> bool {
        if self.failover_count < self.max_try_again_on_failover {
            self.failover_count += 1;
            true
        } else {
            false
        }
    }

    /// 清空进度与重试计数。
    pub fn clear(&mut self) {
        self.position = 0;
        self.failover_count = 0;
    }
}
