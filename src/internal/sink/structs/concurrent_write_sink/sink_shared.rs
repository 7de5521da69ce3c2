//! 生产者句柄与后台写入任务共享的状态。底层目标不在这里，只归后台任务所有。

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::internal::sink::structs::buffer_pool::BufferPool;
use crate::internal::sink::structs::sink_stats::SinkStats;
use crate::internal::states::idle_signal::IdleSignal;

#[derive(Debug)]
pub(crate) struct SinkShared {
    pub(crate) signal: IdleSignal,
    pub(crate) pool: BufferPool,
    /// 已应用写入的最大 `offset + len`，初始为目标打开时的长度
    extent: AtomicU64,
    drained_packets: AtomicU64,
    reclaim_passes: AtomicU64,
    /// 0 表示尚未计算
    release_threshold: AtomicU64,
}

impl SinkShared {
    pub(crate) fn new(initial_extent: u64) -> Self {
        Self {
            signal: IdleSignal::new(),
            pool: BufferPool::default(),
            extent: AtomicU64::new(initial_extent),
            drained_packets: AtomicU64::new(0),
            reclaim_passes: AtomicU64::new(0),
            release_threshold: AtomicU64::new(0),
        }
    }

    pub(crate) fn extent(&self) -> u64 {
        self.extent.load(Ordering::Acquire)
    }

    pub(crate) fn record_drained(&self, end: u64, threshold: Option<u64>) {
        self.extent.fetch_max(end, Ordering::AcqRel);
        self.drained_packets.fetch_add(1, Ordering::AcqRel);
        if let Some(threshold) = threshold {
            self.release_threshold.store(threshold, Ordering::Release);
        }
    }

    /// 回收一次：释放池中所有空闲缓冲。
    pub(crate) fn reclaim(&self) {
        let released = self.pool.clear();
        let passes = self.reclaim_passes.fetch_add(1, Ordering::AcqRel) + 1;
        let resident = memory_stats::memory_stats().map(|s| s.physical_mem);
        debug!(
            passes,
            drained = self.drained_packets.load(Ordering::Acquire),
            released,
            resident = ?resident,
            "回收写入缓冲"
        );
    }

    pub(crate) fn stats(&self) -> SinkStats {
        let threshold = self.release_threshold.load(Ordering::Acquire);
        SinkStats {
            drained_packets: self.drained_packets.load(Ordering::Acquire),
            reclaim_passes: self.reclaim_passes.load(Ordering::Acquire),
            release_threshold: (threshold > 0).then_some(threshold),
        }
    }
}
