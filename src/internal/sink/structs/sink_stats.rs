/// 写入管道计数快照。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// 已成功落盘的写入包数
    pub drained_packets: u64,
    /// 已执行的回收次数（周期性回收 + flush 时的回收）
    pub reclaim_passes: u64,
    /// 周期性回收的间隔（写入包数）；首个写入包落盘前为 `None`
    pub release_threshold: Option<u64>,
}
