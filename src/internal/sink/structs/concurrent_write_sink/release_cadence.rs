//! 周期性回收节奏：每落盘 N 个写入包回收一次，N = 预算字节 / 首个写入包大小，首次计算后固定。

#[derive(Debug)]
pub(crate) struct ReleaseCadence {
    budget_bytes: usize,
    threshold: Option<u64>,
    drained: u64,
}

impl ReleaseCadence {
    pub(crate) fn new(budget_bytes: usize) -> Self {
        Self {
            budget_bytes,
            threshold: None,
            drained: 0,
        }
    }

    /// 记录一个成功落盘的写入包；返回 `true` 表示本次应执行回收。
    ///
    /// 首个写入包大于预算时间隔按 1 计。
    pub(crate) fn on_drained(&mut self, packet_len: usize) -> bool {
        let budget = self.budget_bytes;
        let threshold = *self
            .threshold
            .get_or_insert_with(|| ((budget / packet_len.max(1)) as u64).max(1));
        self.drained += 1;
        self.drained % threshold == 0
    }

    pub(crate) fn threshold(&self) -> Option<u64> {
        self.threshold
    }

    pub(crate) fn drained(&self) -> u64 {
        self.drained
    }
}
