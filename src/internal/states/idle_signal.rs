//! # IdleSignal：写入管道的空闲信号
//!
//! 基于 [`tokio::sync::watch`]，记录「已入队但未落盘」的写入包数量，
//! 以及后台写入任务的终止结果（失败或意外退出）。
//!
//! - 入队前 `busy()`，物理写入完成后 `settle()`；计数为 0 即空闲。
//! - 失败结果只保留第一次，之后所有阻塞调用都会拿到它。
//! - `wait_idle` 在空闲**或**出现终止结果时返回，不会因后台任务死亡而永久挂起。

use tokio::sync::watch;

use crate::internal::sink::structs::sink_error::{DrainFailure, SinkError};

#[derive(Debug, Default)]
struct SignalState {
    pending: usize,
    failure: Option<DrainFailure>,
    lost: bool,
}

impl SignalState {
    fn is_settled(&self) -> bool {
        self.pending == 0 || self.failure.is_some() || self.lost
    }
}

#[derive(Debug)]
pub(crate) struct IdleSignal {
    sender: watch::Sender<SignalState>,
}

impl IdleSignal {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(SignalState::default());
        Self { sender }
    }

    /// 有写入包入队：清除空闲信号。
    pub(crate) fn busy(&self) {
        self.sender.send_modify(|s| s.pending += 1);
    }

    /// 一个写入包处理完毕（写入成功或被丢弃）。
    pub(crate) fn settle(&self) {
        self.sender
            .send_modify(|s| s.pending = s.pending.saturating_sub(1));
    }

    pub(crate) fn pending(&self) -> usize {
        self.sender.borrow().pending
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    pub(crate) fn has_failed(&self) -> bool {
        let state = self.sender.borrow();
        state.failure.is_some() || state.lost
    }

    pub(crate) fn record_failure(&self, failure: DrainFailure) {
        self.sender.send_modify(|s| {
            if s.failure.is_none() {
                s.failure = Some(failure);
            }
        });
    }

    pub(crate) fn mark_lost(&self) {
        self.sender.send_modify(|s| s.lost = true);
    }

    /// 若后台任务已记录终止结果，转换成错误返回。
    pub(crate) fn check(&self) -> Result<(), SinkError> {
        let state = self.sender.borrow();
        if let Some(failure) = &state.failure {
            return Err(SinkError::Drain(failure.clone()));
        }
        if state.lost {
            return Err(SinkError::WorkerLost);
        }
        Ok(())
    }

    /// 挂起直到此前入队的写入包全部落盘，或后台任务已失败。
    pub(crate) async fn wait_idle(&self) -> Result<(), SinkError> {
        let mut receiver = self.sender.subscribe();
        receiver
            .wait_for(SignalState::is_settled)
            .await
            .map(drop)
            .map_err(|_| SinkError::WorkerLost)?;
        self.check()
    }
}
