//! 后台写入任务：唯一接触底层目标的执行者。

use std::io;
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::internal::sink::structs::packet::Packet;
use crate::internal::sink::structs::sink_error::DrainFailure;
use crate::internal::sink::traits::sink_backing::{SinkBacking, SinkReader};
use crate::internal::states::work_queue::WorkQueueConsumer;

use super::release_cadence::ReleaseCadence;
use super::sink_shared::SinkShared;

/// 送往后台任务的请求。
pub(crate) enum SinkCommand {
    Write(Packet),
    Flush(oneshot::Sender<io::Result<()>>),
    OpenRead(oneshot::Sender<io::Result<SinkReader>>),
}

/// 任务非正常结束（panic 或被运行时取消）时记录终止结果，唤醒所有等待者。
struct WorkerGuard {
    shared: Arc<SinkShared>,
    finished: bool,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if !self.finished {
            error!("后台写入任务意外退出");
            self.shared.signal.mark_lost();
        }
    }
}

/// 取完队列后退出；队列在所有生产者句柄释放（或 close）后关闭。
pub(crate) async fn run_drain_worker(
    mut backing: Box<dyn SinkBacking>,
    mut consumer: WorkQueueConsumer<SinkCommand>,
    shared: Arc<SinkShared>,
    mut cadence: ReleaseCadence,
) {
    let mut guard = WorkerGuard {
        shared: Arc::clone(&shared),
        finished: false,
    };

    while let Some(command) = consumer.recv().await {
        match command {
            SinkCommand::Write(packet) => {
                write_packet(backing.as_mut(), &shared, &mut cadence, packet).await;
            }
            SinkCommand::Flush(reply) => {
                let result = backing.flush().await;
                shared.reclaim();
                let _ = reply.send(result);
            }
            SinkCommand::OpenRead(reply) => {
                let _ = reply.send(backing.open_reader().await);
            }
        }
    }

    if let Err(e) = backing.close().await {
        error!(kind = backing.kind(), error = %e, "关闭写入目标失败");
        shared.signal.record_failure(DrainFailure::new(None, e));
    }
    debug!(
        kind = backing.kind(),
        drained = cadence.drained(),
        "后台写入任务结束"
    );
    guard.finished = true;
}

/// 落盘一个写入包。已经失败过的管道不再写入，只丢弃数据并归还计数。
async fn write_packet(
    backing: &mut dyn SinkBacking,
    shared: &SinkShared,
    cadence: &mut ReleaseCadence,
    packet: Packet,
) {
    let end = packet.end();
    let len = packet.len();
    let Packet {
        offset,
        data,
        permit,
    } = packet;

    if !shared.signal.has_failed() {
        match backing.write_at(offset, &data).await {
            Ok(()) => {
                let due = cadence.on_drained(len);
                shared.record_drained(end, cadence.threshold());
                if due {
                    shared.reclaim();
                }
            }
            Err(e) => {
                error!(offset, len, error = %e, "写入失败");
                shared.signal.record_failure(DrainFailure::new(Some(offset), e));
            }
        }
    }

    shared.pool.recycle(data);
    shared.signal.settle();
    drop(permit);
}
