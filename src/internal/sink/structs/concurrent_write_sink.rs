//! 并发写入管道：多生产者、单后台写入任务。

mod drain_worker;
mod release_cadence;
mod sink_shared;

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncWrite};
use tokio::sync::{oneshot, OnceCell, Semaphore};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::internal::config::structs::SinkOptions;
use crate::internal::sink::traits::sink_backing::{SinkBacking, SinkReader};
use crate::internal::states::work_queue::WorkQueue;

use super::file_backing::FileBacking;
use super::memory_backing::MemoryBacking;
use super::null_backing::NullBacking;
use super::packet::Packet;
use super::sink_error::SinkError;
use super::sink_stats::SinkStats;
use super::stream_backing::StreamBacking;
use drain_worker::{run_drain_worker, SinkCommand};
use release_cadence::ReleaseCadence;
use sink_shared::SinkShared;

struct SinkInner {
    kind: &'static str,
    shared: Arc<SinkShared>,
    /// `None` 表示已关闭
    queue: Mutex<Option<WorkQueue<SinkCommand>>>,
    closing: AtomicBool,
    /// 首次关闭的结果，之后的 close 调用等待并返回它
    closed: OnceCell<Result<(), SinkError>>,
    /// 仅在配置了 `max_pending_packets` 时存在
    permits: Option<Arc<Semaphore>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// 多个生产者共享的随机写目标。
///
/// 可廉价 Clone，所有 Clone 指向同一个后台写入任务。每个实例在创建时启动
/// 一个后台任务，因此构造必须在 tokio 运行时内进行。
///
/// ```rust,no_run
/// # use segmented_download::sink::ConcurrentWriteSink;
/// # use segmented_download::config::SinkOptions;
/// # async fn example() -> Result<(), segmented_download::sink::SinkError> {
/// let sink = ConcurrentWriteSink::in_memory(SinkOptions::default());
/// sink.write(6, b"world")?;
/// sink.write(0, b"hello ")?;
/// assert_eq!(&sink.read_all().await?[..], b"hello world");
/// sink.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ConcurrentWriteSink {
    inner: Arc<SinkInner>,
}

impl fmt::Debug for ConcurrentWriteSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcurrentWriteSink")
            .field("kind", &self.inner.kind)
            .field("len", &self.len())
            .field("pending", &self.pending())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// 构造
impl ConcurrentWriteSink {
    /// 可增长的内存缓冲。
    pub fn in_memory(options: SinkOptions) -> Self {
        Self::start(Box::new(MemoryBacking::new()), 0, options)
    }

    /// 包装已有的字节数组，初始长度为数组长度。
    pub fn from_vec(buffer: Vec<u8>, options: SinkOptions) -> Self {
        let len = buffer.len() as u64;
        Self::start(Box::new(MemoryBacking::from_vec(buffer)), len, options)
    }

    /// 丢弃所有写入的目标，只记录长度。
    pub fn discard(options: SinkOptions) -> Self {
        Self::start(Box::new(NullBacking::default()), 0, options)
    }

    /// 打开或创建文件；`preallocate` 大于 0 时预分配长度，此时 `len()` 立即等于该值。
    pub async fn create(
        path: impl AsRef<Path>,
        preallocate: Option<u64>,
        options: SinkOptions,
    ) -> Result<Self, SinkError> {
        let backing = FileBacking::open(path, preallocate).await?;
        Self::with_backing(backing, options).await
    }

    /// 包装调用方已有的可读写、可定位的流。
    pub async fn from_stream<S>(stream: S, options: SinkOptions) -> Result<Self, SinkError>
    where
        S: AsyncRead + AsyncWrite + AsyncSeek + Unpin + Send + 'static,
    {
        Self::with_backing(StreamBacking::new(stream), options).await
    }

    /// 使用自定义的底层目标。
    pub async fn with_backing(
        mut backing: impl SinkBacking,
        options: SinkOptions,
    ) -> Result<Self, SinkError> {
        let len = backing.extent().await?;
        Ok(Self::start(Box::new(backing), len, options))
    }

    fn start(backing: Box<dyn SinkBacking>, initial_len: u64, options: SinkOptions) -> Self {
        let kind = backing.kind();
        let shared = Arc::new(SinkShared::new(initial_len));
        let (queue, consumer) = WorkQueue::new();
        let cadence = ReleaseCadence::new(options.release_threshold_bytes);
        let worker = tokio::spawn(run_drain_worker(
            backing,
            consumer,
            Arc::clone(&shared),
            cadence,
        ));

        debug!(
            kind,
            initial_len,
            max_pending = ?options.max_pending_packets,
            "写入管道已启动"
        );

        Self {
            inner: Arc::new(SinkInner {
                kind,
                shared,
                queue: Mutex::new(Some(queue)),
                closing: AtomicBool::new(false),
                closed: OnceCell::new(),
                permits: options
                    .max_pending_packets
                    .map(|limit| Arc::new(Semaphore::new(limit.max(1)))),
                worker: Mutex::new(Some(worker)),
            }),
        }
    }
}

/// 写入（从不阻塞调用方）
impl ConcurrentWriteSink {
    /// 把 `data` 拷贝后排队写到 `offset`，立即返回。
    ///
    /// 返回后调用方可以复用 `data`。空数据不会入队。
    /// 管道已关闭返回 [`SinkError::Closed`]；后台任务已失败时返回记录的失败。
    pub fn write(&self, offset: u64, data: &[u8]) -> Result<(), SinkError> {
        self.ensure_accepting()?;
        if data.is_empty() {
            return Ok(());
        }
        let bytes = self.inner.shared.pool.copy_from(data);
        self.enqueue(Packet::new(offset, bytes))
    }

    /// 与 [`write`](Self::write) 相同，但直接使用不可变的 `Bytes`，不再拷贝。
    pub fn write_bytes(&self, offset: u64, data: Bytes) -> Result<(), SinkError> {
        self.ensure_accepting()?;
        if data.is_empty() {
            return Ok(());
        }
        self.enqueue(Packet::new(offset, data))
    }

    /// 有界写入：配置了 `max_pending_packets` 时，未落盘的写入包达到上限后挂起，
    /// 直到后台任务腾出名额。未配置时等同于 [`write`](Self::write)。
    pub async fn write_throttled(&self, offset: u64, data: &[u8]) -> Result<(), SinkError> {
        self.ensure_accepting()?;
        if data.is_empty() {
            return Ok(());
        }
        let permit = match &self.inner.permits {
            Some(permits) => Some(
                Arc::clone(permits)
                    .acquire_owned()
                    .await
                    .map_err(|_| SinkError::Closed)?,
            ),
            None => None,
        };
        let bytes = self.inner.shared.pool.copy_from(data);
        self.enqueue(Packet::new(offset, bytes).with_permit(permit))
    }

    fn ensure_accepting(&self) -> Result<(), SinkError> {
        if self.is_closed() {
            return Err(SinkError::Closed);
        }
        self.inner.shared.signal.check()
    }

    // 先清除空闲信号再入队，保证此后的阻塞调用一定会等到这个写入包
    fn enqueue(&self, packet: Packet) -> Result<(), SinkError> {
        let signal = &self.inner.shared.signal;
        signal.busy();
        if let Err(e) = self.send(SinkCommand::Write(packet)) {
            signal.settle();
            return Err(e);
        }
        Ok(())
    }

    fn send(&self, command: SinkCommand) -> Result<(), SinkError> {
        let queue = self
            .inner
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match queue.as_ref() {
            Some(queue) => queue.send(command).map_err(|_| SinkError::WorkerLost),
            None => Err(SinkError::Closed),
        }
    }
}

/// 阻塞调用：等待此前入队的写入全部落盘
impl ConcurrentWriteSink {
    /// 等到调用前入队的写入全部落盘后，返回一个从头读取的读取器。
    ///
    /// 与本调用并发入队的写入不保证可见。
    pub async fn open_read(&self) -> Result<SinkReader, SinkError> {
        self.inner.shared.signal.wait_idle().await?;
        let (reply, response) = oneshot::channel();
        self.send(SinkCommand::OpenRead(reply))?;
        let reader = response.await.map_err(|_| SinkError::WorkerLost)??;
        Ok(reader)
    }

    /// 等待落盘后读出全部内容。
    pub async fn read_all(&self) -> Result<Bytes, SinkError> {
        let mut reader = self.open_read().await?;
        let mut content = Vec::with_capacity(self.len() as usize);
        reader.read_to_end(&mut content).await?;
        Ok(Bytes::from(content))
    }

    /// 等待落盘，要求底层目标持久化缓冲数据，并执行一次回收。
    pub async fn flush(&self) -> Result<(), SinkError> {
        self.inner.shared.signal.wait_idle().await?;
        let (reply, response) = oneshot::channel();
        self.send(SinkCommand::Flush(reply))?;
        response.await.map_err(|_| SinkError::WorkerLost)??;
        Ok(())
    }

    /// 刷新、停止接收写入、等待后台任务退出并释放底层句柄。
    ///
    /// 刷新失败时仍会完成关闭，再返回该错误。并发或重复调用都会等到首次关闭
    /// 结束，并返回同一个结果。
    pub async fn close(&self) -> Result<(), SinkError> {
        match self.inner.closed.get_or_init(|| self.shutdown()).await {
            Ok(()) => Ok(()),
            Err(e) => Err(e.replay()),
        }
    }

    async fn shutdown(&self) -> Result<(), SinkError> {
        self.inner.closing.store(true, Ordering::SeqCst);

        let flushed = self.flush().await;

        let queue = self
            .inner
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(queue);
        if let Some(permits) = &self.inner.permits {
            permits.close();
        }

        let worker = self
            .inner
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let joined = match worker {
            Some(handle) => handle.await.map_err(|_| SinkError::WorkerLost),
            None => Ok(()),
        };

        debug!(kind = self.inner.kind, len = self.len(), "写入管道已关闭");

        flushed?;
        joined?;
        self.inner.shared.signal.check()
    }
}

/// 状态查询
impl ConcurrentWriteSink {
    /// 目标当前长度；只反映已经落盘的写入。
    pub fn len(&self) -> u64 {
        self.inner.shared.extent()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 没有已入队但未落盘的写入包。
    pub fn is_idle(&self) -> bool {
        self.inner.shared.signal.is_idle()
    }

    pub fn pending(&self) -> usize {
        self.inner.shared.signal.pending()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closing.load(Ordering::SeqCst)
    }

    pub fn kind(&self) -> &'static str {
        self.inner.kind
    }

    pub fn stats(&self) -> SinkStats {
        self.inner.shared.stats()
    }

    /// 池中空闲缓冲个数。
    pub fn pooled_buffers(&self) -> usize {
        self.inner.shared.pool.retained()
    }
}
