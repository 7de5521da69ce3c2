use std::io;

use async_trait::async_trait;
use tokio::io::AsyncRead;

/// `open_read` 返回的读取器，位于内容起始处。
pub type SinkReader = Box<dyn AsyncRead + Send + Unpin>;

/// 写入管道的底层目标。
///
/// 只有后台写入任务会调用这些方法，因此实现方不需要处理并发。
#[async_trait]
pub trait SinkBacking: Send + 'static {
    /// 用于日志的后端名称。
    fn kind(&self) -> &'static str;

    /// 在绝对偏移处写入；超出当前末尾时扩展目标。
    async fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()>;

    /// 目标当前的长度。
    async fn extent(&mut self) -> io::Result<u64>;

    async fn flush(&mut self) -> io::Result<()>;

    /// 打开一个从头读取全部内容的读取器。
    async fn open_reader(&mut self) -> io::Result<SinkReader>;

    /// 释放底层句柄。后台任务退出前调用一次。
    async fn close(&mut self) -> io::Result<()> {
        self.flush().await
    }
}
