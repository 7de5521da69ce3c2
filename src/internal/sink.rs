//! 并发写入管道：多个分片生产者按绝对偏移乱序写入，由唯一的后台任务串行落盘。
//!
//! ## 数据流
//!
//! ```text
//! 生产者 write(offset, bytes) ──► WorkQueue ──► drain worker ──► SinkBacking
//!        (立即返回，拷贝入池化缓冲)      (唯一消费者)     (文件 / 内存 / 流 / 丢弃)
//! ```
//!
//! - `write` 从不阻塞调用方，也不返回单次写入的完成句柄；
//! - `open_read` / `flush` / `read_all` / `close` 会挂起到此前入队的写入全部落盘；
//! - 后台任务的失败会被记录下来，并在下一次阻塞调用时返回，不会丢失。
//!
//! 不同生产者写入的区间不得重叠；管道不做重叠校验，重叠写入的结果取决于落盘顺序。

pub mod structs;
pub mod traits;
