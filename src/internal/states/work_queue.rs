//! # WorkQueue：单消费者工作队列
//!
//! 基于 `tokio::sync::mpsc::unbounded_channel`：
//! - 生产者可以有多个（Clone），`send` 立即返回，从不阻塞；
//! - 消费者只有一个，独占接收端；
//! - 所有生产者释放后，消费者取完剩余消息再收到 `None`。
//!
//! 写入管道只依赖「单消费者」这一点，不依赖消息顺序。

use tokio::sync::mpsc;

#[derive(Debug)]
pub(crate) struct WorkQueue<T> {
    sender: mpsc::UnboundedSender<T>,
}

impl<T> Clone for WorkQueue<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct WorkQueueConsumer<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> WorkQueue<T> {
    /// 返回 (生产者, 消费者)。
    pub(crate) fn new() -> (Self, WorkQueueConsumer<T>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, WorkQueueConsumer { receiver })
    }

    /// 接收端已关闭时原样退回消息。
    pub(crate) fn send(&self, value: T) -> Result<(), T> {
        self.sender.send(value).map_err(|e| e.0)
    }
}

impl<T> WorkQueueConsumer<T> {
    pub(crate) async fn recv(&mut self) -> Option<T> {
        self.receiver.recv().await
    }
}
