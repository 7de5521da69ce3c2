use bytes::Bytes;
use tokio::sync::OwnedSemaphorePermit;

/// 一次排队中的写入：绝对偏移 + 数据。
///
/// 从入队起由写入管道独占，落盘后立即释放。
#[derive(Debug)]
pub(crate) struct Packet {
    pub(crate) offset: u64,
    pub(crate) data: Bytes,
    /// 有界模式下占用的名额，落盘后归还
    pub(crate) permit: Option<OwnedSemaphorePermit>,
}

impl Packet {
    pub(crate) fn new(offset: u64, data: Bytes) -> Self {
        Self {
            offset,
            data,
            permit: None,
        }
    }

    pub(crate) fn with_permit(mut self, permit: Option<OwnedSemaphorePermit>) -> Self {
        self.permit = permit;
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn end(&self) -> u64 {
        self.offset.saturating_add(self.data.len() as u64)
    }
}
