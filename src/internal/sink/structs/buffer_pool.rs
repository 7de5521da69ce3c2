//! 写入包缓冲池：生产者入队时从池中取缓冲拷贝数据，落盘后归还；回收时清空整个池。

use std::sync::{Mutex, PoisonError};

use bytes::{Bytes, BytesMut};

/// 池中最多保留的空闲缓冲数
const MAX_RETAINED_BUFFERS: usize = 64;

#[derive(Debug, Default)]
pub(crate) struct BufferPool {
    buffers: Mutex<Vec<BytesMut>>,
}

impl BufferPool {
    /// 拷贝调用方的数据；调用方随后可以自由复用自己的缓冲。
    pub(crate) fn copy_from(&self, data: &[u8]) -> Bytes {
        let reused = {
            let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
            let found = buffers.iter().position(|b| b.capacity() >= data.len());
            found.map(|i| buffers.swap_remove(i))
        };
        let mut buf = reused.unwrap_or_else(|| BytesMut::with_capacity(data.len()));
        buf.extend_from_slice(data);
        buf.freeze()
    }

    /// 归还已落盘的数据；仍被其他地方引用的缓冲直接丢弃。
    pub(crate) fn recycle(&self, data: Bytes) {
        if let Ok(mut buf) = data.try_into_mut() {
            buf.clear();
            let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
            if buffers.len() < MAX_RETAINED_BUFFERS {
                buffers.push(buf);
            }
        }
    }

    /// 释放所有空闲缓冲，返回释放的个数。
    pub(crate) fn clear(&self) -> usize {
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        let released = buffers.len();
        buffers.clear();
        buffers.shrink_to_fit();
        released
    }

    pub(crate) fn retained(&self) -> usize {
        self.buffers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
