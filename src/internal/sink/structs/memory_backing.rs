use std::io::{self, Cursor};

use async_trait::async_trait;

use crate::internal::sink::traits::sink_backing::{SinkBacking, SinkReader};

/// 可增长的内存缓冲。写入超出末尾时以 0 填充空洞。
#[derive(Debug, Default)]
pub struct MemoryBacking {
    buffer: Vec<u8>,
}

impl MemoryBacking {
    pub fn new() -> Self {
        Self::default()
    }

    /// 包装已有的字节数组，写入会直接覆盖其内容。
    pub fn from_vec(buffer: Vec<u8>) -> Self {
        Self { buffer }
    }
}

#[async_trait]
impl SinkBacking for MemoryBacking {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        let start = usize::try_from(offset).map_err(|_| {
            io::Error::new(io::ErrorKind::InvalidInput, "偏移超出内存可寻址范围")
        })?;
        let end = start.checked_add(data.len()).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "写入区间溢出")
        })?;
        if self.buffer.len() < end {
            self.buffer.resize(end, 0);
        }
        self.buffer[start..end].copy_from_slice(data);
        Ok(())
    }

    async fn extent(&mut self) -> io::Result<u64> {
        Ok(self.buffer.len() as u64)
    }

    async fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    async fn open_reader(&mut self) -> io::Result<SinkReader> {
        Ok(Box::new(Cursor::new(self.buffer.clone())))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.buffer = Vec::new();
        Ok(())
    }
}
