use std::io;

use async_trait::async_trait;

use crate::internal::sink::traits::sink_backing::{SinkBacking, SinkReader};

/// 丢弃所有写入，只记录长度。读取时内容为空。
#[derive(Debug, Default)]
pub struct NullBacking {
    extent: u64,
}

#[async_trait]
impl SinkBacking for NullBacking {
    fn kind(&self) -> &'static str {
        "null"
    }

    async fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        let end = offset.checked_add(data.len() as u64).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "写入区间溢出")
        })?;
        self.extent = self.extent.max(end);
        Ok(())
    }

    async fn extent(&mut self) -> io::Result<u64> {
        Ok(self.extent)
    }

    async fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    async fn open_reader(&mut self) -> io::Result<SinkReader> {
        Ok(Box::new(tokio::io::empty()))
    }
}
