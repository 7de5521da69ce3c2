use std::io::{self, Cursor, SeekFrom};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::internal::sink::traits::sink_backing::{SinkBacking, SinkReader};

/// 包装调用方已有的可读写、可定位的流。
#[derive(Debug)]
pub struct StreamBacking<S> {
    stream: S,
}

impl<S> StreamBacking<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }
}

#[async_trait]
impl<S> SinkBacking for StreamBacking<S>
where
    S: AsyncRead + AsyncWrite + AsyncSeek + Unpin + Send + 'static,
{
    fn kind(&self) -> &'static str {
        "stream"
    }

    async fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.stream.seek(SeekFrom::Start(offset)).await?;
        self.stream.write_all(data).await
    }

    async fn extent(&mut self) -> io::Result<u64> {
        let current = self.stream.stream_position().await?;
        let end = self.stream.seek(SeekFrom::End(0)).await?;
        self.stream.seek(SeekFrom::Start(current)).await?;
        Ok(end)
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.stream.flush().await
    }

    // 流只有一个位置，读取器拿到的是内容快照
    async fn open_reader(&mut self) -> io::Result<SinkReader> {
        self.stream.flush().await?;
        self.stream.seek(SeekFrom::Start(0)).await?;
        let mut content = Vec::new();
        self.stream.read_to_end(&mut content).await?;
        Ok(Box::new(Cursor::new(content)))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
