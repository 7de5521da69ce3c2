use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

use crate::internal::sink::traits::sink_backing::{SinkBacking, SinkReader};

/// 本地文件。打开时不截断已有内容，可选地预分配长度。
#[derive(Debug)]
pub struct FileBacking {
    file: File,
    path: PathBuf,
}

impl FileBacking {
    /// 打开或创建文件；`preallocate` 大于 0 时把文件长度设为该值。
    pub async fn open(path: impl AsRef<Path>, preallocate: Option<u64>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .await?;

        if let Some(len) = preallocate.filter(|len| *len > 0) {
            file.set_len(len).await?;
        }

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SinkBacking for FileBacking {
    fn kind(&self) -> &'static str {
        "file"
    }

    async fn write_at(&mut self, offset: u64, data: &[u8]) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(offset)).await?;
        self.file.write_all(data).await
    }

    async fn extent(&mut self) -> io::Result<u64> {
        Ok(self.file.metadata().await?.len())
    }

    async fn flush(&mut self) -> io::Result<()> {
        self.file.flush().await?;
        self.file.sync_data().await
    }

    // 读取走独立句柄，后续写入的 seek 不会影响读取位置
    async fn open_reader(&mut self) -> io::Result<SinkReader> {
        self.file.flush().await?;
        let reader = File::open(&self.path).await?;
        Ok(Box::new(reader))
    }

    async fn close(&mut self) -> io::Result<()> {
        self.file.flush().await?;
        self.file.sync_all().await
    }
}
