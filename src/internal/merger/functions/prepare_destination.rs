use std::path::{Path, PathBuf};

use tracing::warn;

use crate::internal::merger::structs::MergeError;

pub(crate) enum Destination {
    File(PathBuf),
    /// 路径没有目录部分
    Null,
}

/// 创建目标目录（含所有上级目录）。
pub(crate) async fn prepare_destination(target: &Path) -> Result<Destination, MergeError> {
    let directory = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => {
            warn!(
                path = %target.display(),
                "目标路径没有目录部分，写入将被丢弃"
            );
            return Ok(Destination::Null);
        }
    };

    tokio::fs::create_dir_all(directory)
        .await
        .map_err(MergeError::CreateDestination)?;

    Ok(Destination::File(target.to_path_buf()))
}
