//! 本地目录扫描

use crate::sync::plan::LocalFile;
use crate::utils::path::relative_key;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("source directory {0} does not exist")]
    SourceMissing(PathBuf),

    #[error("failed to walk {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// 递归扫描同步目录下的所有文件。
///
/// 跟随符号链接。无法转换为对象键的路径（如非 UTF-8 文件名）会被跳过。
///
/// # Errors
///
/// 目录不存在或遍历失败时返回错误。目录不存在不能当作空目录处理，
/// 否则会删除远端的全部对象。
pub fn scan_directory(root: &Path) -> Result<Vec<LocalFile>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::SourceMissing(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        let Some(relative) = relative_key(relative) else {
            warn!(path = %entry.path().display(), "跳过无法转换为对象键的文件");
            continue;
        };

        let metadata = entry.metadata().map_err(|source| ScanError::Walk {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let modified = metadata
            .modified()
            .ok()
            .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
            .map(|duration| duration.as_secs() as i64);

        files.push(LocalFile {
            relative,
            path: entry.path().to_path_buf(),
            size: metadata.len(),
            modified,
        });
    }

    files.sort_by(|a, b| a.relative.cmp(&b.relative));
    Ok(files)
}
