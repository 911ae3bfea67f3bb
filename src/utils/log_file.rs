use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use time::{OffsetDateTime, UtcOffset};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// 日志行时间戳格式（ISO 8601，精确到秒，带时区偏移）
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

/// 只追加的同步状态日志
///
/// 每行格式为 `<时间戳> <消息>`。每次写入都重新以追加模式打开文件，
/// 因此多个进程先后写入不会互相覆盖。
///
/// 时区偏移在创建时确定一次：进程出现多个线程后无法再读取本地时区，
/// 同一次运行的所有行必须使用同一偏移。
#[derive(Debug, Clone)]
pub struct SyncLog {
    path: PathBuf,
    offset: UtcOffset,
}

impl SyncLog {
    /// 使用本地时区创建日志，本地时区不可用时使用 UTC。
    ///
    /// 应在启动其他线程之前调用。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
        Self::with_offset(path, offset)
    }

    pub fn with_offset(path: impl Into<PathBuf>, offset: UtcOffset) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一行带时间戳的消息
    ///
    /// # Errors
    ///
    /// 文件所在目录不存在时会先创建。文件无法打开或写入时返回 IO 错误。
    pub fn append(&self, message: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{} {}", self.timestamp()?, message)
    }

    fn timestamp(&self) -> io::Result<String> {
        OffsetDateTime::now_utc()
            .to_offset(self.offset)
            .format(TIMESTAMP_FORMAT)
            .map_err(io::Error::other)
    }
}
