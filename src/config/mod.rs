//! 中继服务的配置模块。
//!
//! 该模块负责从 `KEY="value"` 格式的配置文件加载配置。文件格式与
//! `.env` 相同，因此直接复用 dotenvy 的解析器：注释、空行、引号以及
//! `export` 前缀都会被正确处理。

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "/etc/s3-relay.conf";

/// 预签名 URL 的默认过期时间（秒）
pub const DEFAULT_EXPIRY_SECS: u64 = 3600;

/// 默认的同步源目录
pub const DEFAULT_SYNC_DIR: &str = "/srv/s3-relay/outbox";

/// 默认的同步日志文件
pub const DEFAULT_LOG_FILE: &str = "/var/log/s3-relay/sync.log";

/// 配置加载错误。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("必须设置 BUCKET")]
    MissingBucket,

    #[error("必须设置 REGION")]
    MissingRegion,

    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// 中继配置。
///
/// 每次进程调用加载一次，之后只读。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    /// 目标存储桶
    pub bucket: String,
    /// 存储桶所在区域
    pub region: String,
    /// 对象键前缀，可以为空
    pub prefix: String,
    /// 未指定过期时间时使用的默认值（秒）
    pub default_expiry_secs: u64,
    /// 需要镜像到存储桶的本地目录
    pub sync_dir: PathBuf,
    /// 同步状态日志文件
    pub log_file: PathBuf,
}

impl Configuration {
    /// 从配置文件加载配置。
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径。
    ///
    /// # Errors
    ///
    /// 文件无法读取或解析时返回 [`ConfigError::Read`]；
    /// 缺少 `BUCKET` 或 `REGION` 时返回对应的错误。
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };

        let pairs = dotenvy::from_path_iter(path)
            .map_err(read_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_error)?;

        Self::from_pairs(pairs)
    }

    /// 从键值对构建配置。
    ///
    /// 空值视为未设置。未知的键会被忽略。
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut bucket = None;
        let mut region = None;
        let mut prefix = String::new();
        let mut default_expiry_secs = DEFAULT_EXPIRY_SECS;
        let mut sync_dir = PathBuf::from(DEFAULT_SYNC_DIR);
        let mut log_file = PathBuf::from(DEFAULT_LOG_FILE);

        for (key, value) in pairs {
            let value: String = value.into();
            match key.as_ref() {
                "BUCKET" => bucket = non_empty(value),
                "REGION" => region = non_empty(value),
                "PREFIX" => prefix = value,
                "EXPIRES_DEFAULT" => default_expiry_secs = parse_expiry(&value),
                "SYNC_DIR" => {
                    if let Some(dir) = non_empty(value) {
                        sync_dir = PathBuf::from(dir);
                    }
                }
                "LOG_FILE" => {
                    if let Some(file) = non_empty(value) {
                        log_file = PathBuf::from(file);
                    }
                }
                other => debug!(key = other, "忽略未知配置项"),
            }
        }

        Ok(Self {
            bucket: bucket.ok_or(ConfigError::MissingBucket)?,
            region: region.ok_or(ConfigError::MissingRegion)?,
            prefix,
            default_expiry_secs,
            sync_dir,
            log_file,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parse_expiry(value: &str) -> u64 {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => secs,
        _ => {
            warn!(value, "EXPIRES_DEFAULT 无效，使用默认值 {}", DEFAULT_EXPIRY_SECS);
            DEFAULT_EXPIRY_SECS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"# relay settings
BUCKET="relay-bucket"
REGION="eu-central-1"

PREFIX="uploads"
EXPIRES_DEFAULT="900"
SYNC_DIR="/data/outbox"
LOG_FILE="/tmp/relay.log"
"#,
        );

        let config = Configuration::load(file.path()).unwrap();
        assert_eq!(config.bucket, "relay-bucket");
        assert_eq!(config.region, "eu-central-1");
        assert_eq!(config.prefix, "uploads");
        assert_eq!(config.default_expiry_secs, 900);
        assert_eq!(config.sync_dir, PathBuf::from("/data/outbox"));
        assert_eq!(config.log_file, PathBuf::from("/tmp/relay.log"));
    }

    #[test]
    fn test_optional_fields_use_defaults() {
        let file = write_config("BUCKET=\"b\"\nREGION='us-east-1'\n");

        let config = Configuration::load(file.path()).unwrap();
        assert_eq!(config.prefix, "");
        assert_eq!(config.default_expiry_secs, DEFAULT_EXPIRY_SECS);
        assert_eq!(config.sync_dir, PathBuf::from(DEFAULT_SYNC_DIR));
        assert_eq!(config.log_file, PathBuf::from(DEFAULT_LOG_FILE));
    }

    #[test]
    fn test_missing_bucket() {
        let file = write_config("REGION=\"us-east-1\"\n");
        let err = Configuration::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBucket));
    }

    #[test]
    fn test_missing_region() {
        let file = write_config("BUCKET=\"b\"\n");
        let err = Configuration::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingRegion));
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let err = Configuration::from_pairs([("BUCKET", ""), ("REGION", "us-east-1")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBucket));
    }

    #[test]
    fn test_invalid_expiry_falls_back() {
        let config = Configuration::from_pairs([
            ("BUCKET", "b"),
            ("REGION", "r"),
            ("EXPIRES_DEFAULT", "soon"),
        ])
        .unwrap();
        assert_eq!(config.default_expiry_secs, DEFAULT_EXPIRY_SECS);

        let config = Configuration::from_pairs([
            ("BUCKET", "b"),
            ("REGION", "r"),
            ("EXPIRES_DEFAULT", "0"),
        ])
        .unwrap();
        assert_eq!(config.default_expiry_secs, DEFAULT_EXPIRY_SECS);
    }

    #[test]
    fn test_unreadable_file() {
        let err = Configuration::load(Path::new("/nonexistent/s3-relay.conf")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
