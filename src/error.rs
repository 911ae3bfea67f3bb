//! 错误类型与进程退出码

use crate::config::ConfigError;
use crate::s3::presign::PresignError;
use crate::sync::SyncError;
use thiserror::Error;

/// 用法错误（缺少参数等）
pub const EXIT_USAGE: u8 = 1;
/// 远端操作失败
pub const EXIT_FAILURE: u8 = 1;
/// 未配置存储桶
pub const EXIT_NO_BUCKET: u8 = 2;
/// 未配置区域
pub const EXIT_NO_REGION: u8 = 3;

/// 命令执行失败的原因。
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("presign failed: {0}")]
    Presign(#[from] PresignError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

impl RelayError {
    /// 对应的进程退出码。
    pub fn exit_code(&self) -> u8 {
        match self {
            RelayError::Config(ConfigError::MissingBucket) => EXIT_NO_BUCKET,
            RelayError::Config(ConfigError::MissingRegion) => EXIT_NO_REGION,
            RelayError::Config(_) => EXIT_FAILURE,
            RelayError::Presign(_) | RelayError::Sync(_) | RelayError::Output(_) => EXIT_FAILURE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::s3::mirror::MirrorError;

    #[test]
    fn test_exit_codes() {
        assert_eq!(RelayError::from(ConfigError::MissingBucket).exit_code(), 2);
        assert_eq!(RelayError::from(ConfigError::MissingRegion).exit_code(), 3);
        let sync = SyncError::Log(std::io::Error::other("disk full"));
        assert_eq!(RelayError::from(sync).exit_code(), 1);

        // 镜像失败
        let mirror = SyncError::Mirror(MirrorError::Delete {
            key: "uploads/a.txt".to_string(),
            message: "AccessDenied".to_string(),
        });
        assert_eq!(RelayError::from(mirror).exit_code(), 1);
    }
}
