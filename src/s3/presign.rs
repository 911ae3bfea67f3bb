//! S3预签名URL模块
//!
//! 该模块负责解析对象键与过期时间，并生成 GET/PUT 预签名 URL。

use crate::config::Configuration;
use crate::utils::path::object_key;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::{PresigningConfig, PresigningConfigError};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 预签名请求的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// 下载（GetObject）
    Get,
    /// 上传（PutObject）
    Put,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Get => f.write_str("GET"),
            Direction::Put => f.write_str("PUT"),
        }
    }
}

/// 预签名失败的原因。
#[derive(Debug, Error)]
pub enum PresignError {
    #[error("invalid expiry: {0}")]
    Expiry(#[from] PresigningConfigError),

    #[error("{0}")]
    Sdk(String),
}

/// 已解析的预签名请求。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignRequest {
    pub direction: Direction,
    /// 完整的对象键（已拼接前缀）
    pub key: String,
    pub expires_in: Duration,
}

impl PresignRequest {
    /// 根据配置解析预签名请求。
    ///
    /// # 参数
    ///
    /// * `config` - 中继配置，提供前缀与默认过期时间。
    /// * `direction` - GET 或 PUT。
    /// * `relative_path` - 相对于前缀的对象路径。
    /// * `expiry_secs` - 过期时间（秒），为 `None` 时使用配置中的默认值。
    pub fn resolve(
        config: &Configuration,
        direction: Direction,
        relative_path: &str,
        expiry_secs: Option<u64>,
    ) -> Self {
        Self {
            direction,
            key: object_key(&config.prefix, relative_path),
            expires_in: Duration::from_secs(expiry_secs.unwrap_or(config.default_expiry_secs)),
        }
    }
}

/// 为 S3 对象生成预签名 URL。
///
/// 签名在本地完成，不会发出网络请求，但需要能够解析到凭证。
///
/// # 参数
///
/// * `s3_client` - 已绑定区域的 S3 客户端。
/// * `bucket_name` - 存储桶名称。
/// * `request` - 已解析的预签名请求。
///
/// # Errors
///
/// 过期时间超出 SigV4 上限（7 天）或无法获取凭证时返回错误。
pub async fn generate_presigned_url(
    s3_client: &Client,
    bucket_name: &str,
    request: &PresignRequest,
) -> Result<String, PresignError> {
    let presigning_config = PresigningConfig::expires_in(request.expires_in)?;

    debug!(
        method = %request.direction,
        bucket = bucket_name,
        key = %request.key,
        expires_in = request.expires_in.as_secs(),
        "生成预签名 URL"
    );

    let presigned_request = match request.direction {
        Direction::Get => s3_client
            .get_object()
            .bucket(bucket_name)
            .key(&request.key)
            .presigned(presigning_config)
            .await
            .map_err(|e| PresignError::Sdk(DisplayErrorContext(&e).to_string()))?,
        Direction::Put => s3_client
            .put_object()
            .bucket(bucket_name)
            .key(&request.key)
            .presigned(presigning_config)
            .await
            .map_err(|e| PresignError::Sdk(DisplayErrorContext(&e).to_string()))?,
    };

    Ok(presigned_request.uri().to_string())
}
