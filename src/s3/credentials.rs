//! 凭证探测模块
//!
//! 同步前先确认实例能否解析到凭证，解析不到时跳过本轮同步。

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_credential_types::provider::{ProvideCredentials, SharedCredentialsProvider};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// 凭证探测的超时时间
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// 无法获取凭证的原因
#[derive(Debug, Error)]
#[error("{0}")]
pub struct CredentialsUnavailable(pub String);

/// 凭证探测接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProbe: Send + Sync {
    /// 检查当前环境是否能解析到凭证。
    async fn probe(&self) -> Result<(), CredentialsUnavailable>;
}

/// 基于 SDK 默认凭证链的探测实现
pub struct SdkCredentialProbe {
    provider: Option<SharedCredentialsProvider>,
    timeout: Duration,
}

impl SdkCredentialProbe {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            provider: sdk_config.credentials_provider(),
            timeout: PROBE_TIMEOUT,
        }
    }
}

#[async_trait]
impl CredentialProbe for SdkCredentialProbe {
    async fn probe(&self) -> Result<(), CredentialsUnavailable> {
        let Some(provider) = &self.provider else {
            return Err(CredentialsUnavailable("no credentials provider configured".into()));
        };

        match tokio::time::timeout(self.timeout, provider.provide_credentials()).await {
            Ok(Ok(credentials)) => {
                debug!(access_key_id = credentials.access_key_id(), "凭证可用");
                Ok(())
            }
            Ok(Err(e)) => Err(CredentialsUnavailable(e.to_string())),
            Err(_) => Err(CredentialsUnavailable(format!(
                "credential lookup timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }
}
