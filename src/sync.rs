//! 目录同步模块
//!
//! 由定时器周期触发：先探测凭证，凭证不可用时记录一行日志并跳过；
//! 否则将本地目录镜像到存储桶，并把结果写入同步日志。

pub mod plan;
pub mod scan;

use crate::config::Configuration;
use crate::s3::credentials::CredentialProbe;
use crate::s3::mirror::{Mirror, MirrorError, MirrorSummary};
use crate::utils::log_file::SyncLog;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{error, info, warn};

/// 同步失败的原因
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("sync failed: {0}")]
    Mirror(#[from] MirrorError),

    #[error("cannot write sync log: {0}")]
    Log(#[from] io::Error),
}

/// 同步目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTarget {
    pub source: PathBuf,
    pub bucket: String,
    pub prefix: String,
}

impl SyncTarget {
    pub fn from_config(config: &Configuration) -> Self {
        Self {
            source: config.sync_dir.clone(),
            bucket: config.bucket.clone(),
            prefix: config.prefix.clone(),
        }
    }

    fn destination(&self) -> String {
        let prefix = self.prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("s3://{}", self.bucket)
        } else {
            format!("s3://{}/{}", self.bucket, prefix)
        }
    }
}

/// 一次同步的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// 凭证不可用，本轮跳过
    Skipped,
    Completed(MirrorSummary),
}

/// 执行一次同步。
///
/// # 参数
///
/// * `probe` - 凭证探测器。
/// * `mirror` - 目录镜像实现。
/// * `target` - 源目录与目标存储桶。
/// * `log` - 同步状态日志。
///
/// # 返回值
///
/// 凭证不可用时返回 [`SyncOutcome::Skipped`]，不会发出任何远端请求。
///
/// # Errors
///
/// 镜像失败时记录 `sync failed` 日志并返回 [`SyncError::Mirror`]。
pub async fn run_sync(
    probe: &dyn CredentialProbe,
    mirror: &dyn Mirror,
    target: &SyncTarget,
    log: &SyncLog,
) -> Result<SyncOutcome, SyncError> {
    if let Err(reason) = probe.probe().await {
        warn!(%reason, "凭证不可用，跳过同步");
        log.append(&format!("no AWS credentials available ({}); skipping sync", reason))?;
        return Ok(SyncOutcome::Skipped);
    }

    let destination = target.destination();
    info!(source = %target.source.display(), %destination, "开始同步");
    log.append(&format!(
        "sync start: {} -> {}",
        target.source.display(),
        destination
    ))?;

    match mirror
        .mirror(&target.source, &target.bucket, &target.prefix)
        .await
    {
        Ok(summary) => {
            info!(?summary, "同步完成");
            log.append(&format!(
                "sync ok: uploaded {}, deleted {}, unchanged {} ({} bytes)",
                summary.uploaded, summary.deleted, summary.unchanged, summary.bytes_uploaded
            ))?;
            Ok(SyncOutcome::Completed(summary))
        }
        Err(e) => {
            error!(error = %e, "同步失败");
            log.append(&format!("sync failed: {}", e))?;
            Err(SyncError::Mirror(e))
        }
    }
}
