//! 目录镜像模块
//!
//! 将本地目录单向镜像到存储桶前缀下：新增、更新和删除。

use crate::sync::plan::{RemoteObject, plan_mirror};
use crate::sync::scan::{ScanError, scan_directory};
use crate::utils::path::{listing_prefix, object_key};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 镜像失败的原因
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("directory scan aborted: {0}")]
    ScanTask(#[from] tokio::task::JoinError),

    #[error("failed to list s3://{bucket}/{prefix}: {message}")]
    List {
        bucket: String,
        prefix: String,
        message: String,
    },

    #[error("failed to upload {key}: {message}")]
    Upload { key: String, message: String },

    #[error("failed to delete {key}: {message}")]
    Delete { key: String, message: String },
}

/// 一次镜像的统计结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MirrorSummary {
    pub uploaded: usize,
    pub deleted: usize,
    pub unchanged: usize,
    pub bytes_uploaded: u64,
}

/// 目录镜像接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mirror: Send + Sync {
    /// 将 `source` 目录镜像到 `bucket` 的 `prefix` 下。
    async fn mirror(
        &self,
        source: &Path,
        bucket: &str,
        prefix: &str,
    ) -> Result<MirrorSummary, MirrorError>;
}

/// 基于 S3 客户端的镜像实现
pub struct S3Mirror {
    s3_client: Client,
}

impl S3Mirror {
    pub fn new(s3_client: Client) -> Self {
        Self { s3_client }
    }

    /// 分页列出前缀下的所有对象。
    async fn list_remote(&self, bucket: &str, prefix: &str) -> Result<Vec<RemoteObject>, MirrorError> {
        let listing_prefix = listing_prefix(prefix);
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut request = self
                .s3_client
                .list_objects_v2()
                .bucket(bucket)
                .prefix(&listing_prefix);

            if let Some(ref token) = continuation_token {
                request = request.continuation_token(token);
            }

            let response = request.send().await.map_err(|err| MirrorError::List {
                bucket: bucket.to_string(),
                prefix: listing_prefix.clone(),
                message: DisplayErrorContext(&err).to_string(),
            })?;

            for object in response.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                let relative = key.strip_prefix(&listing_prefix).unwrap_or(key);
                objects.push(RemoteObject {
                    relative: relative.to_string(),
                    key: key.to_string(),
                    size: object.size().map(|s| s as u64).unwrap_or(0),
                    last_modified: object.last_modified().map(|dt| dt.secs()),
                });
            }

            if response.is_truncated() == Some(true) {
                continuation_token = response.next_continuation_token().map(str::to_string);
            } else {
                break;
            }
        }

        Ok(objects)
    }

    async fn upload(&self, bucket: &str, key: &str, path: &Path) -> Result<(), MirrorError> {
        let upload_error = |message: String| MirrorError::Upload {
            key: key.to_string(),
            message,
        };

        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| upload_error(e.to_string()))?;
        let content_type = mime_guess::from_path(path).first_or_octet_stream();

        self.s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type.as_ref())
            .body(body)
            .send()
            .await
            .map_err(|e| upload_error(DisplayErrorContext(&e).to_string()))?;

        Ok(())
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), MirrorError> {
        self.s3_client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| MirrorError::Delete {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}

#[async_trait]
impl Mirror for S3Mirror {
    async fn mirror(
        &self,
        source: &Path,
        bucket: &str,
        prefix: &str,
    ) -> Result<MirrorSummary, MirrorError> {
        let root: PathBuf = source.to_path_buf();
        let local = tokio::task::spawn_blocking(move || scan_directory(&root)).await??;
        let remote = self.list_remote(bucket, prefix).await?;

        let plan = plan_mirror(local, remote);
        debug!(
            uploads = plan.uploads.len(),
            deletions = plan.deletions.len(),
            unchanged = plan.unchanged,
            "镜像计划"
        );

        let mut summary = MirrorSummary {
            unchanged: plan.unchanged,
            ..Default::default()
        };

        for file in &plan.uploads {
            let key = object_key(prefix, &file.relative);
            self.upload(bucket, &key, &file.path).await?;
            info!(key = %key, size = file.size, "已上传");
            summary.uploaded += 1;
            summary.bytes_uploaded += file.size;
        }

        for key in &plan.deletions {
            self.delete(bucket, key).await?;
            info!(key = %key, "已删除");
            summary.deleted += 1;
        }

        Ok(summary)
    }
}
