//! S3 中继库
//!
//! 为一个私有 S3 存储桶提供文件中继，主要功能包括：
//! - 从 `KEY="value"` 配置文件加载存储桶、区域、前缀等配置
//! - 生成限时的 GET/PUT 预签名 URL
//! - 由定时器周期触发，将本地目录单向镜像到存储桶（含删除）
//! - 将同步结果追加写入带时间戳的日志文件

pub mod cli;
pub mod config;
pub mod error;
pub mod s3;
pub mod sync;
pub mod utils;
