//! S3模块
//!
//! 该模块负责与 S3 存储桶的交互，包括客户端配置、凭证探测、
//! 预签名URL生成以及目录镜像。

// 声明子模块
pub mod client;
pub mod credentials;
pub mod mirror;
pub mod presign;

// 重新导出常用的函数
pub use client::{create_s3_client, load_sdk_config};
pub use presign::{Direction, PresignRequest, generate_presigned_url};
