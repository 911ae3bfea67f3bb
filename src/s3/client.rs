//! S3 客户端模块
//!
//! 该模块负责加载 AWS 共享配置并创建 S3 客户端。

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_s3::Client;

/// 加载指定区域的 AWS 共享配置。
///
/// 凭证走 SDK 默认凭证链（环境变量、配置文件、实例角色），
/// 区域固定使用配置文件中的值。
///
/// # 参数
///
/// * `region` - 存储桶所在区域。
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(Some(Region::new(region.to_string())));

    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}

/// 使用共享配置创建 S3 客户端。
pub fn create_s3_client(sdk_config: &SdkConfig) -> Client {
    Client::new(sdk_config)
}
