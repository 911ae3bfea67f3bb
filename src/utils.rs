//! 工具函数模块
//!
//! 此模块包含了项目中使用的各种工具函数：
//! - 对象键与路径处理
//! - 同步状态日志文件

pub mod log_file;
pub mod path;
