use std::path::{Component, Path};

/// 将前缀与相对路径拼接为完整的对象键
///
/// 前缀非空时结果为 `prefix/relative`，前缀末尾与相对路径开头多余的
/// 正斜杠会被合并；前缀为空时原样返回相对路径。
///
/// # 参数
///
/// * `prefix` - 配置中的对象键前缀
/// * `relative` - 相对于前缀的路径
///
/// # 示例
///
/// ```
/// use s3_relay::utils::path::object_key;
///
/// assert_eq!(object_key("uploads", "a/b.txt"), "uploads/a/b.txt");
/// assert_eq!(object_key("uploads/", "/a/b.txt"), "uploads/a/b.txt");
/// assert_eq!(object_key("", "a/b.txt"), "a/b.txt");
/// ```
pub fn object_key(prefix: &str, relative: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        relative.to_string()
    } else {
        format!("{}/{}", prefix, relative.trim_start_matches('/'))
    }
}

/// 列举远端对象时使用的前缀
///
/// 非空前缀会补上末尾的正斜杠，避免 `uploads` 匹配到 `uploads2/...`。
pub fn listing_prefix(prefix: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{}/", prefix)
    }
}

/// 将本地相对路径转换为以正斜杠分隔的键
///
/// 路径包含非 UTF-8 字符或非普通组件（如 `..`）时返回 `None`。
pub fn relative_key(relative: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
