//! 镜像计划
//!
//! 比较本地文件与远端对象，得出需要上传和删除的内容。
//! 规则与 `aws s3 sync --delete` 一致：远端缺失、大小不同或本地修改时间
//! 更新时上传；远端多出的对象删除。

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// 本地待同步文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    /// 相对同步目录、以正斜杠分隔的路径
    pub relative: String,
    pub path: PathBuf,
    pub size: u64,
    /// 修改时间（Unix 秒）
    pub modified: Option<i64>,
}

/// 远端已存在的对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteObject {
    /// 去掉前缀后的相对键
    pub relative: String,
    /// 完整对象键
    pub key: String,
    pub size: u64,
    /// 最后修改时间（Unix 秒）
    pub last_modified: Option<i64>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MirrorPlan {
    pub uploads: Vec<LocalFile>,
    /// 需要删除的完整对象键
    pub deletions: Vec<String>,
    pub unchanged: usize,
}

/// 生成镜像计划。
///
/// 以 `/` 结尾的目录占位对象不参与比较，也不会被删除。
pub fn plan_mirror(local: Vec<LocalFile>, remote: Vec<RemoteObject>) -> MirrorPlan {
    let remote_by_relative: HashMap<&str, &RemoteObject> = remote
        .iter()
        .filter(|object| !object.key.ends_with('/'))
        .map(|object| (object.relative.as_str(), object))
        .collect();

    let mut plan = MirrorPlan::default();
    let mut seen = HashSet::with_capacity(local.len());

    for file in local {
        seen.insert(file.relative.clone());
        match remote_by_relative.get(file.relative.as_str()) {
            Some(object) if !needs_upload(&file, object) => plan.unchanged += 1,
            _ => plan.uploads.push(file),
        }
    }

    plan.deletions = remote_by_relative
        .into_values()
        .filter(|object| !seen.contains(&object.relative))
        .map(|object| object.key.clone())
        .collect();
    plan.deletions.sort();

    plan
}

fn needs_upload(file: &LocalFile, object: &RemoteObject) -> bool {
    if file.size != object.size {
        return true;
    }
    match (file.modified, object.last_modified) {
        (Some(local), Some(remote)) => local > remote,
        _ => false,
    }
}
