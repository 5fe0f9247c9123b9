use std::path::{Path, PathBuf};
use thiserror::Error;

/// 自定义错误类型
///
/// 只有 IO 失败会作为错误返回；树结构不一致（字段缺失、路径不匹配、块格式错误）一律静默跳过。
#[derive(Error, Debug)]
pub enum PropTextError {
    #[error("Could not write the output text file {}: {source}", .path.display())]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not open/read the text file {}: {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 属性文件扩展名
pub const PROP_EXTENSION: &str = "prop";
/// 文本导出文件扩展名
pub const TEXT_EXTENSION: &str = "txt";
/// 未命名属性集的导出文件名
pub const DEFAULT_EXPORT_STEM: &str = "prop_export";

/// 计算默认导出路径
///
/// 文件名取自属性集名称（去掉 `.prop` 后缀），为空时使用 `prop_export`；
/// 已知属性文件路径时放在同一目录下。
pub fn default_export_path(prop_file_path: Option<&Path>, prop_name: &str) -> PathBuf {
    let stem = if prop_name.is_empty() {
        DEFAULT_EXPORT_STEM
    } else {
        prop_name
            .strip_suffix(&format!(".{PROP_EXTENSION}"))
            .unwrap_or(prop_name)
    };
    let file_name = format!("{stem}.{TEXT_EXTENSION}");

    match prop_file_path.and_then(Path::parent) {
        Some(parent) => parent.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// 创建文件备份
pub fn create_backup(file_path: &Path) -> Result<PathBuf, PropTextError> {
    if !file_path.exists() {
        return Err(PropTextError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "原文件不存在",
        )));
    }

    let timestamp = chrono::Local::now().format("%Y-%m-%d-%H-%M-%S");
    let backup_path = file_path.with_extension(format!("{}.bak", timestamp));

    std::fs::copy(file_path, &backup_path)?;

    Ok(backup_path)
}
