//! 文本交换格式
//!
//! 导出格式：
//!
//! ```text
//! # TelltaleInspector PROP text export v2
//! # ENCODING: UTF8
//! # Edit only between [TEXT] and [/TEXT].
//!
//! ===== ENTRY 1 =====
//! # PATH: prop.title
//! # LANGUAGE: Unknown
//! [TEXT]
//! Hello
//! [/TEXT]
//!
//! ```
//!
//! 导入时同时接受旧版的 `路径<TAB>转义文本` 单行格式。

mod apply;
mod export;
mod parse;


pub use apply::{apply_updates, ApplyReport, TextChange};
pub use export::render_legacy;
pub use parse::{parse_document, ParsedDocument};

use crate::collector::PathCollector;
use crate::encoding::TextEncoding;
use crate::io::{DocumentReader, DocumentWriter, FsDocumentReader, FsDocumentWriter};
use crate::object::PropertySet;
use crate::utils::PropTextError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// 格式标记行
pub const FORMAT_HEADER: &str = "# TelltaleInspector PROP text export v2";
/// 编码指令前缀
pub const ENCODING_DIRECTIVE: &str = "# ENCODING:";
/// 编辑提示行
pub const EDIT_HINT: &str = "# Edit only between [TEXT] and [/TEXT].";
/// 路径指令前缀
pub const PATH_DIRECTIVE: &str = "# PATH:";
/// 语言指令前缀
pub const LANGUAGE_DIRECTIVE: &str = "# LANGUAGE:";
/// 文本块开始标记
pub const TEXT_OPEN: &str = "[TEXT]";
/// 文本块结束标记
pub const TEXT_CLOSE: &str = "[/TEXT]";

/// 文档条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEntry {
    pub path: String,
    /// 根据路径猜测的语言
    pub language: String,
    pub text: String,
}

/// 交换文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub encoding: TextEncoding,
    pub entries: Vec<TextEntry>,
}

/// 导出属性树的全部字符串到文本文件
///
/// 返回导出的条目数。
pub fn export(
    collector: &PathCollector<'_>,
    tree: &PropertySet,
    path: &Path,
    encoding: TextEncoding,
) -> Result<usize, PropTextError> {
    export_with(collector, tree, path, encoding, &FsDocumentWriter)
}

/// 使用指定写入器导出
pub fn export_with(
    collector: &PathCollector<'_>,
    tree: &PropertySet,
    path: &Path,
    encoding: TextEncoding,
    writer: &dyn DocumentWriter,
) -> Result<usize, PropTextError> {
    let entries = collector.collect(tree);
    let document = Document::from_tree(tree, &entries, encoding);

    writer
        .write(&document.to_bytes(), path)
        .map_err(|source| PropTextError::SinkUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    info!(count = document.len(), path = %path.display(), %encoding, "exported text entries");
    Ok(document.len())
}

/// 从文本文件导入修改
///
/// `forced_encoding` 为 None 时按文件中的 `# ENCODING:` 头解码。返回更新的字段数。
pub fn import(
    collector: &PathCollector<'_>,
    tree: &mut PropertySet,
    path: &Path,
    forced_encoding: Option<TextEncoding>,
) -> Result<usize, PropTextError> {
    import_with(collector, tree, path, forced_encoding, &FsDocumentReader)
        .map(|report| report.updated())
}

/// 使用指定读取器导入，返回完整的变更报告
pub fn import_with(
    collector: &PathCollector<'_>,
    tree: &mut PropertySet,
    path: &Path,
    forced_encoding: Option<TextEncoding>,
    reader: &dyn DocumentReader,
) -> Result<ApplyReport, PropTextError> {
    let bytes = reader
        .read(path)
        .map_err(|source| PropTextError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;

    let parsed = parse_document(&bytes, forced_encoding);
    // 重新遍历当前树，而不是沿用导出时的结果
    let entries = collector.collect(tree);
    let report = apply_updates(tree, &entries, &parsed.updates);

    info!(
        updated = report.updated(),
        unmatched = report.unmatched,
        path = %path.display(),
        encoding = %parsed.encoding,
        "imported text entries"
    );
    Ok(report)
}
