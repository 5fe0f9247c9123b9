use super::{
    Document, TextEntry, EDIT_HINT, ENCODING_DIRECTIVE, FORMAT_HEADER, LANGUAGE_DIRECTIVE,
    PATH_DIRECTIVE, TEXT_CLOSE, TEXT_OPEN,
};
use crate::collector::PathEntry;
use crate::encoding::TextEncoding;
use crate::escape::escape;
use crate::language::guess_language;
use crate::object::PropertySet;
use std::fmt;
use tracing::debug;

impl Document {
    /// 按遍历顺序读取每个字段的当前文本
    pub fn from_tree(tree: &PropertySet, entries: &[PathEntry], encoding: TextEncoding) -> Self {
        let entries = entries
            .iter()
            .filter_map(|entry| {
                let Some(text) = tree.string_at(&entry.location) else {
                    debug!(path = %entry.path, "field no longer resolves, skipped");
                    return None;
                };
                Some(TextEntry {
                    path: entry.path.clone(),
                    language: guess_language(&entry.path).to_string(),
                    text: text.clone(),
                })
            })
            .collect();

        Document { encoding, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按文档编码生成文件内容
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encoding.encode(&self.to_string()).into_owned()
    }
}

/// 文档的文本形式（未编码）
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{FORMAT_HEADER}")?;
        writeln!(f, "{ENCODING_DIRECTIVE} {}", self.encoding.label())?;
        writeln!(f, "{EDIT_HINT}")?;
        writeln!(f)?;

        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "===== ENTRY {} =====", index + 1)?;
            writeln!(f, "{PATH_DIRECTIVE} {}", entry.path)?;
            writeln!(f, "{LANGUAGE_DIRECTIVE} {}", entry.language)?;
            writeln!(f, "{TEXT_OPEN}")?;
            writeln!(f, "{}", entry.text)?;
            writeln!(f, "{TEXT_CLOSE}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// 生成旧版 `路径<TAB>转义文本` 格式
pub fn render_legacy(document: &Document) -> String {
    document
        .entries
        .iter()
        .map(|entry| format!("{}\t{}\n", entry.path, escape(&entry.text)))
        .collect()
}
