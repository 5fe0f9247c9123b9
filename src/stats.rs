use crate::codec::Document;
use serde::Serialize;
use std::collections::BTreeMap;

/// 文本字段统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub entry_count: usize,
    pub empty_count: usize,
    pub multiline_count: usize,
    /// 语言 -> 条目数
    pub languages: BTreeMap<String, usize>,
}

impl TextStats {
    pub fn from_document(document: &Document) -> Self {
        let mut stats = TextStats {
            entry_count: document.len(),
            ..TextStats::default()
        };

        for entry in &document.entries {
            if entry.text.is_empty() {
                stats.empty_count += 1;
            }
            if entry.text.contains('\n') {
                stats.multiline_count += 1;
            }
            *stats.languages.entry(entry.language.clone()).or_insert(0) += 1;
        }

        stats
    }
}

impl std::fmt::Display for TextStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== 文本统计信息 ===")?;
        writeln!(f, "文本字段数: {}", self.entry_count)?;
        writeln!(f, "空文本数: {}", self.empty_count)?;
        writeln!(f, "多行文本数: {}", self.multiline_count)?;
        for (language, count) in &self.languages {
            writeln!(f, "语言 {}: {}", language, count)?;
        }
        Ok(())
    }
}
