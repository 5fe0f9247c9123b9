use crate::collector::PathEntry;
use crate::object::{FieldLocation, PropertySet};
use std::collections::{HashMap, HashSet};
use std::mem;
use tracing::debug;

/// 单个字段的修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChange {
    pub path: String,
    pub location: FieldLocation,
    /// 修改前的文本
    pub old_text: String,
    /// 修改后的文本
    pub new_text: String,
}

/// 应用结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// 实际发生变化的字段（遍历顺序）
    pub changes: Vec<TextChange>,
    /// 在当前树中找不到的路径数
    pub unmatched: usize,
}

impl ApplyReport {
    /// 更新的字段数
    pub fn updated(&self) -> usize {
        self.changes.len()
    }
}

/// 将路径 -> 文本映射应用到树上
///
/// `entries` 应该是对当前树的新一轮遍历结果。只有文本不同的字段会被覆盖并计数；
/// 映射中在树里找不到的路径被忽略（字段可能已被删除或改名）。
pub fn apply_updates(
    tree: &mut PropertySet,
    entries: &[PathEntry],
    updates: &HashMap<String, String>,
) -> ApplyReport {
    let mut report = ApplyReport::default();

    for entry in entries {
        let Some(new_text) = updates.get(&entry.path) else {
            continue;
        };
        let Some(field) = tree.string_at_mut(&entry.location) else {
            debug!(path = %entry.path, "field no longer resolves, skipped");
            continue;
        };
        if *field == *new_text {
            continue;
        }

        let old_text = mem::replace(field, new_text.clone());
        report.changes.push(TextChange {
            path: entry.path.clone(),
            location: entry.location.clone(),
            old_text,
            new_text: new_text.clone(),
        });
    }

    let known: HashSet<&str> = entries.iter().map(|entry| entry.path.as_str()).collect();
    report.unmatched = updates
        .keys()
        .filter(|path| !known.contains(path.as_str()))
        .inspect(|path| debug!(path = %path, "path not found in current tree"))
        .count();

    report
}
