/// 文本变更追踪模块
///
/// 该模块实现变更追踪系统，支持撤销/重做功能。
/// 记录所有对属性树文本字段进行的修改，便于审计和回滚。
use crate::codec::TextChange;

/// 文本变更追踪器
///
/// # 实现细节
/// - 使用两个栈实现撤销/重做：undo_stack 和 redo_stack
/// - 所有变更按时间顺序存储在 changes 向量中
/// - 栈中存储的是索引而非实际数据，避免数据拷贝
#[derive(Debug, Clone, Default)]
pub struct TextDelta {
    /// 所有变更的完整记录
    changes: Vec<TextChange>,
    /// 撤销栈（存储 changes 中的索引）
    undo_stack: Vec<usize>,
    /// 重做栈（存储 changes 中的索引）
    redo_stack: Vec<usize>,
}

impl TextDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一个变更
    ///
    /// 新变更会清空重做栈。
    pub fn add_change(&mut self, change: TextChange) {
        let index = self.changes.len();
        self.changes.push(change);
        self.undo_stack.push(index);
        self.redo_stack.clear();
    }

    /// 弹出最后一次变更，没有可撤销的变更时返回 None
    pub fn undo(&mut self) -> Option<&TextChange> {
        let index = self.undo_stack.pop()?;
        self.redo_stack.push(index);
        Some(&self.changes[index])
    }

    /// 重做最后一次撤销的变更
    pub fn redo(&mut self) -> Option<&TextChange> {
        let index = self.redo_stack.pop()?;
        self.undo_stack.push(index);
        Some(&self.changes[index])
    }

    /// 当前有效变更的数量（撤销栈大小）
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// 按应用顺序返回当前有效的变更
    pub fn iter(&self) -> impl Iterator<Item = &TextChange> {
        self.undo_stack.iter().map(|&idx| &self.changes[idx])
    }

    /// 获取所有变更（包括已撤销的）
    pub fn all_changes(&self) -> &[TextChange] {
        &self.changes
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.changes.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// 获取某个路径的所有有效变更
    pub fn changes_for_path<'a>(
        &'a self,
        path: &'a str,
    ) -> impl Iterator<Item = &'a TextChange> + 'a {
        self.iter().filter(move |change| change.path == path)
    }

    /// 生成变更摘要
    pub fn summary(&self) -> String {
        format!(
            "变更总数: {}, 有效变更: {}, 可撤销: {}, 可重做: {}",
            self.changes.len(),
            self.undo_stack.len(),
            self.can_undo(),
            self.can_redo()
        )
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 30 {
        format!("{}...", text.chars().take(30).collect::<String>())
    } else {
        text.to_string()
    }
}

impl std::fmt::Display for TextChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {:?} -> {:?}",
            self.path,
            preview(&self.old_text),
            preview(&self.new_text)
        )
    }
}
