/// 属性集编辑器模块
///
/// 提供有状态的编辑接口：导出、导入修改、撤销/重做。
use super::delta::TextDelta;
use crate::codec::{self, Document};
use crate::collector::{CollectOptions, PathCollector, PathEntry};
use crate::encoding::TextEncoding;
use crate::io::{DocumentReader, DocumentWriter, FsDocumentReader, FsDocumentWriter};
use crate::meta::TypeRegistry;
use crate::object::PropertySet;
use crate::stats::TextStats;
use crate::symbol::SymbolTable;
use crate::tree_file::TreeFile;
use crate::utils::PropTextError;
use std::path::Path;

/// 属性集编辑器 - 管理属性树的文本修改状态
///
/// # 核心特性
/// - **Stateful**: 持有属性树，导入的修改只作用于内存
/// - **可追踪**: 记录每个被修改的字段，支持撤销/重做
///
/// # 使用示例
///
/// ```rust,ignore
/// let mut editor = PropEditor::new(registry, symbols, tree);
///
/// let exported = editor.export(Path::new("ui_text.txt"), TextEncoding::Utf8)?;
/// // ... 外部编辑 ui_text.txt ...
/// let updated = editor.import(Path::new("ui_text.txt"), None)?;
///
/// editor.undo()?;
/// ```
#[derive(Debug, Clone)]
pub struct PropEditor {
    registry: TypeRegistry,
    symbols: SymbolTable,
    tree: PropertySet,
    options: CollectOptions,
    /// 变更追踪器
    history: TextDelta,
}

impl PropEditor {
    pub fn new(registry: TypeRegistry, symbols: SymbolTable, tree: PropertySet) -> Self {
        Self {
            registry,
            symbols,
            tree,
            options: CollectOptions::default(),
            history: TextDelta::new(),
        }
    }

    pub fn from_tree_file(file: TreeFile) -> Self {
        Self::new(file.types, file.symbols, file.root)
    }

    /// 交还树文件（丢弃变更记录）
    pub fn into_tree_file(self) -> TreeFile {
        TreeFile {
            types: self.registry,
            symbols: self.symbols,
            root: self.tree,
        }
    }

    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn collector(&self) -> PathCollector<'_> {
        PathCollector::new(&self.registry, &self.symbols).with_options(self.options.clone())
    }

    /// 当前树的全部字符串字段
    pub fn entries(&self) -> Vec<PathEntry> {
        self.collector().collect(&self.tree)
    }

    /// 生成当前树的交换文档
    pub fn document(&self, encoding: TextEncoding) -> Document {
        Document::from_tree(&self.tree, &self.entries(), encoding)
    }

    pub fn stats(&self) -> TextStats {
        TextStats::from_document(&self.document(TextEncoding::default()))
    }

    /// 导出到文本文件，返回条目数
    pub fn export(&self, path: &Path, encoding: TextEncoding) -> Result<usize, PropTextError> {
        self.export_with(path, encoding, &FsDocumentWriter)
    }

    pub fn export_with(
        &self,
        path: &Path,
        encoding: TextEncoding,
        writer: &dyn DocumentWriter,
    ) -> Result<usize, PropTextError> {
        codec::export_with(&self.collector(), &self.tree, path, encoding, writer)
    }

    /// 从文本文件导入修改，返回更新的字段数
    pub fn import(
        &mut self,
        path: &Path,
        forced_encoding: Option<TextEncoding>,
    ) -> Result<usize, PropTextError> {
        self.import_with(path, forced_encoding, &FsDocumentReader)
    }

    pub fn import_with(
        &mut self,
        path: &Path,
        forced_encoding: Option<TextEncoding>,
        reader: &dyn DocumentReader,
    ) -> Result<usize, PropTextError> {
        let collector =
            PathCollector::new(&self.registry, &self.symbols).with_options(self.options.clone());
        let report = codec::import_with(&collector, &mut self.tree, path, forced_encoding, reader)?;

        let updated = report.updated();
        for change in report.changes {
            self.history.add_change(change);
        }
        Ok(updated)
    }

    /// 撤销最后一次字段修改
    ///
    /// # 注意
    /// 变更按字段位置回写；如果通过 [`PropEditor::tree_mut`] 改动过树结构，位置可能已经失效，
    /// 失效的变更只会弹出记录。
    pub fn undo(&mut self) -> Result<(), PropTextError> {
        let change = self.history.undo().ok_or(PropTextError::NothingToUndo)?;
        if let Some(field) = self.tree.string_at_mut(&change.location) {
            field.clone_from(&change.old_text);
        }
        Ok(())
    }

    /// 重做上一次撤销的修改
    pub fn redo(&mut self) -> Result<(), PropTextError> {
        let change = self.history.redo().ok_or(PropTextError::NothingToRedo)?;
        if let Some(field) = self.tree.string_at_mut(&change.location) {
            field.clone_from(&change.new_text);
        }
        Ok(())
    }

    pub fn tree(&self) -> &PropertySet {
        &self.tree
    }

    /// 获取属性树的可变引用
    ///
    /// # 警告
    /// 直接修改树结构可能导致变更记录中的位置失效
    pub fn tree_mut(&mut self) -> &mut PropertySet {
        &mut self.tree
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn history(&self) -> &TextDelta {
        &self.history
    }

    pub fn is_modified(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn modified_count(&self) -> usize {
        self.history.len()
    }

    /// 清除所有修改记录（不恢复树状态）
    pub fn clear_modifications(&mut self) {
        self.history.clear();
    }

    /// 生成编辑摘要
    pub fn summary(&self) -> String {
        format!(
            "属性键: {}, 修改状态: {}, {}",
            self.tree.len(),
            if self.is_modified() { "已修改" } else { "未修改" },
            self.history.summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::STRING_TYPE;
    use crate::object::Value;
    use crate::symbol::Symbol;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// 内存中的文档存储，用于替代文件系统
    #[derive(Default)]
    struct MemoryStore {
        files: RefCell<HashMap<PathBuf, Vec<u8>>>,
    }

    impl DocumentReader for MemoryStore {
        fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
            self.files
                .borrow()
                .get(path)
                .cloned()
                .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "missing"))
        }
    }

    impl DocumentWriter for MemoryStore {
        fn write(&self, bytes: &[u8], path: &Path) -> std::io::Result<()> {
            self.files.borrow_mut().insert(path.to_path_buf(), bytes.to_vec());
            Ok(())
        }
    }

    impl MemoryStore {
        fn edit(&self, path: &Path, from: &str, to: &str) {
            let mut files = self.files.borrow_mut();
            let bytes = files.get_mut(path).unwrap();
            let text = String::from_utf8(bytes.clone()).unwrap().replacen(from, to, 1);
            *bytes = text.into_bytes();
        }
    }

    fn create_test_editor() -> PropEditor {
        let mut registry = TypeRegistry::with_builtins();
        let mut symbols = SymbolTable::new();
        let string = Symbol::from_name(STRING_TYPE);
        let lines = registry.register_dynamic_array(string).unwrap();

        let mut tree = PropertySet::new();
        tree.set(symbols.intern("title"), string, Value::String("Hello".to_string()));
        tree.set(
            symbols.intern("lines"),
            lines,
            Value::Array(vec![Value::String("A".to_string()), Value::String("B".to_string())]),
        );

        PropEditor::new(registry, symbols, tree)
    }

    fn text_at(editor: &PropEditor, path: &str) -> String {
        let entry = editor.entries().into_iter().find(|e| e.path == path).unwrap();
        editor.tree().string_at(&entry.location).unwrap().clone()
    }

    #[test]
    fn test_editor_state() {
        let editor = create_test_editor();

        assert!(!editor.is_modified());
        assert_eq!(editor.modified_count(), 0);
        assert_eq!(editor.entries().len(), 3);
        assert!(editor.summary().contains("未修改"));
    }

    #[test]
    fn test_import_records_changes() {
        let store = MemoryStore::default();
        let path = Path::new("ui_text.txt");
        let mut editor = create_test_editor();

        assert_eq!(editor.export_with(path, TextEncoding::Utf8, &store).unwrap(), 3);
        store.edit(path, "[TEXT]\nB\n", "[TEXT]\nB2\n");

        let updated = editor.import_with(path, None, &store).unwrap();

        assert_eq!(updated, 1);
        assert!(editor.is_modified());
        assert_eq!(text_at(&editor, "prop.lines[1]"), "B2");
        assert_eq!(editor.history().iter().next().unwrap().old_text, "B");
    }

    #[test]
    fn test_undo_redo_restores_text() {
        let store = MemoryStore::default();
        let path = Path::new("ui_text.txt");
        let mut editor = create_test_editor();

        editor.export_with(path, TextEncoding::Utf8, &store).unwrap();
        store.edit(path, "[TEXT]\nHello\n", "[TEXT]\nBonjour\n");
        editor.import_with(path, None, &store).unwrap();
        assert_eq!(text_at(&editor, "prop.title"), "Bonjour");

        editor.undo().unwrap();
        assert_eq!(text_at(&editor, "prop.title"), "Hello");
        assert!(!editor.is_modified());

        editor.redo().unwrap();
        assert_eq!(text_at(&editor, "prop.title"), "Bonjour");

        assert!(matches!(editor.redo(), Err(PropTextError::NothingToRedo)));
    }

    #[test]
    fn test_undo_when_empty() {
        let mut editor = create_test_editor();
        assert!(matches!(editor.undo(), Err(PropTextError::NothingToUndo)));
    }

    #[test]
    fn test_import_missing_file() {
        let store = MemoryStore::default();
        let mut editor = create_test_editor();

        let result = editor.import_with(Path::new("missing.txt"), None, &store);
        assert!(matches!(result, Err(PropTextError::SourceUnavailable { .. })));
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_tree_file_roundtrip() {
        let editor = create_test_editor();
        let tree = editor.tree().clone();

        let editor = PropEditor::from_tree_file(editor.into_tree_file());
        assert_eq!(editor.tree(), &tree);
    }
}
