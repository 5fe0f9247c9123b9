/// 编辑器层模块
///
/// 该模块提供有状态的编辑接口，支持变更追踪、撤销/重做等高级功能。
/// 导入只修改内存中的属性树，持久化由调用方负责。
///
/// # 架构设计
///
/// - **prop_editor**: 属性集编辑器，持有类型注册表、符号表和属性树
/// - **delta**: 变更追踪系统，支持撤销/重做
///
/// # 使用示例
///
/// ```rust,ignore
/// use prop_text::{PropEditor, TextEncoding, TreeFile};
///
/// let mut editor = PropEditor::from_tree_file(TreeFile::load(Path::new("ui_text.json"))?);
///
/// editor.export(Path::new("ui_text.txt"), TextEncoding::Utf8)?;
/// let updated = editor.import(Path::new("ui_text.txt"), None)?;
/// println!("更新了 {} 处", updated);
///
/// editor.into_tree_file().save(Path::new("ui_text.json"))?;
/// ```
pub mod delta;
pub mod prop_editor;

// === 导出公共接口 ===
pub use delta::TextDelta;
pub use prop_editor::PropEditor;
