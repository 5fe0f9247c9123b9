/// IO 抽象层模块
///
/// 该模块提供了文本交换文件读写的抽象接口，支持依赖注入和测试 mock。
///
/// # 架构设计
///
/// - **traits**: 定义 Reader/Writer trait 接口
/// - **text_io**: 基于文件系统的默认实现
///
/// # 使用示例
///
/// ```rust,ignore
/// use prop_text::io::{DocumentReader, FsDocumentReader};
///
/// let reader = FsDocumentReader;
/// let bytes = reader.read(Path::new("ui_text.txt"))?;
/// ```
pub mod traits;
pub mod text_io;

// === 导出 trait 定义 ===
pub use traits::{DocumentReader, DocumentWriter};

// === 导出默认实现 ===
pub use text_io::{FsDocumentReader, FsDocumentWriter};
