/// IO 抽象层 - trait 定义
///
/// 读写只处理原始字节，编码与解析由 codec 负责。
use std::path::Path;

/// 文本文件读取 trait
///
/// # 职责
/// - 从文件系统（或其他来源）读取交换文件的原始字节
/// - 不负责解码和解析
pub trait DocumentReader {
    /// 读取文件的全部字节
    ///
    /// # 参数
    /// * `path` - 文件路径
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// 文本文件写入 trait
///
/// # 职责
/// - 将编码后的文档写入目标位置（覆盖已有内容）
pub trait DocumentWriter {
    /// 写入文件
    ///
    /// # 参数
    /// * `bytes` - 编码后的文档
    /// * `path` - 目标文件路径
    fn write(&self, bytes: &[u8], path: &Path) -> std::io::Result<()>;
}
