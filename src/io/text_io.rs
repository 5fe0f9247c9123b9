/// 文本交换文件 IO 实现
///
/// 提供基于文件系统的默认读写实现
use super::traits::{DocumentReader, DocumentWriter};
use std::path::Path;

/// 默认的文本文件读取器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct FsDocumentReader;

impl DocumentReader for FsDocumentReader {
    fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// 默认的文本文件写入器（基于 std::fs）
#[derive(Debug, Clone, Default)]
pub struct FsDocumentWriter;

impl DocumentWriter for FsDocumentWriter {
    /// 父目录不存在时失败，不会自动创建
    fn write(&self, bytes: &[u8], path: &Path) -> std::io::Result<()> {
        std::fs::write(path, bytes)
    }
}
