//! 属性树 JSON 文件
//!
//! 命令行工具使用的树容器：类型注册表、符号表和根属性集。

use crate::meta::TypeRegistry;
use crate::object::PropertySet;
use crate::symbol::SymbolTable;
use crate::utils::PropTextError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeFile {
    /// 类型注册表
    #[serde(default)]
    pub types: TypeRegistry,
    /// 键名符号表
    #[serde(default)]
    pub symbols: SymbolTable,
    /// 根属性集
    pub root: PropertySet,
}

impl TreeFile {
    /// 从 JSON 文件加载
    pub fn load(path: &Path) -> Result<Self, PropTextError> {
        let file = File::open(path).map_err(|source| PropTextError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// 保存为格式化的 JSON 文件
    pub fn save(&self, path: &Path) -> Result<(), PropTextError> {
        let file = File::create(path).map_err(|source| PropTextError::SinkUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
