use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;

/// 符号（名称哈希）
///
/// 属性键名和类型名都以哈希形式存储，显示时需要通过 [`SymbolResolver`] 还原名称。
/// 哈希对名称大小写不敏感。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(u64);

impl Symbol {
    /// 从原始哈希值创建
    pub const fn from_raw(raw: u64) -> Self {
        Symbol(raw)
    }

    /// 计算名称的符号哈希（小写名称 SHA-256 的前 8 字节）
    pub fn from_name(name: &str) -> Self {
        let digest = Sha256::digest(name.to_ascii_lowercase().as_bytes());
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&digest[..8]);
        Symbol(u64::from_le_bytes(raw))
    }

    /// 原始哈希值
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// 未解析的符号显示为 16 位十六进制
impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016X}", self.0)
    }
}

/// 符号名称解析器
pub trait SymbolResolver {
    /// 查找符号对应的名称
    fn resolve(&self, symbol: Symbol) -> Option<&str>;

    /// 获取显示名称，未知符号回退为哈希文本
    fn display_name(&self, symbol: Symbol) -> String {
        self.resolve(symbol)
            .map(str::to_string)
            .unwrap_or_else(|| symbol.to_string())
    }
}

/// 符号表
///
/// 序列化为名称列表，加载时重新计算哈希。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolTable {
    names: HashMap<Symbol, String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记名称并返回其符号
    pub fn intern(&mut self, name: &str) -> Symbol {
        let symbol = Symbol::from_name(name);
        self.names.entry(symbol).or_insert_with(|| name.to_string());
        symbol
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, symbol: Symbol) -> Option<&str> {
        self.names.get(&symbol).map(String::as_str)
    }
}

impl From<Vec<String>> for SymbolTable {
    fn from(names: Vec<String>) -> Self {
        let mut table = SymbolTable::new();
        for name in &names {
            table.intern(name);
        }
        table
    }
}

impl From<SymbolTable> for Vec<String> {
    fn from(table: SymbolTable) -> Self {
        let mut names: Vec<String> = table.names.into_values().collect();
        names.sort();
        names
    }
}
