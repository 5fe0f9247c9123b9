//! 属性树对象模型
//!
//! 值本身不携带完整类型信息：属性集中的每个值记录自己的类型哈希，
//! 其余结构（复合成员、数组元素、映射值）的含义由类型描述决定。

use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};

/// 属性树中的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Symbol(Symbol),
    /// 嵌套属性集
    Set(PropertySet),
    /// 复合类型的成员存储（按槽位）
    Struct(Vec<Value>),
    /// 动态数组或定长数组的元素存储
    Array(Vec<Value>),
    /// 映射条目（存储顺序）
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// 按单步定位子值
    pub fn child(&self, step: Step) -> Option<&Value> {
        match (self, step) {
            (Value::Set(set), Step::Key(index)) => set.value_at(index),
            (Value::Struct(fields), Step::Member(slot)) => fields.get(slot),
            (Value::Array(items), Step::Element(index)) => items.get(index),
            (Value::Map(entries), Step::MapValue(index)) => {
                entries.get(index).map(|(_, value)| value)
            }
            _ => None,
        }
    }

    pub fn child_mut(&mut self, step: Step) -> Option<&mut Value> {
        match (self, step) {
            (Value::Set(set), Step::Key(index)) => set.value_at_mut(index),
            (Value::Struct(fields), Step::Member(slot)) => fields.get_mut(slot),
            (Value::Array(items), Step::Element(index)) => items.get_mut(index),
            (Value::Map(entries), Step::MapValue(index)) => {
                entries.get_mut(index).map(|(_, value)| value)
            }
            _ => None,
        }
    }
}

/// 带类型的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    /// 值的声明类型
    pub type_hash: Symbol,
    pub data: Value,
}

/// 属性键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyKey {
    /// 键名符号
    pub name: Symbol,
    /// 值（可能为空）
    #[serde(default)]
    pub value: Option<TypedValue>,
}

/// 属性集
///
/// 键按插入顺序存储，遍历顺序即存储顺序。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    #[serde(default)]
    keys: Vec<PropertyKey>,
}

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置属性值
    ///
    /// 已存在的键保持原位置，否则追加到末尾。
    pub fn set(&mut self, name: Symbol, type_hash: Symbol, data: Value) {
        let value = Some(TypedValue { type_hash, data });
        match self.keys.iter_mut().find(|key| key.name == name) {
            Some(key) => key.value = value,
            None => self.keys.push(PropertyKey { name, value }),
        }
    }

    /// 添加一个没有值的键
    pub fn set_empty(&mut self, name: Symbol) {
        match self.keys.iter_mut().find(|key| key.name == name) {
            Some(key) => key.value = None,
            None => self.keys.push(PropertyKey { name, value: None }),
        }
    }

    pub fn get(&self, name: Symbol) -> Option<&TypedValue> {
        self.keys
            .iter()
            .find(|key| key.name == name)
            .and_then(|key| key.value.as_ref())
    }

    pub fn get_mut(&mut self, name: Symbol) -> Option<&mut TypedValue> {
        self.keys
            .iter_mut()
            .find(|key| key.name == name)
            .and_then(|key| key.value.as_mut())
    }

    /// 删除键，其余键保持顺序
    pub fn remove(&mut self, name: Symbol) -> Option<TypedValue> {
        let position = self.keys.iter().position(|key| key.name == name)?;
        self.keys.remove(position).value
    }

    pub fn keys(&self) -> impl Iterator<Item = &PropertyKey> {
        self.keys.iter()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn value_at(&self, index: usize) -> Option<&Value> {
        self.keys.get(index)?.value.as_ref().map(|typed| &typed.data)
    }

    fn value_at_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.keys.get_mut(index)?.value.as_mut().map(|typed| &mut typed.data)
    }

    /// 按定位路径查找值
    pub fn resolve(&self, location: &FieldLocation) -> Option<&Value> {
        let (first, rest) = location.steps().split_first()?;
        let Step::Key(index) = *first else {
            return None;
        };

        let mut node = self.value_at(index)?;
        for step in rest {
            node = node.child(*step)?;
        }
        Some(node)
    }

    pub fn resolve_mut(&mut self, location: &FieldLocation) -> Option<&mut Value> {
        let (first, rest) = location.steps().split_first()?;
        let Step::Key(index) = *first else {
            return None;
        };

        let mut node = self.value_at_mut(index)?;
        for step in rest {
            node = node.child_mut(*step)?;
        }
        Some(node)
    }

    /// 读取定位处的字符串字段
    pub fn string_at(&self, location: &FieldLocation) -> Option<&String> {
        match self.resolve(location)? {
            Value::String(text) => Some(text),
            _ => None,
        }
    }

    /// 获取定位处字符串字段的可变引用
    pub fn string_at_mut(&mut self, location: &FieldLocation) -> Option<&mut String> {
        match self.resolve_mut(location)? {
            Value::String(text) => Some(text),
            _ => None,
        }
    }
}

/// 定位步骤（存储索引，不含类型信息）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// 属性集第 i 个键
    Key(usize),
    /// 复合类型槽位
    Member(usize),
    /// 数组第 i 个元素
    Element(usize),
    /// 映射第 i 个条目的值
    MapValue(usize),
}

/// 字段定位：从根属性集出发的步骤序列
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldLocation(Vec<Step>);

impl FieldLocation {
    pub fn new(steps: Vec<Step>) -> Self {
        FieldLocation(steps)
    }

    pub fn steps(&self) -> &[Step] {
        &self.0
    }
}
