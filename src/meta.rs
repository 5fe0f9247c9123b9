//! 运行时类型描述
//!
//! 属性树的遍历完全由这里的类型元数据驱动：每个节点通过类型哈希在
//! [`TypeRegistry`] 中查到描述，再按 [`TypeKind`] 分派。

use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// 字符串类型名
pub const STRING_TYPE: &str = "String";
/// 属性集类型名
pub const PROPERTY_SET_TYPE: &str = "PropertySet";

const DYNAMIC_ARRAY_PREFIX: &str = "DCArray";
const FIXED_ARRAY_PREFIX: &str = "SArray";
const MAP_PREFIX: &str = "Map";

const DYNAMIC_ARRAY_SIZE: usize = 24;
const MAP_SIZE: usize = 32;

fn string_type_hash() -> Symbol {
    static HASH: OnceLock<Symbol> = OnceLock::new();
    *HASH.get_or_init(|| Symbol::from_name(STRING_TYPE))
}

/// 类型分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// 字符串叶子
    String,
    /// 属性集（键 -> 带类型的值）
    PropertySet,
    /// 动态数组
    DynamicArray,
    /// 定长数组
    FixedArray,
    /// 有序映射
    Map,
    /// 普通复合类型（按成员声明顺序遍历）
    Composite,
}

/// 成员描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescription {
    /// 成员名
    pub name: String,
    /// 成员在复合值存储中的槽位
    pub slot: usize,
    /// 成员类型哈希
    pub type_hash: Symbol,
}

/// 类型描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescription {
    /// 类型哈希
    pub hash: Symbol,
    /// 类型名（容器类型按名称前缀分类）
    pub type_name: String,
    /// 字节大小
    pub size: usize,
    /// 成员列表（声明顺序）
    #[serde(default)]
    pub members: Vec<MemberDescription>,
    /// 数组元素类型 / 映射值类型
    #[serde(default)]
    pub element: Option<Symbol>,
    /// 定长数组元素个数
    #[serde(default)]
    pub count: Option<usize>,
}

impl TypeDescription {
    /// 创建没有成员的标量类型描述
    pub fn scalar(type_name: &str, size: usize) -> Self {
        TypeDescription {
            hash: Symbol::from_name(type_name),
            type_name: type_name.to_string(),
            size,
            members: Vec::new(),
            element: None,
            count: None,
        }
    }

    /// 按类型哈希和名称前缀分类
    pub fn kind(&self) -> TypeKind {
        if self.hash == string_type_hash() {
            return TypeKind::String;
        }

        let name = self.type_name.as_str();
        if name == PROPERTY_SET_TYPE {
            TypeKind::PropertySet
        } else if name.starts_with(DYNAMIC_ARRAY_PREFIX) {
            TypeKind::DynamicArray
        } else if name.starts_with(FIXED_ARRAY_PREFIX) {
            TypeKind::FixedArray
        } else if name.starts_with(MAP_PREFIX) {
            TypeKind::Map
        } else {
            TypeKind::Composite
        }
    }
}

/// 类型注册表
///
/// 序列化为类型描述列表（按类型名排序）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<TypeDescription>", into = "Vec<TypeDescription>")]
pub struct TypeRegistry {
    types: HashMap<Symbol, TypeDescription>,
}

impl TypeRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含内置类型的注册表
    ///
    /// 内置类型：String、PropertySet、int、float、bool、Symbol
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(TypeDescription::scalar(STRING_TYPE, 8));
        registry.register(TypeDescription::scalar(PROPERTY_SET_TYPE, 56));
        registry.register(TypeDescription::scalar("int", 4));
        registry.register(TypeDescription::scalar("float", 4));
        registry.register(TypeDescription::scalar("bool", 1));
        registry.register(TypeDescription::scalar("Symbol", 8));
        registry
    }

    /// 注册类型描述，同哈希的旧描述会被替换
    pub fn register(&mut self, description: TypeDescription) -> Symbol {
        let hash = description.hash;
        self.types.insert(hash, description);
        hash
    }

    pub fn get(&self, hash: Symbol) -> Option<&TypeDescription> {
        self.types.get(&hash)
    }

    pub fn by_name(&self, type_name: &str) -> Option<&TypeDescription> {
        self.get(Symbol::from_name(type_name))
    }

    /// 解析容器的元素/值类型
    pub fn element_of(&self, description: &TypeDescription) -> Option<&TypeDescription> {
        description.element.and_then(|hash| self.get(hash))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// 注册 `DCArray<元素>`，元素类型未注册时返回 None
    pub fn register_dynamic_array(&mut self, element: Symbol) -> Option<Symbol> {
        let element_name = self.get(element)?.type_name.clone();
        let name = format!("{DYNAMIC_ARRAY_PREFIX}<{element_name}>");
        let mut description = TypeDescription::scalar(&name, DYNAMIC_ARRAY_SIZE);
        description.element = Some(element);
        Some(self.register(description))
    }

    /// 注册 `SArray<元素,个数>`
    pub fn register_fixed_array(&mut self, element: Symbol, count: usize) -> Option<Symbol> {
        let element_desc = self.get(element)?;
        let name = format!("{FIXED_ARRAY_PREFIX}<{},{count}>", element_desc.type_name);
        let mut description = TypeDescription::scalar(&name, element_desc.size * count);
        description.element = Some(element);
        description.count = Some(count);
        Some(self.register(description))
    }

    /// 注册 `Map<键,值>`
    pub fn register_map(&mut self, key: Symbol, value: Symbol) -> Option<Symbol> {
        let key_name = self.get(key)?.type_name.clone();
        let value_name = self.get(value)?.type_name.clone();
        let mut description =
            TypeDescription::scalar(&format!("{MAP_PREFIX}<{key_name},{value_name}>"), MAP_SIZE);
        description.element = Some(value);
        Some(self.register(description))
    }

    /// 注册普通复合类型，成员槽位按声明顺序分配
    pub fn register_composite(&mut self, type_name: &str, members: &[(&str, Symbol)]) -> Symbol {
        let size = members
            .iter()
            .filter_map(|(_, hash)| self.get(*hash))
            .map(|desc| desc.size)
            .sum();

        let mut description = TypeDescription::scalar(type_name, size);
        description.members = members
            .iter()
            .enumerate()
            .map(|(slot, (name, type_hash))| MemberDescription {
                name: name.to_string(),
                slot,
                type_hash: *type_hash,
            })
            .collect();

        self.register(description)
    }
}

impl From<Vec<TypeDescription>> for TypeRegistry {
    fn from(descriptions: Vec<TypeDescription>) -> Self {
        let mut registry = TypeRegistry::new();
        for description in descriptions {
            registry.register(description);
        }
        registry
    }
}

impl From<TypeRegistry> for Vec<TypeDescription> {
    fn from(registry: TypeRegistry) -> Self {
        let mut descriptions: Vec<TypeDescription> = registry.types.into_values().collect();
        descriptions.sort_by(|a, b| a.type_name.cmp(&b.type_name));
        descriptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_kinds() {
        let registry = TypeRegistry::with_builtins();

        assert_eq!(registry.by_name("String").unwrap().kind(), TypeKind::String);
        assert_eq!(registry.by_name("PropertySet").unwrap().kind(), TypeKind::PropertySet);
        assert_eq!(registry.by_name("int").unwrap().kind(), TypeKind::Composite);
    }

    #[test]
    fn test_container_kinds_by_prefix() {
        let mut registry = TypeRegistry::with_builtins();
        let string = Symbol::from_name(STRING_TYPE);
        let symbol = Symbol::from_name("Symbol");

        let array = registry.register_dynamic_array(string).unwrap();
        let fixed = registry.register_fixed_array(string, 3).unwrap();
        let map = registry.register_map(symbol, string).unwrap();

        assert_eq!(registry.get(array).unwrap().type_name, "DCArray<String>");
        assert_eq!(registry.get(array).unwrap().kind(), TypeKind::DynamicArray);

        let fixed_desc = registry.get(fixed).unwrap();
        assert_eq!(fixed_desc.kind(), TypeKind::FixedArray);
        assert_eq!(fixed_desc.count, Some(3));
        assert_eq!(fixed_desc.size, 24);

        assert_eq!(registry.get(map).unwrap().kind(), TypeKind::Map);
        assert_eq!(registry.element_of(registry.get(map).unwrap()).unwrap().hash, string);
    }

    #[test]
    fn test_container_of_unknown_element() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register_dynamic_array(Symbol::from_name("Missing")).is_none());
    }

    #[test]
    fn test_composite_slots_follow_declaration() {
        let mut registry = TypeRegistry::with_builtins();
        let string = Symbol::from_name(STRING_TYPE);
        let int = Symbol::from_name("int");

        let hash = registry.register_composite(
            "DialogLine",
            &[("speaker", string), ("id", int), ("text", string)],
        );
        let desc = registry.get(hash).unwrap();

        assert_eq!(desc.kind(), TypeKind::Composite);
        assert_eq!(desc.size, 20);
        let slots: Vec<_> = desc.members.iter().map(|m| (m.name.as_str(), m.slot)).collect();
        assert_eq!(slots, vec![("speaker", 0), ("id", 1), ("text", 2)]);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut registry = TypeRegistry::with_builtins();
        registry.register_dynamic_array(Symbol::from_name(STRING_TYPE));

        let json = serde_json::to_string(&registry).unwrap();
        let loaded: TypeRegistry = serde_json::from_str(&json).unwrap();

        assert_eq!(loaded, registry);
    }
}
