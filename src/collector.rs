//! 字符串字段收集
//!
//! 按类型元数据深度优先遍历属性树，为每个可达的字符串字段生成路径：
//!
//! - 属性集键、复合成员：`前缀.名称`
//! - 数组元素：`前缀[i]`
//! - 映射值（按存储位置）：`前缀{i}`
//!
//! 路径是导出/导入之间匹配字段的唯一依据，因此遍历顺序必须稳定：
//! 键按插入顺序、成员按声明顺序、元素按下标顺序。

use crate::meta::{TypeDescription, TypeKind, TypeRegistry};
use crate::object::{FieldLocation, PropertySet, Step, Value};
use crate::symbol::SymbolResolver;
use tracing::debug;

/// 默认根路径
pub const DEFAULT_ROOT_PATH: &str = "prop";
/// 默认最大递归深度
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// 收集选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectOptions {
    /// 路径前缀
    pub root_path: String,
    /// 最大递归深度，超出的分支被截断
    pub max_depth: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            root_path: DEFAULT_ROOT_PATH.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// 路径条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// 显示路径，如 `prop.lines[1]`
    pub path: String,
    /// 字段在树中的位置
    pub location: FieldLocation,
}

/// 字符串字段收集器
pub struct PathCollector<'a> {
    registry: &'a TypeRegistry,
    symbols: &'a dyn SymbolResolver,
    options: CollectOptions,
}

impl<'a> PathCollector<'a> {
    pub fn new(registry: &'a TypeRegistry, symbols: &'a dyn SymbolResolver) -> Self {
        Self {
            registry,
            symbols,
            options: CollectOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CollectOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CollectOptions {
        &self.options
    }

    /// 收集根属性集下的所有字符串字段
    pub fn collect(&self, root: &PropertySet) -> Vec<PathEntry> {
        let mut out = Vec::new();
        let mut location = Vec::new();
        self.visit_set(root, &self.options.root_path, &mut location, 0, &mut out);
        debug!(count = out.len(), "collected string fields");
        out
    }

    fn visit(
        &self,
        ty: Option<&TypeDescription>,
        value: Option<&Value>,
        path: &str,
        location: &mut Vec<Step>,
        depth: usize,
        out: &mut Vec<PathEntry>,
    ) {
        let (Some(ty), Some(value)) = (ty, value) else {
            return;
        };
        if depth > self.options.max_depth {
            debug!(path, depth, "depth limit reached, branch truncated");
            return;
        }

        match ty.kind() {
            TypeKind::String => {
                if let Value::String(_) = value {
                    out.push(PathEntry {
                        path: path.to_string(),
                        location: FieldLocation::new(location.clone()),
                    });
                }
            }
            TypeKind::PropertySet => {
                if let Value::Set(set) = value {
                    self.visit_set(set, path, location, depth, out);
                }
            }
            TypeKind::DynamicArray => {
                let Some(element) = self.registry.element_of(ty) else {
                    debug!(path, type_name = %ty.type_name, "array element type not registered");
                    return;
                };
                let Value::Array(items) = value else {
                    return;
                };
                for (index, item) in items.iter().enumerate() {
                    let child_path = format!("{path}[{index}]");
                    self.descend(
                        Some(element),
                        Some(item),
                        &child_path,
                        Step::Element(index),
                        location,
                        depth,
                        out,
                    );
                }
            }
            TypeKind::FixedArray => {
                let Some(element) = self.registry.element_of(ty) else {
                    debug!(path, type_name = %ty.type_name, "array element type not registered");
                    return;
                };
                let Value::Array(items) = value else {
                    return;
                };
                for index in 0..ty.count.unwrap_or(0) {
                    let child_path = format!("{path}[{index}]");
                    self.descend(
                        Some(element),
                        items.get(index),
                        &child_path,
                        Step::Element(index),
                        location,
                        depth,
                        out,
                    );
                }
            }
            TypeKind::Map => {
                let Some(value_type) = self.registry.element_of(ty) else {
                    debug!(path, type_name = %ty.type_name, "map value type not registered");
                    return;
                };
                let Value::Map(entries) = value else {
                    return;
                };
                for (index, (_, item)) in entries.iter().enumerate() {
                    let child_path = format!("{path}{{{index}}}");
                    self.descend(
                        Some(value_type),
                        Some(item),
                        &child_path,
                        Step::MapValue(index),
                        location,
                        depth,
                        out,
                    );
                }
            }
            TypeKind::Composite => {
                let fields: &[Value] = match value {
                    Value::Struct(fields) => fields,
                    _ => &[],
                };
                for member in &ty.members {
                    let child_path = format!("{path}.{}", member.name);
                    self.descend(
                        self.registry.get(member.type_hash),
                        fields.get(member.slot),
                        &child_path,
                        Step::Member(member.slot),
                        location,
                        depth,
                        out,
                    );
                }
            }
        }
    }

    fn visit_set(
        &self,
        set: &PropertySet,
        path: &str,
        location: &mut Vec<Step>,
        depth: usize,
        out: &mut Vec<PathEntry>,
    ) {
        for (index, key) in set.keys().enumerate() {
            let Some(typed) = key.value.as_ref() else {
                continue;
            };
            let child_path = format!("{path}.{}", self.symbols.display_name(key.name));
            self.descend(
                self.registry.get(typed.type_hash),
                Some(&typed.data),
                &child_path,
                Step::Key(index),
                location,
                depth,
                out,
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn descend(
        &self,
        ty: Option<&TypeDescription>,
        value: Option<&Value>,
        path: &str,
        step: Step,
        location: &mut Vec<Step>,
        depth: usize,
        out: &mut Vec<PathEntry>,
    ) {
        location.push(step);
        self.visit(ty, value, path, location, depth + 1, out);
        location.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::STRING_TYPE;
    use crate::symbol::{Symbol, SymbolTable};

    struct Fixture {
        registry: TypeRegistry,
        symbols: SymbolTable,
        root: PropertySet,
    }

    fn text(value: &str) -> Value {
        Value::String(value.to_string())
    }

    fn member(name: &str, slot: usize, type_hash: Symbol) -> crate::meta::MemberDescription {
        crate::meta::MemberDescription {
            name: name.to_string(),
            slot,
            type_hash,
        }
    }

    fn collect_all(fixture: &Fixture) -> Vec<PathEntry> {
        PathCollector::new(&fixture.registry, &fixture.symbols).collect(&fixture.root)
    }

    /// prop.title / prop.lines[0..2]
    fn create_simple_fixture() -> Fixture {
        let mut registry = TypeRegistry::with_builtins();
        let mut symbols = SymbolTable::new();
        let string = Symbol::from_name(STRING_TYPE);
        let lines_type = registry.register_dynamic_array(string).unwrap();

        let mut root = PropertySet::new();
        root.set(symbols.intern("title"), string, text("Hello"));
        root.set(symbols.intern("lines"), lines_type, Value::Array(vec![text("A"), text("B")]));

        Fixture { registry, symbols, root }
    }

    fn paths(fixture: &Fixture) -> Vec<String> {
        PathCollector::new(&fixture.registry, &fixture.symbols)
            .collect(&fixture.root)
            .into_iter()
            .map(|entry| entry.path)
            .collect()
    }

    #[test]
    fn test_collect_simple_tree() {
        let fixture = create_simple_fixture();
        assert_eq!(paths(&fixture), vec!["prop.title", "prop.lines[0]", "prop.lines[1]"]);
    }

    #[test]
    fn test_collect_is_deterministic() {
        let fixture = create_simple_fixture();
        let collector = PathCollector::new(&fixture.registry, &fixture.symbols);

        assert_eq!(collector.collect(&fixture.root), collector.collect(&fixture.root));
    }

    #[test]
    fn test_locations_resolve_to_strings() {
        let fixture = create_simple_fixture();
        let entries = collect_all(&fixture);

        let texts: Vec<_> = entries
            .iter()
            .map(|entry| fixture.root.string_at(&entry.location).unwrap().as_str())
            .collect();
        assert_eq!(texts, vec!["Hello", "A", "B"]);
    }

    #[test]
    fn test_map_uses_storage_index() {
        let mut fixture = create_simple_fixture();
        let string = Symbol::from_name(STRING_TYPE);
        let int = Symbol::from_name("int");
        let map_type = fixture.registry.register_map(int, string).unwrap();

        // 存储顺序与键顺序相反
        let map = Value::Map(vec![(Value::Int(9), text("nine")), (Value::Int(1), text("one"))]);
        fixture.root = PropertySet::new();
        fixture.root.set(fixture.symbols.intern("m"), map_type, map);

        let entries = collect_all(&fixture);
        assert_eq!(entries[0].path, "prop.m{0}");
        assert_eq!(entries[1].path, "prop.m{1}");
        assert_eq!(fixture.root.string_at(&entries[0].location).unwrap(), "nine");
    }

    #[test]
    fn test_fixed_array_uses_declared_count() {
        let mut fixture = create_simple_fixture();
        let string = Symbol::from_name(STRING_TYPE);
        let fixed = fixture.registry.register_fixed_array(string, 3).unwrap();

        fixture.root = PropertySet::new();
        // 存储只有两个元素，第三个视为缺失
        let names = fixture.symbols.intern("names");
        fixture.root.set(names, fixed, Value::Array(vec![text("x"), text("y")]));

        assert_eq!(paths(&fixture), vec!["prop.names[0]", "prop.names[1]"]);
    }

    #[test]
    fn test_composite_members_in_declaration_order() {
        let mut fixture = create_simple_fixture();
        let string = Symbol::from_name(STRING_TYPE);
        let int = Symbol::from_name("int");

        let mut description = crate::meta::TypeDescription::scalar("DialogLine", 16);
        // 声明顺序与槽位顺序不同
        description.members = vec![
            member("text", 2, string),
            member("id", 0, int),
            member("speaker", 1, string),
        ];
        let line = fixture.registry.register(description);

        fixture.root = PropertySet::new();
        fixture.root.set(
            fixture.symbols.intern("line"),
            line,
            Value::Struct(vec![Value::Int(7), text("Clem"), text("Hi")]),
        );

        let entries = collect_all(&fixture);
        let found: Vec<_> = entries
            .iter()
            .map(|entry| {
                let text = fixture.root.string_at(&entry.location).unwrap();
                (entry.path.as_str(), text.as_str())
            })
            .collect();
        assert_eq!(found, vec![("prop.line.text", "Hi"), ("prop.line.speaker", "Clem")]);
    }

    #[test]
    fn test_nested_property_set_and_containers() {
        let mut fixture = create_simple_fixture();
        let string = Symbol::from_name(STRING_TYPE);
        let set_type = Symbol::from_name(crate::meta::PROPERTY_SET_TYPE);
        let sets = fixture.registry.register_dynamic_array(set_type).unwrap();

        let mut inner = PropertySet::new();
        inner.set(fixture.symbols.intern("english"), string, text("Yes"));
        inner.set(fixture.symbols.intern("count"), Symbol::from_name("int"), Value::Int(3));

        let choices = fixture.symbols.intern("choices");
        fixture.root.set(choices, sets, Value::Array(vec![Value::Set(inner)]));

        assert_eq!(
            paths(&fixture),
            vec!["prop.title", "prop.lines[0]", "prop.lines[1]", "prop.choices[0].english"]
        );
    }

    #[test]
    fn test_unresolved_key_uses_hash_text() {
        let fixture = create_simple_fixture();
        let empty = SymbolTable::new();
        let entries = PathCollector::new(&fixture.registry, &empty).collect(&fixture.root);

        assert_eq!(entries[0].path, format!("prop.{}", Symbol::from_name("title")));
    }

    #[test]
    fn test_absent_values_and_types_are_skipped() {
        let mut fixture = create_simple_fixture();
        fixture.root.set_empty(fixture.symbols.intern("empty"));
        let unknown = fixture.symbols.intern("unknown");
        fixture.root.set(unknown, Symbol::from_name("Unregistered"), text("x"));
        // 类型与值不一致
        let wrong = fixture.symbols.intern("wrong");
        fixture.root.set(wrong, Symbol::from_name(STRING_TYPE), Value::Int(1));

        assert_eq!(paths(&fixture), vec!["prop.title", "prop.lines[0]", "prop.lines[1]"]);
    }

    #[test]
    fn test_depth_limit_truncates_branch() {
        let mut fixture = create_simple_fixture();
        let set_type = Symbol::from_name(crate::meta::PROPERTY_SET_TYPE);
        let string = Symbol::from_name(STRING_TYPE);
        let deep = fixture.symbols.intern("deep");
        let leaf = fixture.symbols.intern("leaf");

        // prop.deep.deep.deep.leaf，叶子位于深度 4
        let mut node = PropertySet::new();
        node.set(leaf, string, text("bottom"));
        for _ in 0..3 {
            let mut parent = PropertySet::new();
            parent.set(deep, set_type, Value::Set(node));
            node = parent;
        }
        fixture.root = node;

        let collect = |max_depth| {
            PathCollector::new(&fixture.registry, &fixture.symbols)
                .with_options(CollectOptions { max_depth, ..CollectOptions::default() })
                .collect(&fixture.root)
                .len()
        };

        assert_eq!(collect(4), 1);
        assert_eq!(collect(3), 0);
    }

    #[test]
    fn test_custom_root_path() {
        let fixture = create_simple_fixture();
        let entries = PathCollector::new(&fixture.registry, &fixture.symbols)
            .with_options(CollectOptions {
                root_path: "root".to_string(),
                ..CollectOptions::default()
            })
            .collect(&fixture.root);

        assert_eq!(entries[0].path, "root.title");
    }
}
