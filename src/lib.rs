pub mod codec;
pub mod collector;
pub mod editor;
pub mod encoding;
pub mod escape;
pub mod io;
pub mod language;
pub mod meta;
pub mod object;
pub mod stats;
pub mod symbol;
pub mod tree_file;
pub mod utils;

// 重新导出主要结构
pub use codec::{export, import, ApplyReport, Document, TextChange, TextEntry};
pub use collector::{CollectOptions, PathCollector, PathEntry};
pub use editor::{PropEditor, TextDelta};
pub use encoding::TextEncoding;
pub use meta::{MemberDescription, TypeDescription, TypeKind, TypeRegistry};
pub use object::{FieldLocation, PropertySet, Step, TypedValue, Value};
pub use stats::TextStats;
pub use symbol::{Symbol, SymbolResolver, SymbolTable};
pub use tree_file::TreeFile;
pub use utils::PropTextError;
