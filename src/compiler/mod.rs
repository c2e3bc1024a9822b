//! 编译模块：将模板编译为可执行的正则匹配器与格式串
pub mod scanner;
pub mod format_spec;
pub mod pattern;
pub mod compiler;

pub use self::scanner::{Segment, TemplateScanner};
pub use self::format_spec::{FormatSpec, FormatToken};
pub use self::pattern::{CompiledPattern, FieldMap, GroupBinding};
pub use self::compiler::{TemplateCompiler, DEFAULT_PLACEHOLDER_EXPRESSION};
