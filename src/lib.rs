//! resolva - 双向路径模板引擎
//!
//! 模板（如 `{project}/{type:s}/{sequence}`）被编译为正则匹配器与格式串：
//! 解析时从字符串中提取字段，格式化时由字段还原字符串，并回匹配校验结果。

// 导出全局错误类型
pub use self::error::{ResolvaError, ResolvaResult};

// 导出配置模块
pub use self::config::{PatternSetConfig, ResolverOptions, ResolverOptionsBuilder};

// 导出编译模块核心接口
pub use self::compiler::{CompiledPattern, FieldMap, TemplateCompiler};

// 导出解析模块核心接口
pub use self::resolver::{
    Formatted, FormattedAll, Resolved, ResolvedAll, Resolver, ResolverRegistry,
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod compiler;
pub mod resolver;
