//! 解析模块：模板集的解析/格式化编排、结果缓存与注册表
pub mod outcome;
pub mod cache;
pub mod resolver;
pub mod registry;

// 导出核心接口
pub use self::outcome::{Formatted, FormattedAll, Resolved, ResolvedAll};
pub use self::cache::{MemoCache, ResolveCache};
pub use self::resolver::Resolver;
pub use self::registry::ResolverRegistry;
