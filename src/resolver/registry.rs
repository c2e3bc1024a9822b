//! 解析器注册表
//! 按标识符保存解析器实例；由调用方在启动时创建并持有句柄，不使用全局状态

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::resolver::Resolver;
use crate::error::ResolvaResult;

/// 解析器注册表
///
/// 同一标识符重复注册时后者覆盖前者（仅记录日志，不报错）。
#[derive(Debug, Default)]
pub struct ResolverRegistry {
    instances: RwLock<HashMap<String, Arc<Resolver>>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册解析器，返回被覆盖的旧实例
    pub fn register(&self, id: impl Into<String>, resolver: impl Into<Arc<Resolver>>) -> Option<Arc<Resolver>> {
        let id = id.into();
        let resolver = resolver.into();
        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);

        let previous = instances.insert(id.clone(), Arc::clone(&resolver));
        if previous.is_some() {
            info!("解析器 \"{}\" 已存在，将被覆盖为：{}", id, resolver);
        } else {
            info!("解析器 \"{}\" 注册完成：{}", id, resolver);
        }
        previous
    }

    /// 查找解析器；不存在时返回 None
    pub fn lookup(&self, id: &str) -> Option<Arc<Resolver>> {
        let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
        let found = instances.get(id).cloned();
        if found.is_none() {
            info!("未找到标识为 \"{}\" 的解析器", id);
        }
        found
    }

    /// 已存在则直接返回，否则调用 `init` 创建并注册
    ///
    /// `init` 执行期间不持有锁，可以在其中访问注册表；
    /// 并发初始化同一标识符时，先写入者胜出，其余结果被丢弃。
    pub fn get_or_register<F>(&self, id: &str, init: F) -> ResolvaResult<Arc<Resolver>>
    where
        F: FnOnce() -> ResolvaResult<Resolver>,
    {
        {
            let instances = self.instances.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = instances.get(id) {
                return Ok(Arc::clone(existing));
            }
        }

        let created = Arc::new(init()?);

        let mut instances = self.instances.write().unwrap_or_else(PoisonError::into_inner);
        let resolver = instances
            .entry(id.to_string())
            .or_insert_with(|| {
                info!("解析器 \"{}\" 注册完成：{}", id, created);
                Arc::clone(&created)
            })
            .clone();
        Ok(resolver)
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Resolver>> {
        self.instances.write().unwrap_or_else(PoisonError::into_inner).remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.read().unwrap_or_else(PoisonError::into_inner).contains_key(id)
    }

    /// 已注册的标识符（无序）
    pub fn ids(&self) -> Vec<String> {
        self.instances
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.instances.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolvaError;
    use std::thread;

    fn resolver(pattern: &str) -> Resolver {
        Resolver::new([("label", pattern)]).unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ResolverRegistry::new();
        assert!(registry.lookup("sids").is_none());

        assert!(registry.register("sids", resolver("{project}")).is_none());
        let found = registry.lookup("sids").unwrap();
        assert_eq!(found.pattern_for("label"), Some("{project}"));
        assert!(registry.contains("sids"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_last_registration_wins() {
        let registry = ResolverRegistry::new();
        registry.register("sids", resolver("{a}"));
        let previous = registry.register("sids", resolver("{b}")).unwrap();

        assert_eq!(previous.pattern_for("label"), Some("{a}"));
        assert_eq!(registry.lookup("sids").unwrap().pattern_for("label"), Some("{b}"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_get_or_register() {
        let registry = ResolverRegistry::new();
        let first = registry.get_or_register("sids", || Ok(resolver("{a}"))).unwrap();
        let second = registry
            .get_or_register("sids", || panic!("已注册时不应再次初始化"))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let err = registry
            .get_or_register("broken", || Resolver::new([("bad", "{a}}")]))
            .unwrap_err();
        assert!(matches!(err, ResolvaError::PatternCompilation { .. }));
        assert!(!registry.contains("broken"));
    }

    #[test]
    fn test_get_or_register_init_can_use_registry() {
        let registry = Arc::new(ResolverRegistry::new());
        registry.register("base", resolver("{project}/{type:s}"));

        let (tx, rx) = std::sync::mpsc::channel();
        let shared = Arc::clone(&registry);
        thread::spawn(move || {
            let derived = shared.get_or_register("derived", || {
                let base = shared.lookup("base").expect("base 应已注册");
                let pattern = format!("{}/{{sequence}}", base.pattern_for("label").unwrap_or_default());
                Resolver::new([("label", pattern)])
            });
            let _ = tx.send(derived.map(|r| r.pattern_for("label").map(str::to_string)));
        });

        let result = rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .expect("init 中访问注册表不应阻塞");
        assert_eq!(result.unwrap(), Some("{project}/{type:s}/{sequence}".to_string()));
        assert!(registry.contains("derived"));
    }

    #[test]
    fn test_get_or_register_keeps_existing_instance() {
        let registry = ResolverRegistry::new();
        let first = registry
            .get_or_register("sids", || {
                // init 期间另一方抢先注册：返回已存在的实例
                registry.register("sids", resolver("{winner}"));
                Ok(resolver("{loser}"))
            })
            .unwrap();
        assert_eq!(first.pattern_for("label"), Some("{winner}"));
        assert_eq!(registry.lookup("sids").unwrap().pattern_for("label"), Some("{winner}"));
    }

    #[test]
    fn test_remove_and_ids() {
        let registry = ResolverRegistry::new();
        registry.register("a", resolver("{a}"));
        registry.register("b", resolver("{b}"));

        let mut ids = registry.ids();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);

        assert!(registry.remove("a").is_some());
        assert!(registry.remove("a").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_shared_across_threads() {
        let registry = Arc::new(ResolverRegistry::new());
        registry.register("shots", resolver("{project}/{type:s}"));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let resolver = registry.lookup("shots").unwrap();
                    let input = format!("project{}/s", i);
                    let fields = resolver.resolve_one(&input, "label").unwrap().unwrap();
                    fields["project"].clone()
                })
            })
            .collect();

        let mut projects: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        projects.sort();
        assert_eq!(projects, vec!["project0", "project1", "project2", "project3"]);
    }
}
