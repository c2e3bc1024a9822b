//! 解析结果缓存
//! 按调用参数记忆解析结果，生命周期与所属解析器一致，默认无上限

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::debug;

use super::outcome::{Resolved, ResolvedAll};
use crate::compiler::FieldMap;

/// 通用记忆缓存（读写锁保护，可跨线程共享）
#[derive(Debug)]
pub struct MemoCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> Default for MemoCache<K, V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K: Hash + Eq, V: Clone> MemoCache<K, V> {
    pub fn get(&self, key: &K) -> Option<V> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key, value);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 解析器的三类解析缓存
///
/// 只缓存成功的结果（含"未匹配"）；重复占位符冲突等错误不缓存，每次调用都会重新报错。
#[derive(Debug)]
pub struct ResolveCache {
    enabled: AtomicBool,
    first: MemoCache<String, Resolved>,
    one: MemoCache<(String, String), Option<FieldMap>>,
    all: MemoCache<String, ResolvedAll>,
}

impl ResolveCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            first: MemoCache::default(),
            one: MemoCache::default(),
            all: MemoCache::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// 开关缓存；关闭时同时清空已有条目
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        if !enabled {
            self.clear();
        }
    }

    pub fn clear(&self) {
        self.first.clear();
        self.one.clear();
        self.all.clear();
        debug!("解析缓存已清空");
    }

    /// 三类缓存的条目总数
    pub fn len(&self) -> usize {
        self.first.len() + self.one.len() + self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn first(&self, input: &str) -> Option<Resolved> {
        let hit = self.is_enabled().then(|| self.first.get(&input.to_string())).flatten();
        if hit.is_some() {
            debug!("缓存命中 resolve_first({:?})", input);
        }
        hit
    }

    pub(crate) fn store_first(&self, input: &str, value: &Resolved) {
        if self.is_enabled() {
            self.first.insert(input.to_string(), value.clone());
        }
    }

    pub(crate) fn one(&self, input: &str, label: &str) -> Option<Option<FieldMap>> {
        let hit = self
            .is_enabled()
            .then(|| self.one.get(&(input.to_string(), label.to_string())))
            .flatten();
        if hit.is_some() {
            debug!("缓存命中 resolve_one({:?}, {:?})", input, label);
        }
        hit
    }

    pub(crate) fn store_one(&self, input: &str, label: &str, value: &Option<FieldMap>) {
        if self.is_enabled() {
            self.one.insert((input.to_string(), label.to_string()), value.clone());
        }
    }

    pub(crate) fn all(&self, input: &str) -> Option<ResolvedAll> {
        let hit = self.is_enabled().then(|| self.all.get(&input.to_string())).flatten();
        if hit.is_some() {
            debug!("缓存命中 resolve_all({:?})", input);
        }
        hit
    }

    pub(crate) fn store_all(&self, input: &str, value: &ResolvedAll) {
        if self.is_enabled() {
            self.all.insert(input.to_string(), value.clone());
        }
    }
}
