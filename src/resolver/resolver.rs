//! 解析器核心：一组带标签的已编译模板，提供解析与格式化
use std::collections::BTreeSet;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, info};

use super::cache::ResolveCache;
use super::outcome::{Formatted, FormattedAll, Resolved, ResolvedAll};
use crate::compiler::{CompiledPattern, FieldMap, TemplateCompiler};
use crate::config::ResolverOptions;
use crate::error::ResolvaResult;

/// 模板解析器
///
/// 构建后模板不可变，可在多个线程间共享（`Arc<Resolver>`）；
/// 唯一的可变状态是内部的解析缓存。
pub struct Resolver {
    patterns: IndexMap<String, CompiledPattern>,
    options: ResolverOptions,
    cache: ResolveCache,
}

impl Resolver {
    /// 使用默认选项创建解析器
    pub fn new<I, L, P>(patterns: I) -> ResolvaResult<Self>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<str>,
    {
        Self::with_options(patterns, ResolverOptions::default())
    }

    /// 使用自定义选项创建解析器
    pub fn with_options<I, L, P>(patterns: I, options: ResolverOptions) -> ResolvaResult<Self>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<str>,
    {
        let patterns = TemplateCompiler::compile_all(patterns, &options)?;
        info!("解析器初始化完成，模板数：{}", patterns.len());

        Ok(Self {
            patterns,
            options,
            cache: ResolveCache::new(options.cache_enabled),
        })
    }

    // ======== 访问器 ========

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// 标签列表（定义顺序）
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// (标签, 原始模板)
    pub fn patterns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.patterns.iter().map(|(label, p)| (label.as_str(), p.pattern()))
    }

    pub fn compiled(&self, label: &str) -> Option<&CompiledPattern> {
        self.patterns.get(label)
    }

    pub fn pattern_for(&self, label: &str) -> Option<&str> {
        self.patterns.get(label).map(CompiledPattern::pattern)
    }

    /// 编译后的正则源码（诊断用）
    pub fn regex_for(&self, label: &str) -> Option<&str> {
        self.patterns.get(label).map(CompiledPattern::describe)
    }

    pub fn format_for(&self, label: &str) -> Option<&str> {
        self.patterns.get(label).map(CompiledPattern::format_spec)
    }

    pub fn keys_for(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.patterns.get(label).map(CompiledPattern::keys)
    }

    /// (标签, 占位符集合)
    pub fn keys(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.patterns.iter().map(|(label, p)| (label.as_str(), p.keys()))
    }

    // ======== 缓存控制 ========

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn set_cache_enabled(&self, enabled: bool) {
        self.cache.set_enabled(enabled);
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    // ======== 解析 ========

    /// 按定义顺序返回第一个匹配的标签及字段
    pub fn resolve_first(&self, input: &str) -> ResolvaResult<Resolved> {
        if input.is_empty() {
            return Ok(Resolved::NotFound);
        }
        if let Some(cached) = self.cache.first(input) {
            return Ok(cached);
        }

        let mut result = Resolved::NotFound;
        for (label, pattern) in &self.patterns {
            if let Some(fields) = pattern.extract(input, self.options.check_duplicate_placeholders)? {
                result = Resolved::Found {
                    label: label.clone(),
                    fields,
                };
                break;
            }
        }

        self.cache.store_first(input, &result);
        Ok(result)
    }

    /// 仅用指定标签的模板解析；标签不存在或未匹配时返回 None
    pub fn resolve_one(&self, input: &str, label: &str) -> ResolvaResult<Option<FieldMap>> {
        if input.is_empty() {
            return Ok(None);
        }
        let Some(pattern) = self.patterns.get(label) else {
            return Ok(None);
        };
        if let Some(cached) = self.cache.one(input, label) {
            return Ok(cached);
        }

        let result = pattern.extract(input, self.options.check_duplicate_placeholders)?;
        self.cache.store_one(input, label, &result);
        Ok(result)
    }

    /// 返回所有匹配的标签及字段
    pub fn resolve_all(&self, input: &str) -> ResolvaResult<ResolvedAll> {
        if input.is_empty() {
            return Ok(ResolvedAll::new());
        }
        if let Some(cached) = self.cache.all(input) {
            return Ok(cached);
        }

        let mut found = ResolvedAll::new();
        for (label, pattern) in &self.patterns {
            if let Some(fields) = pattern.extract(input, self.options.check_duplicate_placeholders)? {
                found.insert(label.clone(), fields);
            }
        }

        self.cache.store_all(input, &found);
        Ok(found)
    }

    // ======== 格式化 ========

    /// 按定义顺序返回第一个键集合一致且通过回匹配校验的格式化结果
    pub fn format_first(&self, fields: &FieldMap) -> Formatted {
        if fields.is_empty() {
            return Formatted::NotFound;
        }

        self.patterns
            .values()
            .find_map(|pattern| {
                self.format_with(pattern, fields).map(|path| Formatted::Found {
                    label: pattern.label().to_string(),
                    path,
                })
            })
            .unwrap_or(Formatted::NotFound)
    }

    /// 用指定标签的模板格式化；标签不存在、键集合不一致或回匹配失败时返回 None
    pub fn format_one(&self, fields: &FieldMap, label: &str) -> Option<String> {
        if fields.is_empty() {
            return None;
        }
        let Some(pattern) = self.patterns.get(label) else {
            info!("格式化请求的标签 {:?} 不存在", label);
            return None;
        };
        self.format_with(pattern, fields)
    }

    /// 返回所有键集合一致且通过回匹配校验的格式化结果
    pub fn format_all(&self, fields: &FieldMap) -> FormattedAll {
        if fields.is_empty() {
            return FormattedAll::new();
        }

        self.patterns
            .values()
            .filter_map(|pattern| {
                self.format_with(pattern, fields)
                    .map(|path| (pattern.label().to_string(), path))
            })
            .collect()
    }

    /// 格式化 + 回匹配校验：结果必须能被同一模板重新解析出完全相同的字段
    fn format_with(&self, pattern: &CompiledPattern, fields: &FieldMap) -> Option<String> {
        let formatted = pattern.render(fields)?;

        match self.resolve_one(&formatted, pattern.label()) {
            Ok(Some(ref found)) if found == fields => Some(formatted),
            Ok(found) => {
                debug!(
                    "回匹配校验失败 \"{}\" ({})：解析结果 {:?}",
                    formatted,
                    pattern.label(),
                    found
                );
                None
            }
            Err(e) => {
                debug!("回匹配校验失败 \"{}\" ({})：{}", formatted, pattern.label(), e);
                None
            }
        }
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("patterns", &self.patterns().collect::<IndexMap<_, _>>())
            .field("options", &self.options)
            .field("cache_len", &self.cache.len())
            .finish()
    }
}

impl fmt::Display for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[resolva.Resolver] Pattern labels: {:?}", self.labels().collect::<Vec<_>>())
    }
}
