//! 配置管理：解析器选项与模板集配置文件

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ResolvaError, ResolvaResult};
use crate::resolver::Resolver;

/// 解析器选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    // 正则是否锚定字符串开头
    pub anchor_start: bool,
    // 正则是否锚定字符串结尾
    pub anchor_end: bool,
    // 是否校验重复占位符取值一致
    pub check_duplicate_placeholders: bool,
    // 是否启用解析结果缓存（无上限）
    pub cache_enabled: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            anchor_start: true,
            anchor_end: true,
            check_duplicate_placeholders: true,
            cache_enabled: true,
        }
    }
}

/// 选项构建器
#[derive(Debug, Clone, Default)]
pub struct ResolverOptionsBuilder {
    options: ResolverOptions,
}

impl ResolverOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchor_start(mut self, anchor: bool) -> Self {
        self.options.anchor_start = anchor;
        self
    }

    pub fn anchor_end(mut self, anchor: bool) -> Self {
        self.options.anchor_end = anchor;
        self
    }

    pub fn check_duplicate_placeholders(mut self, check: bool) -> Self {
        self.options.check_duplicate_placeholders = check;
        self
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.options.cache_enabled = enabled;
        self
    }

    pub fn build(self) -> ResolverOptions {
        self.options
    }
}

/// 模板集配置（JSON）
///
/// ```json
/// {
///   "options": { "anchor_end": false },
///   "patterns": { "shot": "{project}/{type:s}", "project": "{project}" }
/// }
/// ```
///
/// `patterns` 中的标签顺序即解析顺序。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSetConfig {
    #[serde(default)]
    pub options: ResolverOptions,
    pub patterns: serde_json::Map<String, serde_json::Value>,
}

impl PatternSetConfig {
    /// 从JSON字符串加载
    pub fn from_json_str(json: &str) -> ResolvaResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从JSON文件加载
    pub fn from_json_file(path: impl AsRef<Path>) -> ResolvaResult<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }

    fn validate(&self) -> ResolvaResult<()> {
        if self.patterns.is_empty() {
            return Err(ResolvaError::Config("patterns 不能为空".to_string()));
        }
        if let Some((label, _)) = self.patterns.iter().find(|(_, value)| !value.is_string()) {
            return Err(ResolvaError::Config(format!("模板 {:?} 必须是字符串", label)));
        }
        Ok(())
    }

    /// 按定义顺序返回 (标签, 模板)
    pub fn pattern_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.patterns
            .iter()
            .filter_map(|(label, value)| value.as_str().map(|pattern| (label.as_str(), pattern)))
    }

    /// 编译为解析器
    pub fn build(&self) -> ResolvaResult<Resolver> {
        self.validate()?;
        Resolver::with_options(self.pattern_pairs(), self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ResolverOptions::default();
        assert!(options.anchor_start);
        assert!(options.anchor_end);
        assert!(options.check_duplicate_placeholders);
        assert!(options.cache_enabled);
    }

    #[test]
    fn test_config_preserves_label_order() {
        let config = PatternSetConfig::from_json_str(
            r#"{"patterns": {"shot": "{project}/{type:s}", "asset": "{project}/{type:a}", "project": "{project}"}}"#,
        )
        .unwrap();
        let labels: Vec<&str> = config.pattern_pairs().map(|(label, _)| label).collect();
        assert_eq!(labels, vec!["shot", "asset", "project"]);
        assert_eq!(config.options, ResolverOptions::default());
    }

    #[test]
    fn test_config_partial_options() {
        let config = PatternSetConfig::from_json_str(
            r#"{"options": {"anchor_end": false, "cache_enabled": false}, "patterns": {"a": "{a}"}}"#,
        )
        .unwrap();
        assert!(config.options.anchor_start);
        assert!(!config.options.anchor_end);
        assert!(!config.options.cache_enabled);
        assert!(config.options.check_duplicate_placeholders);
    }

    #[test]
    fn test_config_rejects_empty_and_non_string() {
        let err = PatternSetConfig::from_json_str(r#"{"patterns": {}}"#).unwrap_err();
        assert!(matches!(err, ResolvaError::Config(_)));

        let err = PatternSetConfig::from_json_str(r#"{"patterns": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, ResolvaError::Config(_)));

        let err = PatternSetConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, ResolvaError::Json(_)));
    }

    #[test]
    fn test_config_build() {
        let config = PatternSetConfig::from_json_str(r#"{"patterns": {"shot": "{project}/{type:s}"}}"#).unwrap();
        let resolver = config.build().unwrap();
        assert_eq!(resolver.labels().collect::<Vec<_>>(), vec!["shot"]);
    }
}
