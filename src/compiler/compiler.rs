//! 模板编译器核心
//! 将模板字符串编译为 正则 + 格式串 + 占位符集合

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::time::Instant;

use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use super::format_spec::FormatSpec;
use super::pattern::{CompiledPattern, GroupBinding};
use super::scanner::{Segment, TemplateScanner};
use crate::config::ResolverOptions;
use crate::error::{ResolvaError, ResolvaResult};

/// 未给出约束时占位符的默认表达式：任意长度的非 `/` 字符
pub const DEFAULT_PLACEHOLDER_EXPRESSION: &str = "[^/]*";

/// 模板编译器
pub struct TemplateCompiler;

impl TemplateCompiler {
    /// 编译一组带标签的模板（保持定义顺序）
    pub fn compile_all<I, L, P>(patterns: I, options: &ResolverOptions) -> ResolvaResult<IndexMap<String, CompiledPattern>>
    where
        I: IntoIterator<Item = (L, P)>,
        L: Into<String>,
        P: AsRef<str>,
    {
        let start = Instant::now();
        let mut compiled = IndexMap::new();
        let mut group_count = 0;

        for (label, pattern) in patterns {
            let label = label.into();
            let pattern = Self::compile(&label, pattern.as_ref(), options)?;
            group_count += pattern.groups.len();
            // 重复标签：后者覆盖前者，位置保持首次出现处
            compiled.insert(label, pattern);
        }

        debug!(
            "模板编译完成，共{}条模板、{}个捕获组，耗时{:?}",
            compiled.len(),
            group_count,
            start.elapsed()
        );
        Ok(compiled)
    }

    /// 编译单个模板
    pub fn compile(label: &str, pattern: &str, options: &ResolverOptions) -> ResolvaResult<CompiledPattern> {
        let segments = TemplateScanner::scan(pattern);

        // 1. 正则路径
        let (expression, groups) = Self::build_expression(&segments, options)
            .map_err(|reason| ResolvaError::compilation(label, pattern, reason))?;

        // 2. 格式串路径
        let format_source = Self::build_format_specification(&segments);
        let format = FormatSpec::parse(&format_source)
            .map_err(|reason| ResolvaError::compilation(label, pattern, reason))?;

        // 3. 两条路径提取的占位符集合必须完全一致
        let keys: BTreeSet<String> = TemplateScanner::placeholder_names(&segments)
            .map(str::to_string)
            .collect();
        let format_keys = format.field_names();
        if keys != format_keys {
            return Err(ResolvaError::compilation(
                label,
                pattern,
                format!("占位符集合不一致：正则路径 {:?}，格式串路径 {:?}", keys, format_keys),
            ));
        }

        // 4. 编译正则
        let regex = Regex::new(&expression)
            .map_err(|e| ResolvaError::compilation(label, pattern, format!("正则编译失败：{}", e)))?;

        Ok(CompiledPattern {
            label: label.to_string(),
            pattern: pattern.to_string(),
            regex,
            groups,
            format,
            keys,
        })
    }

    /// 构建正则表达式源码与捕获组映射
    fn build_expression(segments: &[Segment], options: &ResolverOptions) -> Result<(String, Vec<GroupBinding>), String> {
        let mut expression = String::new();
        let mut groups = Vec::new();
        let mut counters: HashMap<&str, usize> = HashMap::new();

        if options.anchor_start {
            expression.push('^');
        }

        for segment in segments {
            match segment {
                // 字面量不转义
                Segment::Literal(text) => expression.push_str(text),
                Segment::Placeholder { name, constraint } => {
                    if !Self::is_valid_name(name) {
                        return Err(format!("占位符名称 {:?} 包含非法字符，只允许字母、数字和下划线，且不能以数字开头", name));
                    }
                    let count = counters.entry(name.as_str()).or_insert(0);
                    *count += 1;
                    let group = format!("{}{:03}", name, count);

                    let body = match constraint.as_deref() {
                        None => DEFAULT_PLACEHOLDER_EXPRESSION,
                        Some("") => return Err(format!("占位符 {:?} 的约束表达式为空", name)),
                        Some(constraint) => constraint,
                    };
                    let _ = write!(expression, "(?P<{}>{})", group, body);

                    groups.push(GroupBinding {
                        group,
                        placeholder: name.clone(),
                    });
                }
            }
        }

        if options.anchor_end {
            expression.push('$');
        }

        Ok((expression, groups))
    }

    /// 占位符名称：首字符为字母或 `_`，其余为字母、数字或 `_`（允许 Unicode 字母）
    fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first == '_' || first.is_alphabetic() => chars.all(|c| c == '_' || c.is_alphanumeric()),
            _ => false,
        }
    }

    /// 构建格式串：去掉约束，仅保留 `{name}`
    fn build_format_specification(segments: &[Segment]) -> String {
        let mut format = String::new();
        for segment in segments {
            match segment {
                Segment::Literal(text) => format.push_str(text),
                Segment::Placeholder { name, .. } => {
                    format.push('{');
                    format.push_str(name);
                    format.push('}');
                }
            }
        }
        format
    }
}
