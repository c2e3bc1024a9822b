//! 编译后模式模型
//! 正则 + 捕获组映射 + 格式串 + 占位符集合

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;

use super::format_spec::FormatSpec;
use crate::error::{ResolvaError, ResolvaResult};

/// 字段数据：占位符名称 -> 值
pub type FieldMap = BTreeMap<String, String>;

/// 捕获组与占位符的绑定关系
///
/// 同名占位符出现多次时，每次出现对应一个独立捕获组（`project001`、`project002`...），
/// 提取结果时按此表还原为占位符名称。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBinding {
    pub group: String,
    pub placeholder: String,
}

/// 编译后的单个模板
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub(crate) label: String,
    pub(crate) pattern: String,
    pub(crate) regex: Regex,
    pub(crate) groups: Vec<GroupBinding>,
    pub(crate) format: FormatSpec,
    pub(crate) keys: BTreeSet<String>,
}

impl CompiledPattern {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// 原始模板
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// 正则表达式源码（仅用于诊断输出）
    pub fn describe(&self) -> &str {
        self.regex.as_str()
    }

    pub fn groups(&self) -> &[GroupBinding] {
        &self.groups
    }

    /// 格式串（约束已去除）
    pub fn format_spec(&self) -> &str {
        self.format.as_str()
    }

    /// 占位符名称集合
    pub fn keys(&self) -> &BTreeSet<String> {
        &self.keys
    }

    /// 匹配输入并提取字段
    ///
    /// - 空输入直接返回 `Ok(None)`，不执行正则
    /// - 开启 `check_duplicates` 时，同名占位符值不一致返回错误；关闭时后出现的值覆盖先出现的值
    /// - 未参与匹配的捕获组不产生字段；提取结果为空视为未匹配
    pub fn extract(&self, input: &str, check_duplicates: bool) -> ResolvaResult<Option<FieldMap>> {
        if input.is_empty() {
            return Ok(None);
        }

        let Some(captures) = self.regex.captures(input) else {
            return Ok(None);
        };

        let mut fields = FieldMap::new();
        for binding in &self.groups {
            let Some(matched) = captures.name(&binding.group) else {
                continue;
            };
            let value = matched.as_str();

            if check_duplicates {
                if let Some(existing) = fields.get(&binding.placeholder) {
                    if existing != value {
                        return Err(ResolvaError::DuplicatePlaceholderMismatch {
                            placeholder: binding.placeholder.clone(),
                            first: existing.clone(),
                            second: value.to_string(),
                        });
                    }
                }
            }

            fields.insert(binding.placeholder.clone(), value.to_string());
        }

        if fields.is_empty() {
            Ok(None)
        } else {
            Ok(Some(fields))
        }
    }

    /// 字段键集合是否与占位符集合完全一致
    pub fn accepts_keys(&self, fields: &FieldMap) -> bool {
        fields.len() == self.keys.len() && fields.keys().all(|key| self.keys.contains(key))
    }

    /// 用字段数据填充格式串（不做回匹配校验）
    ///
    /// 键集合不一致时返回 None，不做部分填充。
    pub fn render(&self, fields: &FieldMap) -> Option<String> {
        if !self.accepts_keys(fields) {
            return None;
        }
        self.format.render(fields)
    }
}
