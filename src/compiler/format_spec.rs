//! 格式串模型
//! 去除约束后的模板（仅含 `{name}` 与字面量），独立解析一次用于键校验与格式化

use std::collections::BTreeSet;

use super::pattern::FieldMap;

/// 格式串片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    Literal(String),
    Field(String),
}

/// 已解析的格式串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    source: String,
    tokens: Vec<FormatToken>,
}

impl FormatSpec {
    /// 解析格式串
    ///
    /// 规则与常见的格式化语法一致：`{{` / `}}` 表示字面量花括号，
    /// 单独出现的 `{` 或 `}` 视为语法错误。
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '{' => {
                    let mut field = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some('{') => return Err(format!("字段名中出现意外的 '{{'：{}", source)),
                            Some(ch) => field.push(ch),
                            None => return Err(format!("格式串中存在未闭合的 '{{'：{}", source)),
                        }
                    }
                    if !literal.is_empty() {
                        tokens.push(FormatToken::Literal(std::mem::take(&mut literal)));
                    }
                    tokens.push(FormatToken::Field(field));
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(format!("格式串中存在单独的 '}}'：{}", source)),
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            tokens.push(FormatToken::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            tokens,
        })
    }

    /// 原始格式串
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 格式串中出现的字段名集合
    pub fn field_names(&self) -> BTreeSet<String> {
        self.tokens
            .iter()
            .filter_map(|token| match token {
                FormatToken::Field(name) => Some(name.clone()),
                FormatToken::Literal(_) => None,
            })
            .collect()
    }

    /// 用字段数据填充格式串；缺少任一字段时返回 None
    pub fn render(&self, fields: &FieldMap) -> Option<String> {
        let mut output = String::with_capacity(self.source.len());
        for token in &self.tokens {
            match token {
                FormatToken::Literal(text) => output.push_str(text),
                FormatToken::Field(name) => output.push_str(fields.get(name)?),
            }
        }
        Some(output)
    }
}
