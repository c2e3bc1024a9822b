//! 解析/格式化结果模型
//! "未匹配" 是常规结果而非错误，统一用显式枚举表达

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::compiler::FieldMap;

/// 全量解析结果：标签 -> 字段（按定义顺序）
pub type ResolvedAll = IndexMap<String, FieldMap>;

/// 全量格式化结果：标签 -> 字符串（按定义顺序）
pub type FormattedAll = IndexMap<String, String>;

/// `resolve_first` 的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolved {
    Found { label: String, fields: FieldMap },
    NotFound,
}

impl Resolved {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolved::Found { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Resolved::Found { label, .. } => Some(label),
            Resolved::NotFound => None,
        }
    }

    pub fn fields(&self) -> Option<&FieldMap> {
        match self {
            Resolved::Found { fields, .. } => Some(fields),
            Resolved::NotFound => None,
        }
    }

    pub fn into_parts(self) -> Option<(String, FieldMap)> {
        match self {
            Resolved::Found { label, fields } => Some((label, fields)),
            Resolved::NotFound => None,
        }
    }
}

impl fmt::Display for Resolved {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolved::Found { label, fields } => {
                write!(f, "{}: {{", label)?;
                for (idx, (key, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", key, value)?;
                }
                write!(f, "}}")
            }
            Resolved::NotFound => write!(f, "<not found>"),
        }
    }
}

/// `format_first` 的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Formatted {
    Found { label: String, path: String },
    NotFound,
}

impl Formatted {
    pub fn is_found(&self) -> bool {
        matches!(self, Formatted::Found { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            Formatted::Found { label, .. } => Some(label),
            Formatted::NotFound => None,
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            Formatted::Found { path, .. } => Some(path),
            Formatted::NotFound => None,
        }
    }

    pub fn into_parts(self) -> Option<(String, String)> {
        match self {
            Formatted::Found { label, path } => Some((label, path)),
            Formatted::NotFound => None,
        }
    }
}

impl fmt::Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatted::Found { label, path } => write!(f, "{}: {}", label, path),
            Formatted::NotFound => write!(f, "<not found>"),
        }
    }
}
