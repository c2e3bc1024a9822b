//! 全局错误类型定义

use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolvaError {
    // 编译相关错误
    /// 模板编译失败：占位符语法非法、正则编译失败，或两条键提取路径结果不一致
    #[error("模板编译失败 [{label}] \"{pattern}\"：{reason}")]
    PatternCompilation {
        label: String,
        pattern: String,
        reason: String,
    },

    // 匹配相关错误
    /// 重复占位符提取出不同的值（仅在开启重复检查时触发）
    #[error("占位符 {placeholder:?} 提取值不一致：{first:?} 与 {second:?}")]
    DuplicatePlaceholderMismatch {
        placeholder: String,
        first: String,
        second: String,
    },

    // 配置相关错误
    #[error("配置无效：{0}")]
    Config(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    Json(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    Io(#[from] IoError),
}

impl ResolvaError {
    pub(crate) fn compilation(label: &str, pattern: &str, reason: impl Into<String>) -> Self {
        Self::PatternCompilation {
            label: label.to_string(),
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

// 全局Result类型
pub type ResolvaResult<T> = Result<T, ResolvaError>;
