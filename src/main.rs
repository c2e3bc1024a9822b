//! resolva 命令行工具
//! 读取JSON模板集配置，对输入字符串执行解析，或对字段执行格式化
//!
//! 运行命令：
//! cargo run --features cli -- --config patterns.json resolve "hamlet/s/sq010"

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use resolva::{FieldMap, PatternSetConfig, Resolver};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "resolva", version, about = "双向路径模板解析/格式化工具")]
struct Cli {
    /// 模板集配置文件（JSON）
    #[arg(short, long, global = true, default_value = "resolva.json")]
    config: PathBuf,

    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 解析字符串为字段
    Resolve {
        input: String,
        /// 仅使用指定标签
        #[arg(short, long, conflicts_with = "all")]
        label: Option<String>,
        /// 返回所有匹配的标签
        #[arg(short, long)]
        all: bool,
    },
    /// 由字段格式化字符串（KEY=VALUE ...）
    Format {
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<(String, String)>,
        /// 仅使用指定标签
        #[arg(short, long, conflicts_with = "all")]
        label: Option<String>,
        /// 返回所有通过校验的标签
        #[arg(short, long)]
        all: bool,
    },
    /// 查看编译结果（正则、格式串、占位符）
    Inspect,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("字段格式应为 KEY=VALUE：{}", raw))
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = PatternSetConfig::from_json_file(&cli.config)
        .with_context(|| format!("加载模板集配置失败：{}", cli.config.display()))?;
    let resolver = config.build().context("模板集编译失败")?;

    let output = match cli.command {
        Command::Resolve { input, label, all } => resolve(&resolver, &input, label.as_deref(), all)?,
        Command::Format { fields, label, all } => {
            let fields: FieldMap = fields.into_iter().collect();
            format(&resolver, &fields, label.as_deref(), all)
        }
        Command::Inspect => inspect(&resolver),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn resolve(resolver: &Resolver, input: &str, label: Option<&str>, all: bool) -> Result<serde_json::Value> {
    let value = match (label, all) {
        (Some(label), _) => json!(resolver.resolve_one(input, label)?),
        (None, true) => json!(resolver.resolve_all(input)?),
        (None, false) => json!(resolver.resolve_first(input)?),
    };
    Ok(value)
}

fn format(resolver: &Resolver, fields: &FieldMap, label: Option<&str>, all: bool) -> serde_json::Value {
    match (label, all) {
        (Some(label), _) => json!(resolver.format_one(fields, label)),
        (None, true) => json!(resolver.format_all(fields)),
        (None, false) => json!(resolver.format_first(fields)),
    }
}

fn inspect(resolver: &Resolver) -> serde_json::Value {
    let patterns: Vec<serde_json::Value> = resolver
        .labels()
        .map(|label| {
            json!({
                "label": label,
                "pattern": resolver.pattern_for(label),
                "regex": resolver.regex_for(label),
                "format": resolver.format_for(label),
                "keys": resolver.keys_for(label),
            })
        })
        .collect();
    json!({ "options": resolver.options(), "patterns": patterns })
}
