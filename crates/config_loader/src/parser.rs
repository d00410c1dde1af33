//! 配置解析模块
//!
//! 支持 TOML (主要) 和 JSON (可选) 格式。
//!
//! 未知字段直接报错：拼错的 variant 开关不能被静默忽略。

use contracts::{ContractError, RunProfile};

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML 格式 (推荐)
    Toml,
    /// JSON 格式
    Json,
}

impl ConfigFormat {
    /// 从文件扩展名推断格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// 解析 TOML 格式配置
pub fn parse_toml(content: &str) -> Result<RunProfile, ContractError> {
    toml::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: with_key_hint(format!("TOML parse error: {e}")),
        source: Some(Box::new(e)),
    })
}

/// 解析 JSON 格式配置
pub fn parse_json(content: &str) -> Result<RunProfile, ContractError> {
    serde_json::from_str(content).map_err(|e| ContractError::ConfigParse {
        message: with_key_hint(format!("JSON parse error: {e}")),
        source: Some(Box::new(e)),
    })
}

/// 命令行开关写法 (`partial-eval`) 误用为字段名时，提示对应的 snake_case 字段
fn with_key_hint(message: String) -> String {
    let unknown = message
        .split_once("unknown field `")
        .and_then(|(_, rest)| rest.split_once('`'))
        .map(|(field, _)| field.to_string());

    match unknown {
        Some(field) if field.contains('-') => {
            let suggestion = field.trim_start_matches('-').replace('-', "_");
            format!("{message} (profile keys use snake_case: did you mean `{suggestion}`?)")
        }
        _ => message,
    }
}

/// 根据格式解析配置
pub fn parse(content: &str, format: ConfigFormat) -> Result<RunProfile, ContractError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}
