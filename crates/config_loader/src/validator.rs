//! 配置校验模块
//!
//! 校验规则：
//! - 字段级约束 (model 非空, workers >= 1, top_k >= 1, service.url 合法)
//! - version 不含路径分隔符 (它是目录名的一部分)
//! - test_categories 不含空项
//! - 各阶段程序的可执行文件非空
//! - 环境变量名合法且不覆盖保留键

use contracts::{ContractError, RunProfile, RESERVED_ENV_KEYS};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// 校验 RunProfile 配置
///
/// 返回第一个遇到的错误，或 Ok(())。
pub fn validate(profile: &RunProfile) -> Result<(), ContractError> {
    validate_fields(profile)?;
    validate_version(profile)?;
    validate_test_categories(profile)?;
    validate_programs(profile)?;
    validate_env(profile)?;
    Ok(())
}

/// 派生的字段级校验
fn validate_fields(profile: &RunProfile) -> Result<(), ContractError> {
    profile.validate().map_err(|errors| {
        let (field, message) = first_violation(&errors);
        ContractError::config_validation(field, message)
    })
}

/// 按字段名排序后取第一条违规，保证报错稳定
fn first_violation(errors: &ValidationErrors) -> (String, String) {
    let mut entries: Vec<_> = errors.errors().iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in entries {
        match kind {
            ValidationErrorsKind::Field(violations) => {
                if let Some(violation) = violations.first() {
                    let message = violation
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| violation.code.to_string());
                    return (field.to_string(), message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                let (inner, message) = first_violation(nested);
                return (format!("{field}.{inner}"), message);
            }
            ValidationErrorsKind::List(items) => {
                if let Some((idx, nested)) = items.iter().next() {
                    let (inner, message) = first_violation(nested);
                    return (format!("{field}[{idx}].{inner}"), message);
                }
            }
        }
    }

    ("profile".to_string(), errors.to_string())
}

/// version 会拼进 `{lib}_{version}` 目录名
fn validate_version(profile: &RunProfile) -> Result<(), ContractError> {
    let version = profile.version.as_str();
    if version.contains(['/', '\\']) || version == "." || version == ".." {
        return Err(ContractError::config_validation(
            "version",
            format!("version '{version}' must not contain path separators"),
        ));
    }
    Ok(())
}

fn validate_test_categories(profile: &RunProfile) -> Result<(), ContractError> {
    for (idx, category) in profile.test_categories.iter().enumerate() {
        if category.trim().is_empty() {
            return Err(ContractError::config_validation(
                format!("test_categories[{idx}]"),
                "test category cannot be blank",
            ));
        }
    }
    Ok(())
}

fn validate_programs(profile: &RunProfile) -> Result<(), ContractError> {
    let programs = [
        ("programs.ingestion", &profile.programs.ingestion),
        ("programs.generation", &profile.programs.generation),
        ("programs.evaluation", &profile.programs.evaluation),
    ];
    for (field, argv) in programs {
        match argv.first() {
            Some(executable) if !executable.trim().is_empty() => {}
            _ => {
                return Err(ContractError::config_validation(
                    format!("{field}[0]"),
                    "executable cannot be empty",
                ))
            }
        }
    }
    Ok(())
}

fn validate_env(profile: &RunProfile) -> Result<(), ContractError> {
    let service_key = profile.service.env_key.as_str();
    if !is_env_name(service_key) {
        return Err(ContractError::config_validation(
            "service.env_key",
            format!("'{service_key}' is not a valid environment variable name"),
        ));
    }
    if RESERVED_ENV_KEYS.contains(&service_key) {
        return Err(ContractError::config_validation(
            "service.env_key",
            format!("'{service_key}' is reserved"),
        ));
    }

    for key in profile.env.keys() {
        if !is_env_name(key) {
            return Err(ContractError::config_validation(
                format!("env.{key}"),
                format!("'{key}' is not a valid environment variable name"),
            ));
        }
        if RESERVED_ENV_KEYS.contains(&key.as_str()) {
            return Err(ContractError::config_validation(
                format!("env.{key}"),
                format!("'{key}' is reserved and set from the profile"),
            ));
        }
        if profile.service.url.is_some() && key == service_key {
            return Err(ContractError::config_validation(
                format!("env.{key}"),
                format!("'{key}' is already set from service.url"),
            ));
        }
    }
    Ok(())
}

fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
