//! Layered error definitions
//!
//! Categorized by source: config / stage / io

use thiserror::Error;

use crate::StageKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    /// Library identifier outside the supported set
    #[error("unknown memory library '{value}'")]
    UnknownLib { value: String },

    // ===== Stage Errors =====
    /// Stage program could not be started
    #[error("failed to start {stage} program '{program}': {source}")]
    StageSpawn {
        stage: StageKind,
        program: String,
        #[source]
        source: std::io::Error,
    },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create stage spawn error
    pub fn stage_spawn(stage: StageKind, program: impl Into<String>, source: std::io::Error) -> Self {
        Self::StageSpawn {
            stage,
            program: program.into(),
            source,
        }
    }
}
