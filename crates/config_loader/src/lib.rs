//! # Config Loader
//!
//! Run profile loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON profile files
//! - Validate profile legality
//! - Collect non-fatal warnings
//! - Generate `RunProfile`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let profile = ConfigLoader::load_from_path(Path::new("profiles/mem0.toml")).unwrap();
//! println!("Library: {}", profile.lib);
//! ```

mod parser;
mod validator;
mod warnings;

pub use contracts::RunProfile;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load profiles from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load profile from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<RunProfile, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load profile from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<RunProfile, ContractError> {
        let profile = parser::parse(content, format)?;
        Self::validate(&profile)?;
        Ok(profile)
    }

    /// Re-validate a profile, e.g. after command-line overrides
    pub fn validate(profile: &RunProfile) -> Result<(), ContractError> {
        validator::validate(profile)
    }

    /// Non-fatal findings about a valid profile
    pub fn warnings(profile: &RunProfile) -> Vec<String> {
        warnings::collect(profile)
    }

    /// Serialize RunProfile to TOML string
    pub fn to_toml(profile: &RunProfile) -> Result<String, ContractError> {
        toml::to_string_pretty(profile)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize RunProfile to JSON string
    pub fn to_json(profile: &RunProfile) -> Result<String, ContractError> {
        serde_json::to_string_pretty(profile)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer profile format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read profile file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
