//! RunProfile - Config Loader output
//!
//! Describes one benchmark run: which memory library is exercised, which
//! model answers, how the three stages are invoked and where results land.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use validator::Validate;

use crate::ContractError;

/// Environment keys the runner sets for every stage.
pub const ENV_VERSION: &str = "VERSION";
pub const ENV_TOP_K: &str = "TOP_K";
pub const ENV_FRAME: &str = "FRAME";

/// Keys that `env` entries may not shadow
pub const RESERVED_ENV_KEYS: [&str; 3] = [ENV_VERSION, ENV_TOP_K, ENV_FRAME];

/// Memory library under benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MemoryLib {
    #[serde(rename = "mem0")]
    Mem0,
    #[serde(rename = "mem0_graph")]
    Mem0Graph,
    #[serde(rename = "memos-api")]
    MemosApi,
    #[serde(rename = "memos-api-online")]
    MemosApiOnline,
    #[serde(rename = "memobase")]
    Memobase,
    #[serde(rename = "memu")]
    Memu,
    #[serde(rename = "supermemory")]
    Supermemory,
}

impl MemoryLib {
    /// Every library the ingestion program accepts
    pub const ALL: [MemoryLib; 7] = [
        MemoryLib::Mem0,
        MemoryLib::Mem0Graph,
        MemoryLib::MemosApi,
        MemoryLib::MemosApiOnline,
        MemoryLib::Memobase,
        MemoryLib::Memu,
        MemoryLib::Supermemory,
    ];

    /// Identifier as it appears on command lines and in directory names
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryLib::Mem0 => "mem0",
            MemoryLib::Mem0Graph => "mem0_graph",
            MemoryLib::MemosApi => "memos-api",
            MemoryLib::MemosApiOnline => "memos-api-online",
            MemoryLib::Memobase => "memobase",
            MemoryLib::Memu => "memu",
            MemoryLib::Supermemory => "supermemory",
        }
    }

    /// Whether the ingestion program has a client for this library.
    ///
    /// `mem0_graph` is accepted on the command line but rejected when the
    /// client is constructed.
    pub fn has_ingestion_client(&self) -> bool {
        !matches!(self, MemoryLib::Mem0Graph)
    }

    /// Whether the memory search step can turn results into context
    pub fn supports_search(&self) -> bool {
        matches!(
            self,
            MemoryLib::Mem0 | MemoryLib::MemosApi | MemoryLib::Supermemory
        )
    }

    /// MemOS frames talk to a locally hosted API
    pub fn is_memos(&self) -> bool {
        matches!(self, MemoryLib::MemosApi | MemoryLib::MemosApiOnline)
    }
}

impl fmt::Display for MemoryLib {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryLib {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryLib::ALL
            .into_iter()
            .find(|lib| lib.as_str() == s)
            .ok_or_else(|| ContractError::UnknownLib {
                value: s.to_string(),
            })
    }
}

/// Complete benchmark run profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RunProfile {
    /// Display name (defaults to `{lib}_{version}`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Library identifier handed to the ingestion stage
    pub lib: MemoryLib,

    /// Frame identifier exported to stages (defaults to `lib`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<MemoryLib>,

    /// Model identifier for generation and evaluation
    #[validate(length(min = 1, message = "model cannot be empty"))]
    pub model: String,

    /// Worker count for ingestion, thread count for generation
    #[serde(default = "default_workers")]
    #[validate(range(min = 1, message = "workers must be >= 1"))]
    pub workers: u32,

    /// Version tag, also part of the run directory name
    #[serde(default = "default_version")]
    #[validate(length(min = 1, message = "version cannot be empty"))]
    pub version: String,

    /// Number of candidate memories retrieved per query
    #[serde(default = "default_top_k")]
    #[validate(range(min = 1, message = "top_k must be >= 1"))]
    pub top_k: u32,

    /// Input data directory read by the ingestion stage
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Parent of every run directory
    #[serde(default = "default_results_root")]
    pub results_root: PathBuf,

    /// Test-category selectors for generation and evaluation
    #[serde(default = "default_test_categories")]
    #[validate(length(min = 1, message = "at least one test category is required"))]
    pub test_categories: Vec<String>,

    /// Working directory for every stage (None = inherit)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<PathBuf>,

    /// Locally hosted service the stages must reach
    #[serde(default)]
    #[validate(nested)]
    pub service: ServiceConfig,

    /// Per-variant stage flags
    #[serde(default)]
    pub variant: VariantOptions,

    /// Program argv prefixes for each stage
    #[serde(default)]
    #[validate(nested)]
    pub programs: StagePrograms,

    /// Extra environment for every stage
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

fn default_workers() -> u32 {
    5
}

fn default_version() -> String {
    "default_version".to_string()
}

fn default_top_k() -> u32 {
    10
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data/bfcl-v4")
}

fn default_results_root() -> PathBuf {
    PathBuf::from("results")
}

fn default_test_categories() -> Vec<String> {
    vec!["single_turn".to_string(), "multi_turn".to_string()]
}

impl RunProfile {
    /// Minimal profile with defaults for everything but library and model
    pub fn new(lib: MemoryLib, model: impl Into<String>) -> Self {
        Self {
            name: None,
            lib,
            frame: None,
            model: model.into(),
            workers: default_workers(),
            version: default_version(),
            top_k: default_top_k(),
            data_dir: default_data_dir(),
            results_root: default_results_root(),
            test_categories: default_test_categories(),
            working_dir: None,
            service: ServiceConfig::default(),
            variant: VariantOptions::default(),
            programs: StagePrograms::default(),
            env: BTreeMap::new(),
        }
    }

    /// Effective frame identifier
    pub fn frame(&self) -> MemoryLib {
        self.frame.unwrap_or(self.lib)
    }

    /// Run directory name: `{lib}_{version}`
    pub fn run_dir_name(&self) -> String {
        format!("{}_{}", self.lib, self.version)
    }

    /// Profile name for logs and summaries
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.run_dir_name())
    }

    /// Environment handed to every stage.
    ///
    /// Built fresh per run; the runner's own environment is never modified.
    pub fn stage_env(&self) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        env.insert(ENV_VERSION.to_string(), self.version.clone());
        env.insert(ENV_TOP_K.to_string(), self.top_k.to_string());
        env.insert(ENV_FRAME.to_string(), self.frame().to_string());
        if let Some(url) = &self.service.url {
            env.insert(self.service.env_key.clone(), url.clone());
        }
        env
    }
}

/// Service endpoint configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Base URL (None = no service)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url(message = "service.url is not a valid URL"))]
    pub url: Option<String>,

    /// Environment variable the URL is exported under
    #[serde(default = "default_service_env_key")]
    #[validate(length(min = 1, message = "service.env_key cannot be empty"))]
    pub env_key: String,
}

fn default_service_env_key() -> String {
    "MEMOS_URL".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: None,
            env_key: default_service_env_key(),
        }
    }
}

/// Flags that distinguish run variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantOptions {
    /// Restrict generation to the configured run identifiers (`--run-ids`)
    #[serde(default)]
    pub run_ids: bool,

    /// Score only a subset of generated results (`--partial-eval`)
    #[serde(default)]
    pub partial_eval: bool,

    /// Let generation overwrite existing results (`--allow-overwrite`)
    #[serde(default)]
    pub allow_overwrite: bool,
}

/// argv prefix for each stage program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StagePrograms {
    #[serde(default = "default_ingestion_program")]
    #[validate(length(min = 1, message = "programs.ingestion cannot be empty"))]
    pub ingestion: Vec<String>,

    #[serde(default = "default_generation_program")]
    #[validate(length(min = 1, message = "programs.generation cannot be empty"))]
    pub generation: Vec<String>,

    #[serde(default = "default_evaluation_program")]
    #[validate(length(min = 1, message = "programs.evaluation cannot be empty"))]
    pub evaluation: Vec<String>,
}

fn default_ingestion_program() -> Vec<String> {
    vec!["python".to_string(), "bfcl_ingestion.py".to_string()]
}

fn default_generation_program() -> Vec<String> {
    vec!["bfcl".to_string(), "generate".to_string()]
}

fn default_evaluation_program() -> Vec<String> {
    vec!["bfcl".to_string(), "evaluate".to_string()]
}

impl Default for StagePrograms {
    fn default() -> Self {
        Self {
            ingestion: default_ingestion_program(),
            generation: default_generation_program(),
            evaluation: default_evaluation_program(),
        }
    }
}
