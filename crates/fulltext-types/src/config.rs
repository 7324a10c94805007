//! Configuration loading for graph full-text indexing.
//!
//! Layered config: defaults -> config file -> env vars -> CLI flags.
//! The default config file lives at ~/.config/graph-fulltext/config.toml.
//!
//! `Settings` is what gets loaded; `EngineConfig` is the immutable value the
//! search core receives. Nothing in the core reads configuration on its own.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::TypesError;
use crate::index::AnalyzerConfig;

/// Named analyzer preset selected for newly created indexes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnalyzerPreset {
    #[default]
    Standard,
    Cjk,
    Exact,
}

impl AnalyzerPreset {
    pub fn config(&self) -> AnalyzerConfig {
        match self {
            AnalyzerPreset::Standard => AnalyzerConfig::standard(),
            AnalyzerPreset::Cjk => AnalyzerConfig::cjk(),
            AnalyzerPreset::Exact => AnalyzerConfig::exact(),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "standard" => Some(AnalyzerPreset::Standard),
            "cjk" => Some(AnalyzerPreset::Cjk),
            "exact" => Some(AnalyzerPreset::Exact),
            _ => None,
        }
    }
}

impl std::str::FromStr for AnalyzerPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown analyzer preset: {}", s))
    }
}

/// How a fuzzy query value is re-encoded after tokenization.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FuzzyEncoding {
    /// Required-term markers carrying the token text (`+term`).
    #[default]
    Terms,
    /// Legacy transform: required-term markers carrying token offsets
    /// (`+startOffset=S,endOffset=E`). Such markers never equal an indexed
    /// term, so fuzzy queries in this mode match nothing.
    Offsets,
}

/// How the searchable fields of a label are discovered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldDiscovery {
    /// Keys of the first document found with the label.
    #[default]
    FirstDocument,
    /// Union of the keys of every document with the label.
    Union,
}

/// Immutable engine configuration handed to the search core.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Analyzer for indexes created on first write
    pub analyzer: AnalyzerConfig,
    /// Memory budget for each index writer in MB
    pub writer_memory_mb: usize,
    pub fuzzy_encoding: FuzzyEncoding,
    pub field_discovery: FieldDiscovery,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            analyzer: AnalyzerConfig::standard(),
            writer_memory_mb: default_writer_memory_mb(),
            fuzzy_encoding: FuzzyEncoding::default(),
            field_discovery: FieldDiscovery::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_analyzer(mut self, analyzer: AnalyzerConfig) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn with_fuzzy_encoding(mut self, encoding: FuzzyEncoding) -> Self {
        self.fuzzy_encoding = encoding;
        self
    }

    pub fn with_field_discovery(mut self, discovery: FieldDiscovery) -> Self {
        self.field_discovery = discovery;
        self
    }

    pub fn with_writer_memory_mb(mut self, mb: usize) -> Self {
        self.writer_memory_mb = mb;
        self
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root directory holding one sub-directory per index
    #[serde(default = "default_index_root")]
    pub index_root: String,

    /// Path to the RocksDB graph directory
    #[serde(default = "default_graph_path")]
    pub graph_path: String,

    /// Analyzer preset for newly created indexes
    #[serde(default)]
    pub analyzer: AnalyzerPreset,

    /// Index writer memory budget in MB
    #[serde(default = "default_writer_memory_mb")]
    pub writer_memory_mb: usize,

    #[serde(default)]
    pub fuzzy_encoding: FuzzyEncoding,

    #[serde(default)]
    pub field_discovery: FieldDiscovery,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_index_root() -> String {
    ProjectDirs::from("", "", "graph-fulltext")
        .map(|p| p.data_local_dir().join("indexes"))
        .unwrap_or_else(|| PathBuf::from("./indexes"))
        .to_string_lossy()
        .to_string()
}

fn default_graph_path() -> String {
    ProjectDirs::from("", "", "graph-fulltext")
        .map(|p| p.data_local_dir().join("graph"))
        .unwrap_or_else(|| PathBuf::from("./graph"))
        .to_string_lossy()
        .to_string()
}

fn default_writer_memory_mb() -> usize {
    50
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_root: default_index_root(),
            graph_path: default_graph_path(),
            analyzer: AnalyzerPreset::default(),
            writer_memory_mb: default_writer_memory_mb(),
            fuzzy_encoding: FuzzyEncoding::default(),
            field_discovery: FieldDiscovery::default(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/graph-fulltext/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (FULLTEXT_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, TypesError> {
        let config_dir = ProjectDirs::from("", "", "graph-fulltext")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("index_root", default_index_root())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("graph_path", default_graph_path())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("analyzer", "standard")
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("writer_memory_mb", default_writer_memory_mb() as i64)
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("fuzzy_encoding", "terms")
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("field_discovery", "first_document")
            .map_err(|e| TypesError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| TypesError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Keys are flat, so no nesting separator: FULLTEXT_INDEX_ROOT -> index_root
        builder = builder.add_source(Environment::with_prefix("FULLTEXT").try_parsing(true));

        let config = builder
            .build()
            .map_err(|e| TypesError::Config(e.to_string()))?;

        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| TypesError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.writer_memory_mb < 15 {
            return Err(TypesError::Config(format!(
                "writer_memory_mb must be >= 15, got {}",
                self.writer_memory_mb
            )));
        }
        if self.index_root.trim().is_empty() {
            return Err(TypesError::Config("index_root must not be empty".into()));
        }
        Ok(())
    }

    /// Build the immutable engine configuration from these settings.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            analyzer: self.analyzer.config(),
            writer_memory_mb: self.writer_memory_mb,
            fuzzy_encoding: self.fuzzy_encoding,
            field_discovery: self.field_discovery,
        }
    }

    pub fn index_root_path(&self) -> PathBuf {
        expand_home(&self.index_root)
    }

    pub fn graph_path_buf(&self) -> PathBuf {
        expand_home(&self.graph_path)
    }
}

/// Expand a leading `~/` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base) = directories::BaseDirs::new() {
            return base.home_dir().join(rest);
        }
    }
    PathBuf::from(path)
}
