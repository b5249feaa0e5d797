use serde::{Deserialize, Serialize};

use crate::bids::QueryFilter;
use crate::bids::ReturnType;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub file_info: FileInfoConfig,

    #[serde(default)]
    pub data_reader: DataReaderConfig,

    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "bids_tasks_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// One extra output of the file-info task: `name` is the output field,
/// `entity` the BIDS entity key (or long name) it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputEntity {
    pub name: String,
    pub entity: String,
}

/// Ordered extra outputs of the file-info task.
///
/// Kept as a list (TOML array of tables) so declaration order is the
/// output order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputEntities(Vec<OutputEntity>);

impl OutputEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, entity: impl Into<String>) -> Self {
        self.0.push(OutputEntity {
            name: name.into(),
            entity: entity.into(),
        });
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputEntity> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>, E: Into<String>> FromIterator<(N, E)> for OutputEntities {
    fn from_iter<I: IntoIterator<Item = (N, E)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |acc, (name, entity)| acc.with(name, entity))
    }
}

/// One named query of the data-reader task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputQuery {
    pub name: String,
    #[serde(flatten)]
    pub filter: QueryFilter,
}

/// Ordered named queries of the data-reader task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutputQueries(Vec<OutputQuery>);

impl Default for OutputQueries {
    fn default() -> Self {
        Self::empty()
            .with("T1w", QueryFilter::new("T1w", ["nii", "nii.gz"]))
            .with("bold", QueryFilter::new("bold", ["nii", "nii.gz"]))
    }
}

impl OutputQueries {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn with(mut self, name: impl Into<String>, filter: QueryFilter) -> Self {
        self.0.push(OutputQuery {
            name: name.into(),
            filter,
        });
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutputQuery> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfoConfig {
    #[serde(default)]
    pub output_entities: OutputEntities,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataReaderConfig {
    #[serde(default)]
    pub output_query: OutputQueries,

    #[serde(default)]
    pub return_type: ReturnType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Top-level dataset directories that are never indexed.
    #[serde(default = "default_ignore_dirs")]
    pub ignore_dirs: Vec<String>,

    #[serde(default)]
    pub require_description: bool,
}

fn default_ignore_dirs() -> Vec<String> {
    ["derivatives", "sourcedata", "code"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            ignore_dirs: default_ignore_dirs(),
            require_description: false,
        }
    }
}
