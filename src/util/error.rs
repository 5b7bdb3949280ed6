// ComboStats - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ComboStats operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ComboStatsError {
    /// Configuration or secrets loading failed.
    Config(ConfigError),

    /// Loading a dataset from the database failed.
    Load(LoadError),

    /// Filter, sort, or pagination failed.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),
}

impl fmt::Display for ComboStatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Load(e) => write!(f, "Load error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for ComboStatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Load(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration and secrets loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// The secrets file does not exist.
    SecretsNotFound { path: PathBuf },

    /// The secrets file exceeds the maximum allowed size.
    SecretsTooLarge { path: PathBuf, size: u64, max: u64 },

    /// A required secret is absent from the secrets file.
    MissingSecret { key: &'static str, path: PathBuf },

    /// A required secret is present but empty.
    EmptySecret { key: &'static str, path: PathBuf },

    /// I/O error reading a config or secrets file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::SecretsNotFound { path } => write!(
                f,
                "Secrets file '{}' not found. It must define DB_USERNAME, DB_PASSWORD and DB_HOST.",
                path.display()
            ),
            Self::SecretsTooLarge { path, size, max } => write!(
                f,
                "Secrets file '{}' is {size} bytes, exceeds maximum of {max} bytes",
                path.display()
            ),
            Self::MissingSecret { key, path } => {
                write!(
                    f,
                    "Required secret '{key}' is missing from '{}'",
                    path.display()
                )
            }
            Self::EmptySecret { key, path } => {
                write!(f, "Required secret '{key}' is empty in '{}'", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ComboStatsError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

/// Errors related to loading datasets from the statistics database.
#[derive(Debug)]
pub enum LoadError {
    /// The database store does not exist at the resolved location.
    StoreNotFound { path: PathBuf },

    /// Opening the connection failed.
    Connect {
        path: PathBuf,
        source: rusqlite::Error,
    },

    /// Preparing or running a dataset query failed.
    Query {
        dataset: &'static str,
        source: rusqlite::Error,
    },

    /// The query returned more rows than the in-memory cap allows.
    TooManyRows { dataset: &'static str, max: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StoreNotFound { path } => {
                write!(f, "Database '{}' does not exist", path.display())
            }
            Self::Connect { path, source } => {
                write!(
                    f,
                    "Cannot connect to database '{}': {source}",
                    path.display()
                )
            }
            Self::Query { dataset, source } => {
                write!(f, "Query for '{dataset}' failed: {source}")
            }
            Self::TooManyRows { dataset, max } => write!(
                f,
                "Query for '{dataset}' returned more than {max} rows. \
                 Narrow the query before loading."
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connect { source, .. } => Some(source),
            Self::Query { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<LoadError> for ComboStatsError {
    fn from(e: LoadError) -> Self {
        Self::Load(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors related to filter, sort, and pagination operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A required column is absent from the table schema.
    MissingColumn { column: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumn { column } => {
                write!(f, "Column '{column}' is not present in the table")
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for ComboStatsError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum row count.
    TooManyRows { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyRows { count, max } => write!(
                f,
                "Export of {count} rows exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for ComboStatsError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for ComboStats results.
pub type Result<T> = std::result::Result<T, ComboStatsError>;
