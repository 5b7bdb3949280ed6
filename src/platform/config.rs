// ComboStats - platform/config.rs
//
// Platform-specific configuration, data directory resolution, config.toml
// loading with startup validation, and secrets.toml loading.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolved platform paths for ComboStats data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/combostats/ or %APPDATA%\ComboStats\)
    pub config_dir: PathBuf,

    /// Data directory (default export location).
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
                data_dir: PathBuf::from("."),
            }
        }
    }

    /// Paths rooted at an explicit directory (CLI `--config-dir`).
    pub fn at(dir: &Path) -> Self {
        Self {
            config_dir: dir.to_path_buf(),
            data_dir: dir.to_path_buf(),
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    pub fn secrets_file(&self) -> PathBuf {
        self.config_dir.join(constants::SECRETS_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[display]` section.
    pub display: DisplaySection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[display]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Rows per table page.
    pub page_size: Option<usize>,
    /// Bars in the ranking chart.
    pub top_n: Option<usize>,
    /// Whether tables are paginated at all.
    pub paginate: Option<bool>,
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Rows per table page.
    pub page_size: usize,
    /// Bars in the ranking chart.
    pub top_n: usize,
    /// Paginate tables (true) or show every filtered row (false).
    pub paginate: bool,
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: constants::DEFAULT_PAGE_SIZE,
            top_n: constants::DEFAULT_TOP_N,
            paginate: true,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// If the file is unparseable, returns defaults with a warning.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let msg = format!(
                "Could not read config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    let raw: RawConfig = match toml::from_str(&content) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!(
                "Failed to parse config file '{}': {e}. Using defaults.",
                config_path.display()
            );
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");
    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Check each raw field against its named bounds, accumulating warnings.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    if let Some(size) = raw.display.page_size {
        if (constants::MIN_PAGE_SIZE..=constants::MAX_PAGE_SIZE).contains(&size) {
            config.page_size = size;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "[display] page_size".to_string(),
                    value: size.to_string(),
                    expected: format!(
                        "{}-{} (using default {})",
                        constants::MIN_PAGE_SIZE,
                        constants::MAX_PAGE_SIZE,
                        constants::DEFAULT_PAGE_SIZE
                    ),
                }
                .to_string(),
            );
        }
    }

    if let Some(n) = raw.display.top_n {
        if (constants::MIN_TOP_N..=constants::MAX_TOP_N).contains(&n) {
            config.top_n = n;
        } else {
            warnings.push(
                ConfigError::ValueOutOfRange {
                    field: "[display] top_n".to_string(),
                    value: n.to_string(),
                    expected: format!(
                        "{}-{} (using default {})",
                        constants::MIN_TOP_N,
                        constants::MAX_TOP_N,
                        constants::DEFAULT_TOP_N
                    ),
                }
                .to_string(),
            );
        }
    }

    if let Some(paginate) = raw.display.paginate {
        config.paginate = paginate;
    }

    if let Some(ref theme) = raw.display.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                warnings.push(format!(
                    "[display] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
                ));
            }
        }
    }

    if let Some(size) = raw.display.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            warnings.push(format!(
                "[display] font_size = {size} is out of range ({}-{}). Using default ({}).",
                constants::MIN_FONT_SIZE,
                constants::MAX_FONT_SIZE,
                constants::DEFAULT_FONT_SIZE,
            ));
        }
    }

    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    config
}

// =============================================================================
// secrets.toml
// =============================================================================

/// Database credentials read from secrets.toml.
///
/// All three keys are required; a missing file or key is fatal at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Secrets {
    pub db_username: String,
    pub db_password: String,
    pub db_host: String,
}

impl std::fmt::Debug for Secrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secrets")
            .field("db_username", &self.db_username)
            .field("db_password", &"<redacted>")
            .field("db_host", &self.db_host)
            .finish()
    }
}

/// Load and validate the secrets file.
///
/// Unknown keys are ignored. Values must be non-empty strings.
pub fn load_secrets(path: &Path) -> Result<Secrets, ConfigError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::SecretsNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    if metadata.len() > constants::MAX_SECRETS_FILE_SIZE {
        return Err(ConfigError::SecretsTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max: constants::MAX_SECRETS_FILE_SIZE,
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let table: BTreeMap<String, toml::Value> =
        toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
            path: path.to_path_buf(),
            source: e,
        })?;

    let secret = |key: &'static str| -> Result<String, ConfigError> {
        let value = table
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ConfigError::MissingSecret {
                key,
                path: path.to_path_buf(),
            })?;
        if value.trim().is_empty() {
            return Err(ConfigError::EmptySecret {
                key,
                path: path.to_path_buf(),
            });
        }
        Ok(value.to_string())
    };

    let secrets = Secrets {
        db_username: secret(constants::SECRET_DB_USERNAME)?,
        db_password: secret(constants::SECRET_DB_PASSWORD)?,
        db_host: secret(constants::SECRET_DB_HOST)?,
    };

    tracing::info!(path = %path.display(), user = %secrets.db_username, "Secrets loaded");
    Ok(secrets)
}
