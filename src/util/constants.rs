// ComboStats - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ComboStats";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ComboStats";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Database target
// =============================================================================

/// Fixed port of the statistics database.
pub const DB_PORT: u16 = 5432;

/// Fixed database name. Also the file stem of the embedded store.
pub const DB_NAME: &str = "combostats";

/// Connections to the statistics database always require TLS on networked
/// targets. Recorded on the target so it shows up in diagnostics.
pub const DB_SSL_REQUIRED: bool = true;

/// File extensions that mark the host secret as a direct path to the store.
pub const DB_FILE_EXTENSIONS: &[&str] = &["db", "sqlite", "sqlite3"];

// =============================================================================
// Secrets
// =============================================================================

/// Secrets file name (looked up in the config directory unless overridden).
pub const SECRETS_FILE_NAME: &str = "secrets.toml";

/// Secret key holding the database user name.
pub const SECRET_DB_USERNAME: &str = "DB_USERNAME";

/// Secret key holding the database password.
pub const SECRET_DB_PASSWORD: &str = "DB_PASSWORD";

/// Secret key holding the database host.
pub const SECRET_DB_HOST: &str = "DB_HOST";

/// Maximum size of the secrets file in bytes.
pub const MAX_SECRETS_FILE_SIZE: u64 = 16 * 1024;

// =============================================================================
// Table view
// =============================================================================

/// Rows per page in the paginated table.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Smallest configurable page size.
pub const MIN_PAGE_SIZE: usize = 5;

/// Largest configurable page size.
pub const MAX_PAGE_SIZE: usize = 500;

/// Number of bars in the ranking chart.
pub const DEFAULT_TOP_N: usize = 20;

/// Smallest configurable chart size.
pub const MIN_TOP_N: usize = 1;

/// Largest configurable chart size.
pub const MAX_TOP_N: usize = 100;

/// An empty membership selection or an empty text query matches every row.
///
/// The dashboards this replaces disagreed on the meaning of an empty
/// multi-select. One policy is applied everywhere.
pub const EMPTY_SELECTION_MATCHES_ALL: bool = true;

/// Hard upper bound on rows held per dataset after a load.
pub const MAX_ROWS_PER_DATASET: usize = 1_000_000;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

/// Maximum number of load-progress messages processed per UI frame.
pub const MAX_LOAD_MESSAGES_PER_FRAME: usize = 50;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of rows that can be exported in a single operation.
pub const MAX_EXPORT_ROWS: usize = 5_000_000;

/// Date format used for display and export.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
