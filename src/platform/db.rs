// ComboStats - platform/db.rs
//
// Data loader: runs the fixed dataset queries against the statistics
// database and materialises typed tables.
//
// One connection is opened per load and closed when the load returns.
// There is no pooling, retry, or timeout: a failed query fails the load
// cycle and the caller surfaces the error.

use crate::core::dataset::{DatasetKind, Datasets};
use crate::core::model::{Column, Schema, Table, Value};
use crate::platform::config::Secrets;
use crate::util::constants;
use crate::util::error::LoadError;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

/// Where and as whom to connect.
///
/// Port, database name, and the TLS requirement are fixed; user, password,
/// and host come from the secrets file.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    pub username: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub ssl_required: bool,
}

impl std::fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseTarget")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("ssl_required", &self.ssl_required)
            .finish()
    }
}

impl DatabaseTarget {
    pub fn from_secrets(secrets: &Secrets) -> Self {
        Self {
            username: secrets.db_username.clone(),
            password: secrets.db_password.clone(),
            host: secrets.db_host.clone(),
            port: constants::DB_PORT,
            database: constants::DB_NAME.to_string(),
            ssl_required: constants::DB_SSL_REQUIRED,
        }
    }

    /// Location of the embedded store.
    ///
    /// A host ending in a database file extension is the store itself;
    /// any other host is a directory holding `<database>.db`.
    pub fn store_path(&self) -> PathBuf {
        let host = Path::new(&self.host);
        let is_file = host
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                constants::DB_FILE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if is_file {
            host.to_path_buf()
        } else {
            host.join(format!("{}.db", self.database))
        }
    }

    /// Human-readable target without the password.
    pub fn describe(&self) -> String {
        format!(
            "{}@{}:{}/{}{}",
            self.username,
            self.host,
            self.port,
            self.database,
            if self.ssl_required { " (ssl)" } else { "" }
        )
    }
}

/// Anything that can produce the dashboard's datasets.
pub trait StatsSource: Send + Sync {
    /// Run the fixed query for `kind` and return its rows.
    fn load(&self, kind: DatasetKind) -> Result<Table, LoadError>;

    /// Short description for logs and the status bar.
    fn describe(&self) -> String;
}

/// SQLite-backed statistics store.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    target: DatabaseTarget,
}

impl SqliteSource {
    pub fn new(target: DatabaseTarget) -> Self {
        Self { target }
    }

    fn connect(&self) -> Result<Connection, LoadError> {
        let path = self.target.store_path();
        if !path.is_file() {
            return Err(LoadError::StoreNotFound { path });
        }
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| LoadError::Connect {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!(
            target_db = %self.target.describe(),
            path = %path.display(),
            "Database connection opened"
        );
        Ok(conn)
    }
}

impl StatsSource for SqliteSource {
    fn load(&self, kind: DatasetKind) -> Result<Table, LoadError> {
        let conn = self.connect()?;
        let query_err = |e| LoadError::Query {
            dataset: kind.id(),
            source: e,
        };

        let mut stmt = conn.prepare(kind.query()).map_err(query_err)?;
        let columns: Vec<Column> = stmt
            .column_names()
            .into_iter()
            .map(|name| Column::new(name, kind.column_type(name)))
            .collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query([]).map_err(query_err)?;
        while let Some(row) = cursor.next().map_err(query_err)? {
            if rows.len() >= constants::MAX_ROWS_PER_DATASET {
                return Err(LoadError::TooManyRows {
                    dataset: kind.id(),
                    max: constants::MAX_ROWS_PER_DATASET,
                });
            }
            let mut values = Vec::with_capacity(width);
            for (idx, column) in columns.iter().enumerate() {
                let raw = match row.get_ref(idx).map_err(query_err)? {
                    ValueRef::Null | ValueRef::Blob(_) => Value::Null,
                    ValueRef::Integer(i) => Value::Int(i),
                    ValueRef::Real(f) => Value::Float(f),
                    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
                };
                values.push(raw.coerce(column.ty));
            }
            rows.push(values);
        }

        tracing::info!(dataset = kind.id(), rows = rows.len(), "Dataset loaded");
        Ok(Table::new(Schema::new(columns), rows))
    }

    fn describe(&self) -> String {
        self.target.describe()
    }
}

/// Load all three datasets, reporting each as it completes.
pub fn load_all(
    source: &dyn StatsSource,
    mut on_loaded: impl FnMut(DatasetKind, usize),
) -> Result<Datasets, LoadError> {
    let mut datasets = Datasets::default();
    for kind in DatasetKind::all() {
        let table = source.load(*kind)?;
        on_loaded(*kind, table.len());
        datasets.set(*kind, table);
    }
    Ok(datasets)
}
