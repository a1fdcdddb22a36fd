use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use super::schema;

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Builds a `sqlite://` URL for a database file, creating missing parent
/// directories.
fn sqlite_url(db_file: &Path) -> anyhow::Result<String> {
    if let Some(parent) = db_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    Ok(format!("sqlite://{}{}?mode=rwc", prefix, normalized))
}

/// Opens a pooled connection. SQL statement logging is left to `RUST_LOG`.
pub async fn connect(url: &str) -> Result<DatabaseConnection, sea_orm::DbErr> {
    let mut options = ConnectOptions::new(url.to_owned());
    options.sqlx_logging(false);
    if url.contains(":memory:") {
        // Each pooled connection would otherwise get its own empty database
        options.max_connections(1).min_connections(1);
    }
    Database::connect(options).await
}

/// Opens the database file, registers the schema and stores the global
/// connection used by the service layer.
pub async fn initialize_database(db_path: Option<&Path>) -> anyhow::Result<()> {
    let db_file = db_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("target/db/erp.db"));
    let db_url = sqlite_url(&db_file)?;
    tracing::info!("Opening database: {}", db_file.display());

    let conn = connect(&db_url).await?;
    schema::register_schema(&conn).await?;

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> anyhow::Result<&'static DatabaseConnection> {
    DB_CONN
        .get()
        .ok_or_else(|| anyhow::anyhow!("Database connection has not been initialized"))
}
