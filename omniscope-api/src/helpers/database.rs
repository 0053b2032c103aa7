use std::path::PathBuf;
use std::sync::Arc;

use crate::database::Database;

/// Returns the path to the omniscope database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/omniscope/db.sqlite3`
/// - **Linux**: `~/.local/share/omniscope/db.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\omniscope\db.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("omniscope").join("db.sqlite3"))
}

/// Opens (creating and migrating if needed) the database at `db_path`, or at
/// the platform default when no path is configured.
pub fn initialize_database(db_path: Option<PathBuf>) -> anyhow::Result<(Arc<Database>, PathBuf)> {
    let db_path = match db_path {
        Some(path) => path,
        None => get_db_path()?,
    };

    let db = Database::new(&db_path)?;
    Ok((Arc::new(db), db_path))
}
