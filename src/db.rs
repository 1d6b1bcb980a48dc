use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::error::AppError;

/// Handle to the ledger database file. Connections are not held: every
/// operation opens the file, runs its statements, and closes on drop.
/// Single-user software; SQLite's own locking covers the rest.
pub struct Db {
  db_path: PathBuf,
}

pub fn resolve_app_dir() -> Result<PathBuf, AppError> {
  if let Ok(path) = std::env::var("MATERIAL_LEDGER_DIR") {
    return Ok(PathBuf::from(path));
  }
  if let Some(portable) = resolve_portable_dir()? {
    return Ok(portable);
  }

  let base = dirs_next::data_local_dir()
    .ok_or_else(|| AppError::new("PATH", "local data directory not found"))?;
  Ok(base.join("MaterialLedger"))
}

pub fn init_db(app_dir: &Path) -> Result<Db, AppError> {
  fs::create_dir_all(app_dir)?;
  let db_path = app_dir.join("inventory.db");
  let mut conn = open_connection(&db_path)?;
  run_migrations(&mut conn)?;
  Ok(Db { db_path })
}

impl Db {
  pub fn path(&self) -> &Path {
    &self.db_path
  }

  /// Scoped acquisition: the connection lives exactly as long as `f`.
  pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T, AppError>) -> Result<T, AppError> {
    let conn = open_connection(&self.db_path)?;
    f(&conn)
  }
}

fn open_connection(db_path: &Path) -> Result<Connection, AppError> {
  let conn = Connection::open(db_path)?;
  conn.execute_batch("PRAGMA foreign_keys = ON; PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
  conn.busy_timeout(Duration::from_secs(5))?;
  Ok(conn)
}

fn run_migrations(conn: &mut Connection) -> Result<(), AppError> {
  conn.execute_batch(
    "CREATE TABLE IF NOT EXISTS schema_migrations (version TEXT PRIMARY KEY, applied_at TEXT NOT NULL)",
  )?;

  apply_migration(conn, "001_init", include_str!("../migrations/001_init.sql"))?;
  Ok(())
}

fn apply_migration(conn: &mut Connection, version: &str, sql: &str) -> Result<(), AppError> {
  let exists: i64 = conn.query_row(
    "SELECT COUNT(*) FROM schema_migrations WHERE version = ?1",
    params![version],
    |row| row.get(0),
  )?;
  if exists > 0 {
    return Ok(());
  }

  conn.execute_batch(sql)?;
  conn.execute(
    "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
    params![version, Utc::now().to_rfc3339()],
  )?;
  Ok(())
}

fn resolve_portable_dir() -> Result<Option<PathBuf>, AppError> {
  let env_enabled = std::env::var("MATERIAL_LEDGER_PORTABLE")
    .ok()
    .map(|value| {
      let value = value.to_ascii_lowercase();
      value == "1" || value == "true" || value == "yes"
    })
    .unwrap_or(false);

  let exe_dir = std::env::current_exe()
    .ok()
    .and_then(|path| path.parent().map(|parent| parent.to_path_buf()));

  if let Some(exe_dir) = exe_dir {
    let flag = exe_dir.join("portable.flag");
    let data_dir = exe_dir.join("data");
    if env_enabled || flag.exists() || data_dir.exists() {
      fs::create_dir_all(&data_dir)?;
      return Ok(Some(data_dir));
    }
  }

  Ok(None)
}
