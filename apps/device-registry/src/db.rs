//! Database connection setup for the binary.
//!
//! The pool is built with sqlx so per-connection PRAGMAs can be applied,
//! then handed to SeaORM.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use runtime::DatabaseConfig;
use sea_orm::{DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::SqlitePoolOptions;
use url::Url;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Detect DB backend from URL scheme. Only SQLite is wired in this binary.
pub fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;

    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps in-memory DSNs as `sqlite::memory:`.
/// - Normalizes backslashes into forward slashes.
/// - Adds `mode=rwc` so a missing database file is created.
pub fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    match query {
        Some(q) if q.split('&').any(|kv| kv.starts_with("mode=")) => {
            out.push('?');
            out.push_str(q);
        }
        Some(q) => {
            out.push('?');
            out.push_str(q);
            out.push_str("&mode=rwc");
        }
        None => out.push_str("?mode=rwc"),
    }
    Ok(out)
}

/// Open the configured database. Relative SQLite paths resolve under `base_dir`.
pub async fn connect(cfg: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    detect_from_dsn(cfg)?;
    let dsn = absolutize_sqlite_dsn(cfg.url.trim(), base_dir, true)?;

    let mut opts = SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(5));
    if dsn == MEMORY_DSN {
        // Every connection to :memory: is a separate database.
        opts = opts.max_connections(1).min_connections(1);
    } else if let Some(n) = cfg.max_conns {
        opts = opts.max_connections(n);
    }

    let busy = cfg.busy_timeout_ms;
    opts = opts.after_connect(move |conn, _meta| {
        Box::pin(async move {
            sqlx::query("PRAGMA foreign_keys = ON")
                .execute(&mut *conn)
                .await?;
            if let Some(ms) = busy {
                // PRAGMA can't use bind parameters; use a numeric literal.
                let stmt = format!("PRAGMA busy_timeout = {ms}");
                sqlx::query(&stmt).execute(&mut *conn).await?;
            }
            Ok(())
        })
    });

    tracing::info!("Connecting to database: {}", dsn);
    let pool = opts
        .connect(&dsn)
        .await
        .with_context(|| format!("Failed to connect to {dsn}"))?;
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
