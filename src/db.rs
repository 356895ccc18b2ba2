// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("dev", "Bankdash", "bankdash"));

pub fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")
}

pub fn db_path() -> Result<PathBuf> {
    let proj = project_dirs()?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("bankdash.sqlite"))
}

/// Opens the store at `path` (or the platform default) and makes sure every
/// collection exists.
pub fn open_or_init(path: Option<&Path>) -> Result<Connection> {
    let path = match path {
        Some(p) => {
            if let Some(parent) = p.parent().filter(|d| !d.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            p.to_path_buf()
        }
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "store ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        type TEXT NOT NULL,
        subtype TEXT NOT NULL,
        current_balance TEXT NOT NULL,
        available_balance TEXT,
        last_updated TEXT NOT NULL
    );

    -- account_id is not a foreign key: a sync page may carry transactions
    -- for accounts whose balances have not been fetched yet
    CREATE TABLE IF NOT EXISTS transactions(
        id TEXT PRIMARY KEY,
        account_id TEXT NOT NULL,
        amount TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL,
        category TEXT NOT NULL,
        merchant_name TEXT,
        pending INTEGER NOT NULL DEFAULT 0,
        payment_channel TEXT NOT NULL,
        original_data TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS budgets(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        categories TEXT NOT NULL, -- JSON array of budget lines
        timeframe TEXT NOT NULL CHECK(timeframe IN ('weekly','monthly','yearly')),
        active INTEGER NOT NULL DEFAULT 1
    );

    CREATE TABLE IF NOT EXISTS recurring_transactions(
        id TEXT PRIMARY KEY,
        frequency TEXT NOT NULL,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        merchant_name TEXT,
        description TEXT,
        next_date TEXT,
        is_active INTEGER NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense'))
    );
    "#,
    )?;
    Ok(())
}

/// Drops every cached collection and recreates them empty. Settings
/// (access token, cursor, theme) survive.
pub fn reset(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    DROP TABLE IF EXISTS transactions;
    DROP TABLE IF EXISTS accounts;
    DROP TABLE IF EXISTS budgets;
    DROP TABLE IF EXISTS recurring_transactions;
    "#,
    )?;
    init_schema(conn)
}
