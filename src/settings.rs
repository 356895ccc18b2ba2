// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Small key/value values that live next to the cache: the access
//! credential, the sync cursor and the theme preference.

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

pub const ACCESS_TOKEN_KEY: &str = "plaid_access_token";
pub const SYNC_CURSOR_KEY: &str = "plaid_sync_cursor";
pub const THEME_KEY: &str = "user-theme";

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn remove(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

pub fn access_token(conn: &Connection) -> Result<Option<String>> {
    Ok(get(conn, ACCESS_TOKEN_KEY)?.filter(|t| !t.is_empty()))
}

pub fn set_access_token(conn: &Connection, token: &str) -> Result<()> {
    set(conn, ACCESS_TOKEN_KEY, token)
}

/// Last cursor handed out by the server; empty when nothing has been synced.
pub fn sync_cursor(conn: &Connection) -> Result<String> {
    Ok(get(conn, SYNC_CURSOR_KEY)?.unwrap_or_default())
}

pub fn set_sync_cursor(conn: &Connection, cursor: &str) -> Result<()> {
    set(conn, SYNC_CURSOR_KEY, cursor)
}

pub fn clear_sync_cursor(conn: &Connection) -> Result<()> {
    remove(conn, SYNC_CURSOR_KEY)
}
