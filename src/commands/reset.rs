// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::{db, settings};
use anyhow::{Result, bail};
use rusqlite::Connection;

/// Empties the cache and forgets the cursor so the next sync starts over.
/// The access token and theme are kept.
pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if !m.get_flag("yes") {
        bail!("Refusing to clear the local cache without --yes");
    }
    db::reset(conn)?;
    settings::clear_sync_cursor(conn)?;
    tracing::info!("local cache cleared");
    println!("Local cache cleared; run `bankdash sync` to repopulate it.");
    Ok(())
}
