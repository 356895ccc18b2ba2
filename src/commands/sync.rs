// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::AggregationApi;
use crate::config::Config;
use crate::{settings, sync};
use anyhow::{Result, anyhow};
use chrono::Utc;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, api: &dyn AggregationApi, cfg: &Config) -> Result<()> {
    let token = settings::access_token(conn)?
        .ok_or_else(|| anyhow!("No bank linked yet; run `bankdash link token` first"))?;
    let report = sync::sync_transactions(conn, api, &token, cfg.max_sync_pages, Utc::now())?;
    println!(
        "Synced {} page(s): {} transactions added, {} accounts updated.",
        report.pages, report.added, report.accounts
    );
    Ok(())
}
