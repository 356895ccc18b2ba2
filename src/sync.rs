// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::api::AggregationApi;
use crate::{ingest, settings, store};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub pages: usize,
    pub added: usize,
    pub accounts: usize,
    pub cursor: String,
}

/// Pulls new transactions starting at the stored cursor.
///
/// Each page's records and its cursor are committed in one transaction, and
/// the next page is only requested after that commit. On error the store
/// holds exactly the pages that completed.
pub fn sync_transactions(
    conn: &mut Connection,
    api: &dyn AggregationApi,
    access_token: &str,
    max_pages: usize,
    now: DateTime<Utc>,
) -> Result<SyncReport> {
    let mut report = SyncReport {
        cursor: settings::sync_cursor(conn)?,
        ..SyncReport::default()
    };

    loop {
        if report.pages >= max_pages {
            tracing::warn!(pages = report.pages, "sync stopped at page limit");
            break;
        }
        let cursor = Some(report.cursor.as_str()).filter(|c| !c.is_empty());
        let page = api
            .sync_transactions(access_token, cursor)
            .with_context(|| format!("Transaction sync page {} failed", report.pages + 1))?;
        report.pages += 1;

        let next = page
            .next_cursor
            .filter(|c| !c.is_empty() && *c != report.cursor);
        let tx = conn.transaction()?;
        if !page.added.is_empty() {
            let items: Vec<_> = page.added.into_iter().map(ingest::transaction).collect();
            report.added += store::write_transactions(&tx, &items)?;
        }
        if let Some(accts) = page.accounts.filter(|a| !a.is_empty()) {
            let items: Vec<_> = accts.into_iter().map(|a| ingest::account(a, now)).collect();
            report.accounts += store::write_accounts(&tx, &items)?;
        }
        if let Some(next) = &next {
            settings::set_sync_cursor(&tx, next)?;
        }
        tx.commit()
            .with_context(|| format!("Storing transaction sync page {}", report.pages))?;

        let advanced = match next {
            Some(next) => {
                report.cursor = next;
                true
            }
            None => false,
        };
        tracing::debug!(page = report.pages, added = report.added, "sync page stored");

        if !page.has_more {
            break;
        }
        if !advanced {
            tracing::warn!("server reported more data without a new cursor; stopping");
            break;
        }
    }

    tracing::info!(
        pages = report.pages,
        added = report.added,
        accounts = report.accounts,
        "transaction sync complete"
    );
    Ok(report)
}
