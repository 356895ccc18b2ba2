// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use crate::{settings, store};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

/// Issues found in the local cache, as `(kind, detail)` pairs.
pub fn diagnose(conn: &Connection, today: NaiveDate) -> Result<Vec<(String, String)>> {
    let mut rows = Vec::new();

    // 1) Link state
    if settings::access_token(conn)?.is_none() {
        rows.push(("not_linked".into(), "no access token stored".into()));
    } else if settings::sync_cursor(conn)?.is_empty() {
        rows.push(("never_synced".into(), "no sync cursor stored".into()));
    }

    // 2) Transactions pointing at accounts we have no balance for
    let mut stmt = conn.prepare(
        "SELECT account_id, COUNT(*) FROM transactions
         WHERE account_id NOT IN (SELECT id FROM accounts)
         GROUP BY account_id ORDER BY account_id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let acct: String = r.get(0)?;
        let n: i64 = r.get(1)?;
        rows.push((
            "txn_unknown_account".into(),
            format!("{} ({} transactions)", acct, n),
        ));
    }

    // 3) Active streams whose predicted date has already passed
    for s in store::list_recurring(conn)? {
        if let Some(next) = s.next_date.filter(|d| s.is_active && *d < today) {
            rows.push((
                "stale_recurring".into(),
                format!("{} expected {}", s.display_name(), next),
            ));
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let counts = store::counts(conn)?;
    println!(
        "cache: {} transactions, {} accounts, {} recurring streams, {} budgets",
        counts.transactions, counts.accounts, counts.recurring, counts.budgets
    );
    let rows = diagnose(conn, Local::now().date_naive())?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        let data = rows.into_iter().map(|(k, d)| vec![k, d]).collect();
        println!("{}", pretty_table(&["Issue", "Detail"], data));
    }
    Ok(())
}
