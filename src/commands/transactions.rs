// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::{Result, bail};
use chrono::{Duration, Local, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub, Local::now().date_naive())?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.description.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.account_id.clone(),
                    if r.pending { "pending".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Category", "Amount", "Account", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub description: String,
    pub category: String,
    pub amount: String,
    pub account_id: String,
    pub merchant_name: String,
    pub pending: bool,
}

/// Rows for `tx list`. Without `--from` the window is the 30 days ending
/// at `--to` (or `today`).
pub fn query_rows(
    conn: &Connection,
    sub: &clap::ArgMatches,
    today: NaiveDate,
) -> Result<Vec<TransactionRow>> {
    let to = match sub.get_one::<String>("to") {
        Some(s) => parse_date(s.trim())?,
        None => today,
    };
    let from = match sub.get_one::<String>("from") {
        Some(s) => parse_date(s.trim())?,
        None => to - Duration::days(30),
    };
    if from > to {
        bail!("--from {} is after --to {}", from, to);
    }

    let mut txs = store::transactions_between(conn, from, to)?;
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }
    Ok(txs
        .into_iter()
        .map(|t| TransactionRow {
            date: t.date.to_string(),
            amount: t.amount.to_string(),
            merchant_name: t.merchant_name.unwrap_or_default(),
            id: t.id,
            description: t.description,
            category: t.category,
            account_id: t.account_id,
            pending: t.pending,
        })
        .collect())
}
