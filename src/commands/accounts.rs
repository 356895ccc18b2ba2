// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => {
            let accounts = store::list_accounts(conn)?;
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &accounts)? {
                return Ok(());
            }
            let data = accounts
                .into_iter()
                .map(|a| {
                    vec![
                        a.name,
                        format!("{}/{}", a.r#type, a.subtype),
                        fmt_money(&a.current_balance),
                        a.available_balance
                            .map(|d| fmt_money(&d))
                            .unwrap_or_default(),
                        a.last_updated.format("%Y-%m-%d %H:%M").to_string(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Name", "Type", "Balance", "Available", "Updated"], data)
            );
        }
        _ => {}
    }
    Ok(())
}
