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
            let mut streams = store::list_recurring(conn)?;
            if !sub.get_flag("all") {
                streams.retain(|s| s.is_active);
            }
            if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &streams)? {
                return Ok(());
            }
            let data = streams
                .iter()
                .map(|s| {
                    vec![
                        s.kind.as_str().to_string(),
                        s.display_name().to_string(),
                        fmt_money(&s.amount),
                        s.frequency.to_lowercase(),
                        s.next_date.map(|d| d.to_string()).unwrap_or_default(),
                        if s.is_active { "yes".into() } else { "no".into() },
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(
                    &["Kind", "Name", "Amount", "Frequency", "Next", "Active"],
                    data
                )
            );
        }
        _ => {}
    }
    Ok(())
}
