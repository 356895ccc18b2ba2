// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::AggregationApi;
use crate::config::Config;
use crate::link::{complete_link, request_link_token};
use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;
use std::time::Duration;

const LINK_BACKOFF: Duration = Duration::from_millis(750);

pub fn handle(
    conn: &mut Connection,
    api: &dyn AggregationApi,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("token", _)) => {
            let token = request_link_token(api, cfg, LINK_BACKOFF)?;
            println!("{}", token);
            eprintln!(
                "Open the provider's Link widget ({} environment) with this token, then run \
                 `bankdash link exchange --public-token <TOKEN>`.",
                cfg.plaid_env
            );
        }
        Some(("exchange", sub)) => {
            let public_token = sub.get_one::<String>("public-token").unwrap();
            let outcome = complete_link(conn, api, cfg, public_token, Utc::now())?;
            match (outcome.initial_sync, outcome.sync_error) {
                (Some(report), _) => println!(
                    "Bank connected. Imported {} transactions and {} accounts.",
                    report.added, report.accounts
                ),
                (None, Some(err)) => println!(
                    "Bank connected, but the first sync failed ({}). Run `bankdash sync` to retry.",
                    err
                ),
                (None, None) => println!("Bank connected."),
            }
        }
        _ => {}
    }
    Ok(())
}
