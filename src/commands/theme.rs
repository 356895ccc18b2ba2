// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Config;
use crate::theme::{self, Theme};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => println!("{}", theme::current(conn, cfg.prefers_dark)?),
        Some(("toggle", _)) => {
            let t = theme::toggle(conn, cfg.prefers_dark)?;
            println!("Theme set to {}", t);
        }
        Some(("set", sub)) => {
            let t: Theme = sub.get_one::<String>("theme").unwrap().parse()?;
            theme::save(conn, t)?;
            println!("Theme set to {}", t);
        }
        _ => {}
    }
    Ok(())
}
