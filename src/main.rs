// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;

use bankdash::api::HttpAggregator;
use bankdash::config::Config;
use bankdash::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    utils::init_logging(matches.get_flag("verbose"));

    let mut cfg = Config::load(matches.get_one::<String>("config").map(Path::new))?;
    cfg.apply_cli(&matches);

    let mut conn = db::open_or_init(cfg.db_path.as_deref())?;

    match matches.subcommand() {
        Some(("init", _)) => match cfg.db_path.as_deref() {
            Some(p) => println!("Database initialized at {}", p.display()),
            None => println!("Database initialized at {}", db::db_path()?.display()),
        },
        Some(("link", sub)) => {
            let api = HttpAggregator::new(&cfg)?;
            commands::link::handle(&mut conn, &api, &cfg, sub)?
        }
        Some(("sync", _)) => {
            let api = HttpAggregator::new(&cfg)?;
            commands::sync::handle(&mut conn, &api, &cfg)?
        }
        Some(("dashboard", sub)) => {
            let api = HttpAggregator::new(&cfg)?;
            commands::dashboard::handle(&mut conn, &api, &cfg, sub)?
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("recurring", sub)) => commands::recurring::handle(&conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("budget", sub)) => commands::budgets::handle(&conn, sub)?,
        Some(("theme", sub)) => commands::theme::handle(&conn, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        Some(("reset", sub)) => commands::reset::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
