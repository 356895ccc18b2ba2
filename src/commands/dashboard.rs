// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::api::AggregationApi;
use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardView};
use crate::theme::{self, Theme};
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use chrono::{Local, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub fn handle(
    conn: &mut Connection,
    api: &dyn AggregationApi,
    cfg: &Config,
    m: &clap::ArgMatches,
) -> Result<()> {
    let today = Local::now().date_naive();
    let month = match m.get_one::<String>("month") {
        Some(s) => parse_month(s)?,
        None => today,
    };
    let theme = theme::current(conn, cfg.prefers_dark)?;

    let mut dash = Dashboard::new(conn, api, cfg);
    let view = dash.load(today, month, Utc::now());
    if maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), view)? {
        return Ok(());
    }
    render(view, theme);
    Ok(())
}

fn money_cell(d: Decimal, theme: Theme) -> Cell {
    let c = Cell::new(fmt_money(&d));
    if d > Decimal::ZERO {
        c.fg(theme.inflow())
    } else if d < Decimal::ZERO {
        c.fg(theme.outflow())
    } else {
        c
    }
}

fn table(headers: &[&str]) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    t
}

pub fn render(view: &DashboardView, theme: Theme) {
    if !view.linked {
        println!("No bank account linked. Run `bankdash link token` to get started.");
        return;
    }

    println!("Accounts");
    let rows = view
        .accounts
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.subtype.clone(),
                fmt_money(&a.current_balance),
                a.available_balance.map(|d| fmt_money(&d)).unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Account", "Type", "Balance", "Available"], rows)
    );

    println!("\nCash Flow ({})", view.month);
    let mut cf = table(&["Income", "Expenses", "Net"]);
    cf.add_row(vec![
        Cell::new(fmt_money(&view.cash_flow.income)).fg(theme.inflow()),
        Cell::new(fmt_money(&view.cash_flow.expenses)).fg(theme.outflow()),
        money_cell(view.cash_flow.net, theme),
    ]);
    println!("{}", cf);

    if !view.spending.is_empty() {
        println!("\nSpending by Category");
        let mut t = table(&["Category", "Spent", "Budget", "% of budget", "Remaining"]);
        for c in &view.spending {
            t.add_row(vec![
                Cell::new(&c.name),
                Cell::new(fmt_money(&c.amount)),
                Cell::new(fmt_money(&c.budget)).fg(theme.muted()),
                Cell::new(format!("{:.0}%", c.percentage)),
                money_cell(c.remaining(), theme),
            ]);
        }
        println!("{}", t);
    }

    println!("\nRecurring");
    let mut rec = table(&["Kind", "Name", "Amount", "Frequency", "Next"]);
    let streams = [
        ("income", &view.recurring.income),
        ("expense", &view.recurring.expenses),
    ];
    for (kind, items) in streams {
        if items.is_empty() {
            rec.add_row(vec![
                Cell::new(kind),
                Cell::new(format!("No recurring {} found", kind)).fg(theme.muted()),
            ]);
        }
        for r in items {
            let amount = match kind {
                "income" => Cell::new(fmt_money(&r.amount)).fg(theme.inflow()),
                _ => Cell::new(fmt_money(&r.amount)).fg(theme.outflow()),
            };
            rec.add_row(vec![
                Cell::new(kind),
                Cell::new(r.display_name()),
                amount,
                Cell::new(r.frequency.to_lowercase()),
                Cell::new(r.next_date.map(|d| d.to_string()).unwrap_or_default()),
            ]);
        }
    }
    println!("{}", rec);

    println!("\nRecent Transactions");
    let mut recent = table(&["Date", "Description", "Amount"]);
    for t in &view.recent {
        // inflows are stored negative; show magnitude, colour by direction
        let amount = Cell::new(fmt_money(&t.amount.abs()));
        recent.add_row(vec![
            Cell::new(t.date.to_string()),
            Cell::new(&t.description),
            if t.is_inflow() {
                amount.fg(theme.inflow())
            } else {
                amount.fg(theme.outflow())
            },
        ]);
    }
    println!("{}", recent);

    if !view.top.is_empty() {
        println!("\nBudget Progress");
        for bar in &view.top {
            println!(
                "{:<24} {} {:.0}%",
                bar.name,
                progress_bar(bar.percentage, 30),
                bar.percentage
            );
        }
    }
}

/// Text bar `width` cells wide, filled in proportion to `pct` (0..=100).
pub fn progress_bar(pct: Decimal, width: usize) -> String {
    let pct = pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (pct * Decimal::from(width as u64) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
