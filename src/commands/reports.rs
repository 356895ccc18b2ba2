// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store;
use crate::utils::{
    fmt_money, maybe_print_json, month_end, month_label, month_start, parse_month, pretty_table,
};
use crate::views::{self, MonthBucket, SpendingCategory};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let today = Local::now().date_naive();
    match m.subcommand() {
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub, today)?,
        Some(("cashflow", sub)) => cashflow(conn, sub, today)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn selected_month(sub: &clap::ArgMatches, today: NaiveDate) -> Result<NaiveDate> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(month_start(today)),
    }
}

pub fn category_report(conn: &Connection, month: NaiveDate) -> Result<Vec<SpendingCategory>> {
    let txs = store::transactions_between(conn, month_start(month), month_end(month))?;
    Ok(views::spending_categories(&views::spending_by_category(&txs)))
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let month = selected_month(sub, today)?;
    let cats = category_report(conn, month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cats)? {
        return Ok(());
    }
    let data = cats
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                fmt_money(&c.amount),
                fmt_money(&c.budget),
                format!("{:.0}%", c.percentage),
                fmt_money(&c.remaining()),
            ]
        })
        .collect();
    println!("Spending by category, {}", month_label(month));
    println!(
        "{}",
        pretty_table(&["Category", "Spent", "Budget", "% of budget", "Remaining"], data)
    );
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches, today: NaiveDate) -> Result<()> {
    let month = selected_month(sub, today)?;
    let txs = store::transactions_between(conn, month_start(month), month_end(month))?;
    let cf = views::cash_flow(&txs);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &cf)? {
        return Ok(());
    }
    println!("Cash flow, {}", month_label(month));
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Net"],
            vec![vec![
                fmt_money(&cf.income),
                fmt_money(&cf.expenses),
                fmt_money(&cf.net),
            ]],
        )
    );
    Ok(())
}

/// The newest `months` buckets, newest first.
pub fn monthly_report(conn: &Connection, months: usize) -> Result<Vec<MonthBucket>> {
    let txs = store::all_transactions(conn)?;
    let mut buckets = views::monthly_buckets(&txs);
    buckets.reverse();
    buckets.truncate(months);
    Ok(buckets)
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let buckets = monthly_report(conn, months)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &buckets)? {
        return Ok(());
    }
    let data = buckets
        .iter()
        .map(|b| {
            vec![
                b.label.clone(),
                fmt_money(&b.income),
                fmt_money(&b.expenses),
                fmt_money(&b.net),
                b.count.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Net", "Transactions"], data)
    );
    Ok(())
}
