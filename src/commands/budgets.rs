// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{BudgetCategory, NewBudget, Timeframe};
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result, anyhow, bail};
use chrono::Utc;
use rust_decimal::Decimal;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("create", sub)) => create(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// `FOOD_AND_DRINK=450` -> line with that limit.
pub fn parse_limit(s: &str) -> Result<BudgetCategory> {
    let (cat, amount) = s
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid limit '{}', expected CATEGORY=AMOUNT", s))?;
    let cat = cat.trim();
    if cat.is_empty() {
        bail!("Invalid limit '{}': category is empty", s);
    }
    let limit = parse_decimal(amount).with_context(|| format!("Limit for {}", cat))?;
    if limit < Decimal::ZERO {
        bail!("Limit for {} must not be negative", cat);
    }
    Ok(BudgetCategory::with_limit(cat, limit))
}

fn create(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let timeframe: Timeframe = sub.get_one::<String>("timeframe").unwrap().parse()?;
    let categories = sub
        .get_many::<String>("limit")
        .into_iter()
        .flatten()
        .map(|s| parse_limit(s))
        .collect::<Result<Vec<_>>>()?;
    let budget = NewBudget {
        name,
        categories,
        timeframe,
        active: !sub.get_flag("inactive"),
    };
    let id = store::create_budget(conn, &budget, Utc::now())?;
    println!(
        "Created {} budget '{}' ({} categories) as {}",
        budget.timeframe,
        budget.name,
        budget.categories.len(),
        id
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let budgets = store::list_budgets(conn)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &budgets)? {
        return Ok(());
    }
    let mut data = Vec::new();
    for b in &budgets {
        for c in &b.categories {
            data.push(vec![
                b.name.clone(),
                b.timeframe.to_string(),
                if b.active { "yes".into() } else { "no".into() },
                c.category.clone(),
                fmt_money(&c.limit),
            ]);
        }
    }
    println!(
        "{}",
        pretty_table(&["Budget", "Timeframe", "Active", "Category", "Limit"], data)
    );
    Ok(())
}
