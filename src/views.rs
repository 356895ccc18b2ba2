// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only summaries computed from cached records.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{RecurringTransaction, StreamKind, Transaction};

/// Colours handed out to categories in display order.
pub const PALETTE: [&str; 10] = [
    "#4CAF50", "#2196F3", "#FF9800", "#F44336", "#9C27B0", "#009688", "#795548", "#607D8B",
    "#FFC107", "#E91E63",
];

/// Display target for a category when the user has not set one.
pub fn budget_target(category: &str) -> Decimal {
    let v: i64 = match category {
        "FOOD_AND_DRINK" => 500,
        "RENT_AND_UTILITIES" => 1500,
        "TRANSPORTATION" => 300,
        "SHOPPING" => 400,
        "ENTERTAINMENT" => 200,
        "GENERAL_MERCHANDISE" => 300,
        "TRAVEL" => 200,
        _ => 200,
    };
    Decimal::from(v)
}

/// `FOOD_AND_DRINK` -> `FOOD AND DRINK`
pub fn display_category(raw: &str) -> String {
    raw.replace('_', " ").to_uppercase()
}

/// Outflows (positive amounts) summed per category.
pub fn spending_by_category(txs: &[Transaction]) -> BTreeMap<String, Decimal> {
    let mut out: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txs.iter().filter(|t| t.amount > Decimal::ZERO) {
        *out.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }
    out
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CashFlow {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn cash_flow(txs: &[Transaction]) -> CashFlow {
    let mut income = Decimal::ZERO;
    let mut expenses = Decimal::ZERO;
    for t in txs {
        if t.amount < Decimal::ZERO {
            income += t.amount.abs();
        } else {
            expenses += t.amount;
        }
    }
    CashFlow {
        income,
        expenses,
        net: income - expenses,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingCategory {
    pub name: String,
    pub amount: Decimal,
    pub budget: Decimal,
    /// Share of the budget used, capped at 100.
    pub percentage: Decimal,
    pub color: &'static str,
}

impl SpendingCategory {
    /// Negative once the category is over budget.
    pub fn remaining(&self) -> Decimal {
        self.budget - self.amount
    }
}

/// Budget progress per category, largest spend first. Colours follow the
/// category's position in `spending` so they stay stable across refreshes.
pub fn spending_categories(spending: &BTreeMap<String, Decimal>) -> Vec<SpendingCategory> {
    let hundred = Decimal::ONE_HUNDRED;
    let mut out: Vec<SpendingCategory> = spending
        .iter()
        .enumerate()
        .map(|(i, (name, amount))| {
            let budget = budget_target(name);
            let percentage = if budget.is_zero() {
                hundred
            } else {
                (*amount / budget * hundred).min(hundred)
            };
            SpendingCategory {
                name: display_category(name),
                amount: *amount,
                budget,
                percentage,
                color: PALETTE[i % PALETTE.len()],
            }
        })
        .filter(|c| c.amount > Decimal::ZERO)
        .collect();
    out.sort_by(|a, b| b.amount.cmp(&a.amount));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBar {
    pub name: String,
    pub percentage: Decimal,
    pub color: &'static str,
}

pub fn top_categories(categories: &[SpendingCategory], n: usize) -> Vec<ChartBar> {
    categories
        .iter()
        .take(n)
        .map(|c| ChartBar {
            name: c.name.clone(),
            percentage: c.percentage,
            color: c.color,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// "October 2026"
    pub fn label(&self) -> String {
        match self.first_day() {
            Some(d) => d.format("%B %Y").to_string(),
            None => format!("{:04}-{:02}", self.year, self.month),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub count: usize,
}

/// Groups transactions by calendar month, oldest month first. Ordering uses
/// the numeric key, never the display label.
pub fn monthly_buckets(txs: &[Transaction]) -> Vec<MonthBucket> {
    let mut map: BTreeMap<MonthKey, (Decimal, Decimal, usize)> = BTreeMap::new();
    for t in txs {
        let e = map
            .entry(MonthKey::of(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO, 0));
        if t.amount < Decimal::ZERO {
            e.0 += t.amount.abs();
        } else {
            e.1 += t.amount;
        }
        e.2 += 1;
    }
    map.into_iter()
        .map(|(key, (income, expenses, count))| MonthBucket {
            label: key.label(),
            key,
            income,
            expenses,
            net: income - expenses,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecurringView {
    pub income: Vec<RecurringTransaction>,
    pub expenses: Vec<RecurringTransaction>,
}

/// Active streams split by kind.
pub fn classify_recurring(streams: &[RecurringTransaction]) -> RecurringView {
    let mut view = RecurringView::default();
    for s in streams.iter().filter(|s| s.is_active) {
        match s.kind {
            StreamKind::Income => view.income.push(s.clone()),
            StreamKind::Expense => view.expenses.push(s.clone()),
        }
    }
    view
}

pub const RECENT_DAYS: i64 = 30;
pub const RECENT_LIMIT: usize = 10;

/// Newest `limit` transactions dated within `days` of `today`.
pub fn recent_transactions(
    txs: &[Transaction],
    today: NaiveDate,
    days: i64,
    limit: usize,
) -> Vec<Transaction> {
    let start = today - Duration::days(days);
    let mut out: Vec<Transaction> = txs
        .iter()
        .filter(|t| t.date >= start && t.date <= today)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    out.truncate(limit);
    out
}
