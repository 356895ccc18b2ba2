// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A cached transaction. Positive amounts are money leaving the account,
/// negative amounts are money coming in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub merchant_name: Option<String>,
    pub pending: bool,
    pub payment_channel: String,
    /// Upstream record exactly as received.
    pub original_data: serde_json::Value,
}

impl Transaction {
    pub fn is_inflow(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub r#type: String,
    pub subtype: String,
    pub current_balance: Decimal,
    pub available_balance: Option<Decimal>,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Income,
    Expense,
}

impl StreamKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamKind::Income => "income",
            StreamKind::Expense => "expense",
        }
    }
}

impl FromStr for StreamKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "income" => Ok(StreamKind::Income),
            "expense" => Ok(StreamKind::Expense),
            other => Err(anyhow!("Unknown stream kind '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransaction {
    pub id: String,
    pub frequency: String,
    pub amount: Decimal,
    pub category: String,
    pub merchant_name: Option<String>,
    pub description: Option<String>,
    pub next_date: Option<NaiveDate>,
    pub is_active: bool,
    pub kind: StreamKind,
}

impl RecurringTransaction {
    /// Merchant, then the provider's description, then the category.
    pub fn display_name(&self) -> &str {
        [self.merchant_name.as_deref(), self.description.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or(self.category.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Weekly,
    Monthly,
    Yearly,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::Weekly => "weekly",
            Timeframe::Monthly => "monthly",
            Timeframe::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(Timeframe::Weekly),
            "monthly" => Ok(Timeframe::Monthly),
            "yearly" => Ok(Timeframe::Yearly),
            other => Err(anyhow!(
                "Invalid timeframe '{}', expected weekly|monthly|yearly",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub category: String,
    pub limit: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub percentage: Decimal,
}

impl BudgetCategory {
    /// A fresh line with nothing spent against it yet.
    pub fn with_limit(category: impl Into<String>, limit: Decimal) -> Self {
        Self {
            category: category.into(),
            limit,
            spent: Decimal::ZERO,
            remaining: limit,
            percentage: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: String,
    pub name: String,
    pub categories: Vec<BudgetCategory>,
    pub timeframe: Timeframe,
    pub active: bool,
}

/// A budget before the store has assigned it an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    pub name: String,
    pub categories: Vec<BudgetCategory>,
    pub timeframe: Timeframe,
    pub active: bool,
}
