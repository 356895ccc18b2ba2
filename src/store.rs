// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The local cache: four collections, each written by wholesale upsert and
//! read back whole or by date range.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Row, params};

use crate::models::{
    Account, Budget, BudgetCategory, NewBudget, RecurringTransaction, StreamKind, Timeframe,
    Transaction,
};
use crate::utils::{parse_date, parse_decimal};

pub fn upsert_transactions(conn: &mut Connection, items: &[Transaction]) -> Result<usize> {
    let tx = conn.transaction()?;
    let n = write_transactions(&tx, items)?;
    tx.commit()?;
    Ok(n)
}

/// Upserts without opening a transaction of its own; the caller owns it.
pub fn write_transactions(conn: &Connection, items: &[Transaction]) -> Result<usize> {
    {
        let mut stmt = conn.prepare(
            "INSERT INTO transactions(id, account_id, amount, date, description, category,
                                      merchant_name, pending, payment_channel, original_data)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
             ON CONFLICT(id) DO UPDATE SET
                account_id=excluded.account_id,
                amount=excluded.amount,
                date=excluded.date,
                description=excluded.description,
                category=excluded.category,
                merchant_name=excluded.merchant_name,
                pending=excluded.pending,
                payment_channel=excluded.payment_channel,
                original_data=excluded.original_data",
        )?;
        for t in items {
            stmt.execute(params![
                t.id,
                t.account_id,
                t.amount.to_string(),
                t.date.to_string(),
                t.description,
                t.category,
                t.merchant_name,
                t.pending,
                t.payment_channel,
                serde_json::to_string(&t.original_data)?,
            ])?;
        }
    }
    Ok(items.len())
}

const TRANSACTION_COLUMNS: &str = "id, account_id, amount, date, description, category, \
     merchant_name, pending, payment_channel, original_data";

fn transaction_from_row(r: &Row<'_>) -> Result<Transaction> {
    let id: String = r.get(0)?;
    let amount: String = r.get(2)?;
    let date: String = r.get(3)?;
    let raw: String = r.get(9)?;
    Ok(Transaction {
        account_id: r.get(1)?,
        amount: parse_decimal(&amount).with_context(|| format!("Transaction {}", id))?,
        date: parse_date(&date).with_context(|| format!("Transaction {}", id))?,
        description: r.get(4)?,
        category: r.get(5)?,
        merchant_name: r.get(6)?,
        pending: r.get(7)?,
        payment_channel: r.get(8)?,
        original_data: serde_json::from_str(&raw)
            .with_context(|| format!("Stored payload of transaction {}", id))?,
        id,
    })
}

/// Transactions dated `start..=end`, newest first.
pub fn transactions_between(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions
         WHERE date >= ?1 AND date <= ?2
         ORDER BY date DESC, id DESC"
    ))?;
    let mut rows = stmt.query(params![start.to_string(), end.to_string()])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

/// Every cached transaction, oldest first.
pub fn all_transactions(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY date, id"
    ))?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        out.push(transaction_from_row(r)?);
    }
    Ok(out)
}

pub fn upsert_accounts(conn: &mut Connection, items: &[Account]) -> Result<usize> {
    let tx = conn.transaction()?;
    let n = write_accounts(&tx, items)?;
    tx.commit()?;
    Ok(n)
}

pub fn write_accounts(conn: &Connection, items: &[Account]) -> Result<usize> {
    {
        let mut stmt = conn.prepare(
            "INSERT INTO accounts(id, name, type, subtype, current_balance, available_balance, last_updated)
             VALUES (?1,?2,?3,?4,?5,?6,?7)
             ON CONFLICT(id) DO UPDATE SET
                name=excluded.name,
                type=excluded.type,
                subtype=excluded.subtype,
                current_balance=excluded.current_balance,
                available_balance=excluded.available_balance,
                last_updated=excluded.last_updated",
        )?;
        for a in items {
            stmt.execute(params![
                a.id,
                a.name,
                a.r#type,
                a.subtype,
                a.current_balance.to_string(),
                a.available_balance.map(|d| d.to_string()),
                a.last_updated.to_rfc3339(),
            ])?;
        }
    }
    Ok(items.len())
}

pub fn list_accounts(conn: &Connection) -> Result<Vec<Account>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, type, subtype, current_balance, available_balance, last_updated
         FROM accounts ORDER BY name, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let current: String = r.get(4)?;
        let available: Option<String> = r.get(5)?;
        let updated: String = r.get(6)?;
        out.push(Account {
            name: r.get(1)?,
            r#type: r.get(2)?,
            subtype: r.get(3)?,
            current_balance: parse_decimal(&current)
                .with_context(|| format!("Account {}", id))?,
            available_balance: available
                .as_deref()
                .map(parse_decimal)
                .transpose()
                .with_context(|| format!("Account {}", id))?,
            last_updated: DateTime::parse_from_rfc3339(&updated)
                .with_context(|| format!("Invalid timestamp '{}' on account {}", updated, id))?
                .with_timezone(&Utc),
            id,
        });
    }
    Ok(out)
}

/// Inserts a new budget and returns the id it was stored under.
pub fn create_budget(conn: &Connection, budget: &NewBudget, now: DateTime<Utc>) -> Result<String> {
    let id = format!("budget_{}", now.timestamp_millis());
    conn.execute(
        "INSERT INTO budgets(id, name, categories, timeframe, active) VALUES (?1,?2,?3,?4,?5)",
        params![
            id,
            budget.name,
            serde_json::to_string(&budget.categories)?,
            budget.timeframe.as_str(),
            budget.active,
        ],
    )
    .with_context(|| format!("Budget '{}' could not be created", budget.name))?;
    Ok(id)
}

pub fn list_budgets(conn: &Connection) -> Result<Vec<Budget>> {
    let mut stmt =
        conn.prepare("SELECT id, name, categories, timeframe, active FROM budgets ORDER BY id")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let cats: String = r.get(2)?;
        let timeframe: String = r.get(3)?;
        let categories: Vec<BudgetCategory> = serde_json::from_str(&cats)
            .with_context(|| format!("Stored categories of budget {}", id))?;
        out.push(Budget {
            name: r.get(1)?,
            categories,
            timeframe: timeframe.parse::<Timeframe>()?,
            active: r.get(4)?,
            id,
        });
    }
    Ok(out)
}

pub fn upsert_recurring(conn: &mut Connection, items: &[RecurringTransaction]) -> Result<usize> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO recurring_transactions(id, frequency, amount, category, merchant_name,
                                                description, next_date, is_active, kind)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)
             ON CONFLICT(id) DO UPDATE SET
                frequency=excluded.frequency,
                amount=excluded.amount,
                category=excluded.category,
                merchant_name=excluded.merchant_name,
                description=excluded.description,
                next_date=excluded.next_date,
                is_active=excluded.is_active,
                kind=excluded.kind",
        )?;
        for s in items {
            stmt.execute(params![
                s.id,
                s.frequency,
                s.amount.to_string(),
                s.category,
                s.merchant_name,
                s.description,
                s.next_date.map(|d| d.to_string()),
                s.is_active,
                s.kind.as_str(),
            ])?;
        }
    }
    tx.commit()?;
    Ok(items.len())
}

pub fn list_recurring(conn: &Connection) -> Result<Vec<RecurringTransaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, frequency, amount, category, merchant_name, description, next_date,
                is_active, kind
         FROM recurring_transactions ORDER BY kind DESC, id",
    )?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let amount: String = r.get(2)?;
        let next: Option<String> = r.get(6)?;
        let kind: String = r.get(8)?;
        out.push(RecurringTransaction {
            frequency: r.get(1)?,
            amount: parse_decimal(&amount).with_context(|| format!("Stream {}", id))?,
            category: r.get(3)?,
            merchant_name: r.get(4)?,
            description: r.get(5)?,
            next_date: next.as_deref().map(parse_date).transpose()?,
            is_active: r.get(7)?,
            kind: kind.parse::<StreamKind>()?,
            id,
        });
    }
    Ok(out)
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Counts {
    pub transactions: i64,
    pub accounts: i64,
    pub budgets: i64,
    pub recurring: i64,
}

pub fn counts(conn: &Connection) -> Result<Counts> {
    let count = |table: &str| -> Result<i64> {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
    };
    Ok(Counts {
        transactions: count("transactions")?,
        accounts: count("accounts")?,
        budgets: count("budgets")?,
        recurring: count("recurring_transactions")?,
    })
}
