// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns upstream records into the shapes kept in the local store.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::api::{
    PersonalFinanceCategory, RecurringStreams, UpstreamAccount, UpstreamStream,
    UpstreamTransaction,
};
use crate::models::{Account, RecurringTransaction, StreamKind, Transaction};

pub const UNCATEGORIZED: &str = "Uncategorized";

fn primary_category(pfc: Option<&PersonalFinanceCategory>) -> String {
    pfc.and_then(|c| c.primary.as_deref())
        .filter(|p| !p.is_empty())
        .unwrap_or(UNCATEGORIZED)
        .to_string()
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.is_empty())
}

pub fn transaction(u: UpstreamTransaction) -> Transaction {
    let description = non_empty(u.name.clone())
        .or_else(|| non_empty(u.merchant_name.clone()))
        .unwrap_or_default();
    Transaction {
        category: primary_category(u.personal_finance_category.as_ref()),
        description,
        id: u.transaction_id,
        account_id: u.account_id,
        amount: u.amount,
        date: u.date,
        merchant_name: u.merchant_name,
        pending: u.pending,
        payment_channel: u.payment_channel.unwrap_or_default(),
        original_data: u.raw,
    }
}

pub fn account(u: UpstreamAccount, now: DateTime<Utc>) -> Account {
    Account {
        id: u.account_id,
        name: u.name,
        r#type: u.r#type.unwrap_or_default(),
        subtype: u.subtype.unwrap_or_default(),
        current_balance: u.balances.current.unwrap_or_default(),
        available_balance: u.balances.available,
        last_updated: now,
    }
}

fn stream(u: UpstreamStream, kind: StreamKind) -> RecurringTransaction {
    let avg = u.average_amount.amount.unwrap_or(Decimal::ZERO);
    RecurringTransaction {
        category: primary_category(u.personal_finance_category.as_ref()),
        amount: match kind {
            StreamKind::Income => avg.abs(),
            StreamKind::Expense => avg,
        },
        id: u.stream_id,
        frequency: u.frequency.unwrap_or_default(),
        merchant_name: non_empty(u.merchant_name),
        description: non_empty(u.description),
        next_date: u.predicted_next_date,
        is_active: u.is_active,
        kind,
    }
}

/// Inflows become income streams, outflows expense streams.
pub fn recurring(streams: RecurringStreams) -> Vec<RecurringTransaction> {
    let mut out = Vec::with_capacity(streams.inflows.len() + streams.outflows.len());
    out.extend(streams.inflows.into_iter().map(|s| stream(s, StreamKind::Income)));
    out.extend(streams.outflows.into_iter().map(|s| stream(s, StreamKind::Expense)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::StreamAmount;
    use serde_json::json;

    #[test]
    fn description_and_category_fallbacks() {
        let u = UpstreamTransaction::from_value(json!({
            "transaction_id": "t1",
            "account_id": "a1",
            "amount": 4.2,
            "date": "2026-09-30",
            "name": "",
            "merchant_name": "Corner Cafe",
            "pending": true
        }))
        .unwrap();
        let t = transaction(u);
        assert_eq!(t.description, "Corner Cafe");
        assert_eq!(t.category, UNCATEGORIZED);
        assert_eq!(t.payment_channel, "");
        assert!(t.pending);
        assert_eq!(t.original_data["merchant_name"], "Corner Cafe");
    }

    #[test]
    fn inflow_amounts_are_made_positive() {
        let s = |id: &str, amt: &str| UpstreamStream {
            stream_id: id.into(),
            frequency: Some("MONTHLY".into()),
            average_amount: StreamAmount {
                amount: Some(amt.parse().unwrap()),
            },
            personal_finance_category: None,
            merchant_name: None,
            description: None,
            predicted_next_date: None,
            is_active: true,
        };
        let out = recurring(RecurringStreams {
            inflows: vec![s("pay", "-2500")],
            outflows: vec![s("rent", "1400")],
        });
        assert_eq!(out[0].kind, StreamKind::Income);
        assert_eq!(out[0].amount, "2500".parse::<Decimal>().unwrap());
        assert_eq!(out[1].kind, StreamKind::Expense);
        assert_eq!(out[1].amount, "1400".parse::<Decimal>().unwrap());
    }

    #[test]
    fn stream_name_falls_back_to_description_then_category() {
        let streams: RecurringStreams = serde_json::from_value(json!({
            "outflows": [
                {
                    "stream_id": "netflix",
                    "average_amount": { "amount": 15.49 },
                    "personal_finance_category": { "primary": "ENTERTAINMENT" },
                    "merchant_name": null,
                    "description": "NETFLIX.COM",
                    "is_active": true
                },
                {
                    "stream_id": "fee",
                    "personal_finance_category": { "primary": "BANK_FEES" },
                    "merchant_name": "",
                    "description": "",
                    "is_active": true
                },
                {
                    "stream_id": "gym",
                    "merchant_name": "Iron Works Gym",
                    "description": "IRONWORKS 0042",
                    "is_active": true
                }
            ]
        }))
        .unwrap();
        let out = recurring(streams);
        assert_eq!(out[0].display_name(), "NETFLIX.COM");
        assert_eq!(out[1].display_name(), "BANK_FEES");
        assert_eq!(out[1].description, None);
        assert_eq!(out[2].display_name(), "Iron Works Gym");
    }
}
