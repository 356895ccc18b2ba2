// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use bankdash::api::{
    AggregationApi, CashFlowSummary, RecurringStreams, SyncPage, UpstreamAccount,
    UpstreamTransaction,
};
use bankdash::db;
use bankdash::error::{ApiError, ApiResult};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::json;

pub fn conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

pub fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn upstream_tx(id: &str, day: &str, amount: &str, category: &str) -> UpstreamTransaction {
    UpstreamTransaction::from_value(json!({
        "transaction_id": id,
        "account_id": "acc-checking",
        "amount": amount.parse::<f64>().unwrap(),
        "date": day,
        "name": format!("Merchant {id}"),
        "merchant_name": null,
        "personal_finance_category": { "primary": category },
        "pending": false,
        "payment_channel": "online"
    }))
    .unwrap()
}

pub fn upstream_account(id: &str, name: &str, current: &str) -> UpstreamAccount {
    serde_json::from_value(json!({
        "account_id": id,
        "name": name,
        "type": "depository",
        "subtype": "checking",
        "balances": { "current": current.parse::<f64>().unwrap(), "available": null }
    }))
    .unwrap()
}

pub fn page(added: Vec<UpstreamTransaction>, cursor: &str, has_more: bool) -> SyncPage {
    SyncPage {
        added,
        next_cursor: Some(cursor.to_string()),
        has_more,
        accounts: None,
    }
}

pub fn unavailable(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: 503,
        body: "upstream unavailable".into(),
    }
}

/// Scripted stand-in for the aggregation backend.
#[derive(Default)]
pub struct FakeApi {
    pub pages: RefCell<VecDeque<ApiResult<SyncPage>>>,
    pub sync_calls: RefCell<Vec<Option<String>>>,
    pub accounts: Vec<UpstreamAccount>,
    pub streams: RecurringStreams,
    pub cash_flow: CashFlowSummary,
    pub access_token: String,
    pub link_failures: Cell<u32>,
    pub link_calls: Cell<u32>,
    /// Every call fails with a 503 while set.
    pub offline: Cell<bool>,
}

impl FakeApi {
    pub fn push_page(&self, p: ApiResult<SyncPage>) {
        self.pages.borrow_mut().push_back(p);
    }

    fn check(&self, endpoint: &str) -> ApiResult<()> {
        if self.offline.get() {
            Err(unavailable(endpoint))
        } else {
            Ok(())
        }
    }
}

impl AggregationApi for FakeApi {
    fn link_token(&self, user_id: &str) -> ApiResult<String> {
        self.link_calls.set(self.link_calls.get() + 1);
        self.check("link-token")?;
        if self.link_failures.get() > 0 {
            self.link_failures.set(self.link_failures.get() - 1);
            return Err(unavailable("link-token"));
        }
        Ok(format!("link-sandbox-{user_id}"))
    }

    fn exchange_public_token(&self, _public_token: &str) -> ApiResult<String> {
        self.check("exchange-token")?;
        Ok(self.access_token.clone())
    }

    fn sync_transactions(&self, _access_token: &str, cursor: Option<&str>) -> ApiResult<SyncPage> {
        self.sync_calls.borrow_mut().push(cursor.map(str::to_string));
        self.check("transactions/sync")?;
        self.pages.borrow_mut().pop_front().unwrap_or_else(|| {
            Ok(SyncPage {
                next_cursor: cursor.map(str::to_string),
                ..SyncPage::default()
            })
        })
    }

    fn balances(&self, _access_token: &str) -> ApiResult<Vec<UpstreamAccount>> {
        self.check("balances")?;
        Ok(self.accounts.clone())
    }

    fn recurring(&self, _access_token: &str) -> ApiResult<RecurringStreams> {
        self.check("recurring")?;
        Ok(self.streams.clone())
    }

    fn cash_flow(
        &self,
        _access_token: &str,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> ApiResult<CashFlowSummary> {
        self.check("cash-flow")?;
        Ok(self.cash_flow)
    }
}
