// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The dashboard load routine.
//!
//! Every section is fetched in turn. A section that fails is logged and keeps
//! whatever it showed before, so one bad request never blanks the screen.

use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::api::AggregationApi;
use crate::config::Config;
use crate::models::{Account, Transaction};
use crate::sync::{self, SyncReport};
use crate::utils::{month_end, month_label, month_start};
use crate::views::{self, CashFlow, ChartBar, RecurringView, SpendingCategory};
use crate::{ingest, settings, store};

pub const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardView {
    pub linked: bool,
    pub month: String,
    pub accounts: Vec<Account>,
    pub cash_flow: CashFlow,
    pub spending: Vec<SpendingCategory>,
    pub recurring: RecurringView,
    pub recent: Vec<Transaction>,
    pub top: Vec<ChartBar>,
    pub last_sync: Option<SyncReport>,
}

pub struct Dashboard<'a> {
    conn: &'a mut Connection,
    api: &'a dyn AggregationApi,
    cfg: &'a Config,
    view: DashboardView,
}

fn log_failure<T>(section: &str, r: Result<T>) -> Option<T> {
    match r {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::error!(section, "failed to load: {e:#}");
            None
        }
    }
}

impl<'a> Dashboard<'a> {
    pub fn new(conn: &'a mut Connection, api: &'a dyn AggregationApi, cfg: &'a Config) -> Self {
        Self {
            conn,
            api,
            cfg,
            view: DashboardView::default(),
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Refreshes every section for the month containing `month`.
    /// `today` anchors the recent-transactions window.
    pub fn load(&mut self, today: NaiveDate, month: NaiveDate, now: DateTime<Utc>) -> &DashboardView {
        self.view.month = month_label(month);

        let token = match settings::access_token(self.conn) {
            Ok(Some(t)) => t,
            Ok(None) => {
                tracing::error!("no access token found; link a bank account first");
                self.view.linked = false;
                return &self.view;
            }
            Err(e) => {
                tracing::error!("could not read access token: {e:#}");
                return &self.view;
            }
        };
        self.view.linked = true;

        let start = month_start(month);
        let end = month_end(month);

        if let Some(report) = log_failure(
            "sync",
            sync::sync_transactions(self.conn, self.api, &token, self.cfg.max_sync_pages, now),
        ) {
            self.view.last_sync = Some(report);
        }
        if let Some(accounts) = log_failure("balances", self.load_accounts(&token, now)) {
            self.view.accounts = accounts;
        }
        if let Some(cf) = log_failure("cash flow", self.load_cash_flow(&token, start, end)) {
            self.view.cash_flow = cf;
        }
        if let Some(spending) = log_failure("spending", self.load_spending(start, end)) {
            self.view.spending = spending;
        }
        if let Some(recurring) = log_failure("recurring", self.load_recurring(&token)) {
            self.view.recurring = recurring;
        }
        if let Some(recent) = log_failure("recent", self.load_recent(today)) {
            self.view.recent = recent;
        }
        self.view.top = views::top_categories(&self.view.spending, TOP_CATEGORIES);
        &self.view
    }

    fn load_accounts(&mut self, token: &str, now: DateTime<Utc>) -> Result<Vec<Account>> {
        let fetched = match self.api.balances(token) {
            Ok(a) => a,
            Err(e) if self.view.accounts.is_empty() => {
                // nothing on screen yet: show what the cache has
                tracing::warn!("balances unavailable, using cached accounts: {e}");
                return store::list_accounts(self.conn);
            }
            Err(e) => return Err(e.into()),
        };
        let accounts: Vec<Account> = fetched.into_iter().map(|a| ingest::account(a, now)).collect();
        if let Err(e) = store::upsert_accounts(self.conn, &accounts) {
            tracing::warn!("could not cache accounts: {e:#}");
        }
        Ok(accounts)
    }

    fn load_cash_flow(&self, token: &str, start: NaiveDate, end: NaiveDate) -> Result<CashFlow> {
        let s = self.api.cash_flow(token, start, end)?;
        Ok(CashFlow {
            income: s.total_inflow,
            expenses: s.total_outflow,
            net: s.net_cash_flow,
        })
    }

    fn load_spending(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<SpendingCategory>> {
        let txs = store::transactions_between(self.conn, start, end)?;
        Ok(views::spending_categories(&views::spending_by_category(&txs)))
    }

    fn load_recurring(&mut self, token: &str) -> Result<RecurringView> {
        let streams = ingest::recurring(self.api.recurring(token)?);
        if let Err(e) = store::upsert_recurring(self.conn, &streams) {
            tracing::warn!("could not cache recurring streams: {e:#}");
        }
        Ok(views::classify_recurring(&streams))
    }

    fn load_recent(&self, today: NaiveDate) -> Result<Vec<Transaction>> {
        let start = today - Duration::days(views::RECENT_DAYS);
        let txs = store::transactions_between(self.conn, start, today)?;
        Ok(views::recent_transactions(
            &txs,
            today,
            views::RECENT_DAYS,
            views::RECENT_LIMIT,
        ))
    }
}
