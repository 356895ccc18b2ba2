// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use bankdash::api::{CashFlowSummary, RecurringStreams};
use bankdash::config::Config;
use bankdash::dashboard::{Dashboard, DashboardView};
use bankdash::models::Account;
use bankdash::{settings, store};
use chrono::Utc;
use common::{FakeApi, conn, date, dec, page, upstream_account, upstream_tx};
use serde_json::json;

fn streams() -> RecurringStreams {
    serde_json::from_value(json!({
        "inflows": [{
            "stream_id": "s-pay",
            "frequency": "BIWEEKLY",
            "average_amount": { "amount": -1800 },
            "personal_finance_category": { "primary": "INCOME" },
            "merchant_name": "Acme Payroll",
            "predicted_next_date": "2024-03-29",
            "is_active": true
        }],
        "outflows": [
            {
                "stream_id": "s-rent",
                "frequency": "MONTHLY",
                "average_amount": { "amount": 1400 },
                "personal_finance_category": { "primary": "RENT_AND_UTILITIES" },
                "merchant_name": "Landlord LLC",
                "is_active": true
            },
            {
                "stream_id": "s-gym",
                "frequency": "MONTHLY",
                "average_amount": { "amount": 30 },
                "is_active": false
            }
        ]
    }))
    .unwrap()
}

fn linked_api() -> FakeApi {
    let api = FakeApi {
        accounts: vec![upstream_account("acc-checking", "Checking", "2450.10")],
        streams: streams(),
        cash_flow: CashFlowSummary {
            total_inflow: dec("2000"),
            total_outflow: dec("52.50"),
            net_cash_flow: dec("1947.50"),
        },
        ..FakeApi::default()
    };
    api.push_page(Ok(page(
        vec![
            upstream_tx("t1", "2024-03-02", "12.50", "FOOD_AND_DRINK"),
            upstream_tx("t2", "2024-03-05", "-2000", "INCOME"),
            upstream_tx("t3", "2024-03-09", "40", "SHOPPING"),
            upstream_tx("t0", "2024-01-15", "99", "TRAVEL"),
        ],
        "c1",
        false,
    )));
    api
}

#[test]
fn unlinked_dashboard_stays_empty() {
    let mut conn = conn();
    let api = FakeApi::default();
    let cfg = Config::default();
    let mut dash = Dashboard::new(&mut conn, &api, &cfg);
    let view = dash.load(date("2024-03-15"), date("2024-03-01"), Utc::now()).clone();

    assert!(!view.linked);
    assert_eq!(view.month, "March 2024");
    assert!(api.sync_calls.borrow().is_empty());
    assert_eq!(
        view,
        DashboardView {
            month: "March 2024".into(),
            ..DashboardView::default()
        }
    );
}

#[test]
fn full_load_populates_every_section() {
    let mut conn = conn();
    settings::set_access_token(&conn, "access-1").unwrap();
    let api = linked_api();
    let cfg = Config::default();
    let mut dash = Dashboard::new(&mut conn, &api, &cfg);
    let view = dash.load(date("2024-03-15"), date("2024-03-01"), Utc::now()).clone();

    assert!(view.linked);
    assert_eq!(view.last_sync.as_ref().unwrap().added, 4);
    assert_eq!(view.accounts.len(), 1);
    assert_eq!(view.accounts[0].current_balance, dec("2450.10"));
    assert_eq!(view.cash_flow.net, dec("1947.50"));

    // January travel is outside the selected month
    let names: Vec<_> = view.spending.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["SHOPPING", "FOOD AND DRINK"]);
    assert_eq!(view.spending[0].percentage, dec("10"));
    assert_eq!(view.top.len(), 2);

    assert_eq!(view.recurring.income.len(), 1);
    assert_eq!(view.recurring.income[0].amount, dec("1800"));
    assert_eq!(view.recurring.expenses.len(), 1);
    assert_eq!(view.recurring.expenses[0].id, "s-rent");

    let recent: Vec<_> = view.recent.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(recent, ["t3", "t2", "t1"]);

    drop(dash);
    assert_eq!(store::list_recurring(&conn).unwrap().len(), 3);
}

#[test]
fn offline_refresh_keeps_previous_sections() {
    let mut conn = conn();
    settings::set_access_token(&conn, "access-1").unwrap();
    let api = linked_api();
    let cfg = Config::default();
    let mut dash = Dashboard::new(&mut conn, &api, &cfg);
    let first = dash.load(date("2024-03-15"), date("2024-03-01"), Utc::now()).clone();

    api.offline.set(true);
    let second = dash.load(date("2024-03-15"), date("2024-03-01"), Utc::now()).clone();

    assert_eq!(second.accounts, first.accounts);
    assert_eq!(second.cash_flow, first.cash_flow);
    assert_eq!(second.recurring, first.recurring);
    assert_eq!(second.spending, first.spending);
    assert_eq!(second.last_sync, first.last_sync);
}

#[test]
fn offline_first_load_shows_cached_accounts() {
    let mut conn = conn();
    settings::set_access_token(&conn, "access-1").unwrap();
    store::upsert_accounts(
        &mut conn,
        &[Account {
            id: "acc-savings".into(),
            name: "Savings".into(),
            r#type: "depository".into(),
            subtype: "savings".into(),
            current_balance: dec("9100"),
            available_balance: Some(dec("9000")),
            last_updated: Utc::now(),
        }],
    )
    .unwrap();

    let api = FakeApi::default();
    api.offline.set(true);
    let cfg = Config::default();
    let mut dash = Dashboard::new(&mut conn, &api, &cfg);
    let view = dash.load(date("2024-03-15"), date("2024-03-01"), Utc::now()).clone();

    assert!(view.linked);
    assert!(view.last_sync.is_none());
    assert_eq!(view.accounts.len(), 1);
    assert_eq!(view.accounts[0].name, "Savings");
    assert_eq!(view.cash_flow.net, dec("0"));
}
