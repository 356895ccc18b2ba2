// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use bankdash::{settings, store, sync};
use chrono::Utc;
use common::{FakeApi, conn, date, dec, page, unavailable, upstream_account, upstream_tx};

#[test]
fn cursor_round_trip_and_clear() {
    let conn = conn();
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "");
    settings::set_sync_cursor(&conn, "cursor-1").unwrap();
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "cursor-1");
    settings::clear_sync_cursor(&conn).unwrap();
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "");
}

#[test]
fn follows_pages_until_has_more_is_false() {
    let mut conn = conn();
    let api = FakeApi::default();
    let mut first = page(
        vec![
            upstream_tx("t1", "2024-03-02", "12.50", "FOOD_AND_DRINK"),
            upstream_tx("t2", "2024-03-05", "-2000", "INCOME"),
        ],
        "c1",
        true,
    );
    first.accounts = Some(vec![upstream_account("acc-checking", "Checking", "1500.25")]);
    api.push_page(Ok(first));
    api.push_page(Ok(page(
        vec![upstream_tx("t3", "2024-03-09", "40", "SHOPPING")],
        "c2",
        false,
    )));

    let report = sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).unwrap();

    assert_eq!(report.pages, 2);
    assert_eq!(report.added, 3);
    assert_eq!(report.accounts, 1);
    assert_eq!(report.cursor, "c2");
    assert_eq!(
        *api.sync_calls.borrow(),
        vec![None, Some("c1".to_string())]
    );
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "c2");

    let txs = store::all_transactions(&conn).unwrap();
    assert_eq!(txs.len(), 3);
    let income = txs.iter().find(|t| t.id == "t2").unwrap();
    assert_eq!(income.amount, dec("-2000"));
    assert_eq!(income.category, "INCOME");
    assert_eq!(income.description, "Merchant t2");

    let accounts = store::list_accounts(&conn).unwrap();
    assert_eq!(accounts[0].current_balance, dec("1500.25"));
}

#[test]
fn resumes_from_stored_cursor() {
    let mut conn = conn();
    settings::set_sync_cursor(&conn, "c7").unwrap();
    let api = FakeApi::default();
    api.push_page(Ok(page(
        vec![upstream_tx("t8", "2024-04-01", "9.99", "ENTERTAINMENT")],
        "c8",
        false,
    )));

    let report = sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).unwrap();
    assert_eq!(report.pages, 1);
    assert_eq!(*api.sync_calls.borrow(), vec![Some("c7".to_string())]);
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "c8");
}

#[test]
fn failed_second_page_keeps_first_page() {
    let mut conn = conn();
    let api = FakeApi::default();
    api.push_page(Ok(page(
        vec![upstream_tx("t1", "2024-03-02", "12.50", "FOOD_AND_DRINK")],
        "c1",
        true,
    )));
    api.push_page(Err(unavailable("transactions/sync")));

    let err = sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).unwrap_err();
    assert!(format!("{err:#}").contains("page 2"));

    assert_eq!(settings::sync_cursor(&conn).unwrap(), "c1");
    let txs = store::all_transactions(&conn).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].id, "t1");
}

#[test]
fn failed_first_call_leaves_store_untouched() {
    let mut conn = conn();
    settings::set_sync_cursor(&conn, "c3").unwrap();
    let api = FakeApi::default();
    api.offline.set(true);

    assert!(sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).is_err());
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "c3");
    assert!(store::all_transactions(&conn).unwrap().is_empty());
}

#[test]
fn stops_at_page_limit() {
    let mut conn = conn();
    let api = FakeApi::default();
    for i in 1..=3 {
        api.push_page(Ok(page(Vec::new(), &format!("c{i}"), true)));
    }

    let report = sync::sync_transactions(&mut conn, &api, "access-1", 2, Utc::now()).unwrap();
    assert_eq!(report.pages, 2);
    assert_eq!(settings::sync_cursor(&conn).unwrap(), "c2");
}

#[test]
fn stops_when_cursor_does_not_advance() {
    let mut conn = conn();
    let api = FakeApi::default();
    api.push_page(Ok(page(Vec::new(), "c1", true)));
    api.push_page(Ok(page(Vec::new(), "c1", true)));
    api.push_page(Ok(page(Vec::new(), "c1", true)));

    let report = sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).unwrap();
    assert_eq!(report.pages, 2);
}

#[test]
fn repeated_ids_replace_instead_of_duplicating() {
    let mut conn = conn();
    let api = FakeApi::default();
    let mut pending = upstream_tx("t1", "2024-03-02", "12.50", "FOOD_AND_DRINK");
    pending.pending = true;
    api.push_page(Ok(page(vec![pending], "c1", false)));
    sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).unwrap();

    api.push_page(Ok(page(
        vec![upstream_tx("t1", "2024-03-03", "13.75", "FOOD_AND_DRINK")],
        "c2",
        false,
    )));
    sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).unwrap();

    let txs = store::all_transactions(&conn).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].amount, dec("13.75"));
    assert_eq!(txs[0].date, date("2024-03-03"));
    assert!(!txs[0].pending);
}

#[test]
fn page_records_roll_back_when_cursor_cannot_be_stored() {
    let mut conn = conn();
    conn.execute_batch(
        "CREATE TRIGGER no_cursor BEFORE INSERT ON settings
         WHEN NEW.key = 'plaid_sync_cursor'
         BEGIN SELECT RAISE(ABORT, 'settings are read-only'); END;",
    )
    .unwrap();
    let api = FakeApi::default();
    let mut first = page(
        vec![upstream_tx("t1", "2024-03-02", "12.50", "FOOD_AND_DRINK")],
        "c1",
        false,
    );
    first.accounts = Some(vec![upstream_account("acc-checking", "Checking", "10")]);
    api.push_page(Ok(first));

    assert!(sync::sync_transactions(&mut conn, &api, "access-1", 50, Utc::now()).is_err());

    assert_eq!(settings::sync_cursor(&conn).unwrap(), "");
    assert!(store::all_transactions(&conn).unwrap().is_empty());
    assert!(store::list_accounts(&conn).unwrap().is_empty());
}
