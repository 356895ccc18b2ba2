// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client for the aggregation backend.
//!
//! The backend is a thin wrapper over the bank-aggregation provider: the
//! envelopes (`syncResult`, `balances`, ...) are camelCase, the records inside
//! them are the provider's own snake_case shapes.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use reqwest::Url;
use reqwest::blocking::{Client, RequestBuilder};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::utils::http_client;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PersonalFinanceCategory {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub detailed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamTransaction {
    pub transaction_id: String,
    pub account_id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub payment_channel: Option<String>,
    #[serde(skip)]
    pub raw: Value,
}

impl UpstreamTransaction {
    /// Parses one record and keeps the untouched JSON alongside it.
    pub fn from_value(v: Value) -> serde_json::Result<Self> {
        let mut t: UpstreamTransaction = serde_json::from_value(v.clone())?;
        t.raw = v;
        Ok(t)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpstreamBalances {
    #[serde(default)]
    pub current: Option<Decimal>,
    #[serde(default)]
    pub available: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamAccount {
    pub account_id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub r#type: Option<String>,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub balances: UpstreamBalances,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamAmount {
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpstreamStream {
    pub stream_id: String,
    #[serde(default)]
    pub frequency: Option<String>,
    #[serde(default)]
    pub average_amount: StreamAmount,
    #[serde(default)]
    pub personal_finance_category: Option<PersonalFinanceCategory>,
    #[serde(default)]
    pub merchant_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub predicted_next_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecurringStreams {
    #[serde(default)]
    pub inflows: Vec<UpstreamStream>,
    #[serde(default)]
    pub outflows: Vec<UpstreamStream>,
}

/// One page of the transaction change stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncPage {
    pub added: Vec<UpstreamTransaction>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
    pub accounts: Option<Vec<UpstreamAccount>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CashFlowSummary {
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    pub net_cash_flow: Decimal,
}

/// The aggregation backend as the rest of the crate sees it.
pub trait AggregationApi {
    fn link_token(&self, user_id: &str) -> ApiResult<String>;
    fn exchange_public_token(&self, public_token: &str) -> ApiResult<String>;
    fn sync_transactions(&self, access_token: &str, cursor: Option<&str>) -> ApiResult<SyncPage>;
    fn balances(&self, access_token: &str) -> ApiResult<Vec<UpstreamAccount>>;
    fn recurring(&self, access_token: &str) -> ApiResult<RecurringStreams>;
    fn cash_flow(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<CashFlowSummary>;
}

pub struct HttpAggregator {
    client: Client,
    base: Url,
}

impl HttpAggregator {
    pub fn new(cfg: &Config) -> Result<Self> {
        let base = Url::parse(&cfg.api_base_url)
            .with_context(|| format!("Invalid API base URL '{}'", cfg.api_base_url))?;
        if base.cannot_be_a_base() {
            bail!("API base URL '{}' cannot carry a path", cfg.api_base_url);
        }
        Ok(Self {
            client: http_client(cfg.timeout_secs)?,
            base,
        })
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("plaid").extend(segments);
        }
        url
    }

    fn fetch(&self, endpoint: &str, req: RequestBuilder) -> ApiResult<String> {
        tracing::debug!(endpoint, "calling aggregation backend");
        let resp = req.send().map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let status = resp.status();
        let body = resp.text().map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl AggregationApi for HttpAggregator {
    fn link_token(&self, user_id: &str) -> ApiResult<String> {
        let body = self.fetch(
            "link-token",
            self.client.get(self.url(&["link-token", user_id])),
        )?;
        decode_link_token(&body)
    }

    fn exchange_public_token(&self, public_token: &str) -> ApiResult<String> {
        let req = self
            .client
            .post(self.url(&["exchange-token"]))
            .json(&serde_json::json!({ "publicToken": public_token }));
        let body = self.fetch("exchange-token", req)?;
        decode_access_token(&body)
    }

    fn sync_transactions(&self, access_token: &str, cursor: Option<&str>) -> ApiResult<SyncPage> {
        let mut payload = serde_json::json!({ "accessToken": access_token });
        if let Some(c) = cursor.filter(|c| !c.is_empty()) {
            payload["cursor"] = Value::String(c.to_string());
        }
        let req = self
            .client
            .post(self.url(&["transactions", "sync"]))
            .json(&payload);
        let body = self.fetch("transactions/sync", req)?;
        decode_sync(&body)
    }

    fn balances(&self, access_token: &str) -> ApiResult<Vec<UpstreamAccount>> {
        let body = self.fetch(
            "balances",
            self.client.get(self.url(&["balances", access_token])),
        )?;
        decode_balances(&body)
    }

    fn recurring(&self, access_token: &str) -> ApiResult<RecurringStreams> {
        let body = self.fetch(
            "recurring",
            self.client.get(self.url(&["recurring", access_token])),
        )?;
        decode_recurring(&body)
    }

    fn cash_flow(
        &self,
        access_token: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<CashFlowSummary> {
        let req = self
            .client
            .get(self.url(&["cash-flow", access_token]))
            .query(&[("startDate", start.to_string()), ("endDate", end.to_string())]);
        let body = self.fetch("cash-flow", req)?;
        decode_cash_flow(&body)
    }
}

fn parse<T: DeserializeOwned>(endpoint: &str, body: &str) -> ApiResult<T> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}

fn missing(endpoint: &str, field: &'static str) -> ApiError {
    ApiError::MissingField {
        endpoint: endpoint.to_string(),
        field,
    }
}

pub fn decode_link_token(body: &str) -> ApiResult<String> {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(rename = "linkToken", default)]
        link_token: Option<String>,
    }
    let env: Envelope = parse("link-token", body)?;
    env.link_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing("link-token", "linkToken"))
}

pub fn decode_access_token(body: &str) -> ApiResult<String> {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(rename = "accessToken", default)]
        access_token: Option<String>,
    }
    let env: Envelope = parse("exchange-token", body)?;
    env.access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| missing("exchange-token", "accessToken"))
}

pub fn decode_sync(body: &str) -> ApiResult<SyncPage> {
    #[derive(Deserialize)]
    struct RawResult {
        #[serde(default)]
        added: Vec<Value>,
        #[serde(rename = "nextCursor", alias = "next_cursor", default)]
        next_cursor: Option<String>,
        #[serde(rename = "hasMore", alias = "has_more", default)]
        has_more: bool,
        #[serde(default)]
        accounts: Option<Vec<UpstreamAccount>>,
    }
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(rename = "syncResult", default)]
        sync_result: Option<RawResult>,
    }
    let env: Envelope = parse("transactions/sync", body)?;
    let raw = env
        .sync_result
        .ok_or_else(|| missing("transactions/sync", "syncResult"))?;
    let added = raw
        .added
        .into_iter()
        .map(UpstreamTransaction::from_value)
        .collect::<serde_json::Result<Vec<_>>>()
        .map_err(|e| ApiError::Decode {
            endpoint: "transactions/sync".into(),
            message: e.to_string(),
        })?;
    Ok(SyncPage {
        added,
        next_cursor: raw.next_cursor,
        has_more: raw.has_more,
        accounts: raw.accounts,
    })
}

pub fn decode_balances(body: &str) -> ApiResult<Vec<UpstreamAccount>> {
    #[derive(Deserialize)]
    struct Inner {
        #[serde(default)]
        accounts: Vec<UpstreamAccount>,
    }
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(default)]
        balances: Option<Inner>,
    }
    let env: Envelope = parse("balances", body)?;
    Ok(env
        .balances
        .ok_or_else(|| missing("balances", "balances"))?
        .accounts)
}

pub fn decode_recurring(body: &str) -> ApiResult<RecurringStreams> {
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(rename = "recurringData", default)]
        recurring_data: Option<RecurringStreams>,
    }
    let env: Envelope = parse("recurring", body)?;
    env.recurring_data
        .ok_or_else(|| missing("recurring", "recurringData"))
}

pub fn decode_cash_flow(body: &str) -> ApiResult<CashFlowSummary> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Inner {
        #[serde(default)]
        total_inflow: Option<Decimal>,
        #[serde(default)]
        total_outflow: Option<Decimal>,
        #[serde(default)]
        net_cash_flow: Option<Decimal>,
    }
    #[derive(Deserialize)]
    struct Envelope {
        #[serde(rename = "cashFlow", default)]
        cash_flow: Option<Inner>,
    }
    let env: Envelope = parse("cash-flow", body)?;
    let inner = env
        .cash_flow
        .ok_or_else(|| missing("cash-flow", "cashFlow"))?;
    Ok(CashFlowSummary {
        total_inflow: inner.total_inflow.unwrap_or_default(),
        total_outflow: inner.total_outflow.unwrap_or_default(),
        net_cash_flow: inner.net_cash_flow.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn sync_keeps_raw_payload_and_cursor() {
        let body = r#"{
            "syncResult": {
                "added": [{
                    "transaction_id": "tx-1",
                    "account_id": "acc-1",
                    "amount": 12.5,
                    "date": "2026-10-03",
                    "name": "Blue Bottle",
                    "merchant_name": null,
                    "personal_finance_category": {"primary": "FOOD_AND_DRINK"},
                    "pending": false,
                    "payment_channel": "in store",
                    "iso_currency_code": "USD"
                }],
                "nextCursor": "c-2",
                "hasMore": true
            }
        }"#;
        let page = decode_sync(body).unwrap();
        assert_eq!(page.next_cursor.as_deref(), Some("c-2"));
        assert!(page.has_more);
        assert!(page.accounts.is_none());
        let t = &page.added[0];
        assert_eq!(t.amount, dec("12.5"));
        assert_eq!(t.raw["iso_currency_code"], "USD");
        assert_eq!(
            t.personal_finance_category
                .as_ref()
                .and_then(|c| c.primary.as_deref()),
            Some("FOOD_AND_DRINK")
        );
    }

    #[test]
    fn sync_without_envelope_is_missing_field() {
        let err = decode_sync(r#"{"added": []}"#).unwrap_err();
        assert!(matches!(err, ApiError::MissingField { field: "syncResult", .. }));
    }

    #[test]
    fn empty_link_token_is_rejected() {
        assert!(decode_link_token(r#"{"linkToken": ""}"#).is_err());
        assert_eq!(
            decode_link_token(r#"{"linkToken": "link-sandbox-1"}"#).unwrap(),
            "link-sandbox-1"
        );
    }

    #[test]
    fn cash_flow_defaults_missing_totals_to_zero() {
        let cf = decode_cash_flow(r#"{"cashFlow": {"totalInflow": 2500, "netCashFlow": null}}"#)
            .unwrap();
        assert_eq!(cf.total_inflow, dec("2500"));
        assert_eq!(cf.total_outflow, Decimal::ZERO);
        assert_eq!(cf.net_cash_flow, Decimal::ZERO);
    }

    #[test]
    fn balances_decode_optional_available() {
        let body = r#"{"balances": {"accounts": [
            {"account_id": "a1", "name": "Checking", "type": "depository", "subtype": "checking",
             "balances": {"current": 110.25, "available": null}}
        ]}}"#;
        let accts = decode_balances(body).unwrap();
        assert_eq!(accts.len(), 1);
        assert_eq!(accts[0].balances.current, Some(dec("110.25")));
        assert_eq!(accts[0].balances.available, None);
    }

    #[test]
    fn url_segments_are_appended_under_plaid() {
        let cfg = Config {
            api_base_url: "https://api.example.com/v1/".into(),
            ..Config::default()
        };
        let api = HttpAggregator::new(&cfg).unwrap();
        assert_eq!(
            api.url(&["balances", "access-sandbox-1"]).as_str(),
            "https://api.example.com/v1/plaid/balances/access-sandbox-1"
        );
    }
}
