// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Bank-link flow: obtain a link token for the provider's hosted widget,
//! then trade the public token it hands back for a stored access credential.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::time::Duration;

use crate::api::AggregationApi;
use crate::config::Config;
use crate::error::ApiResult;
use crate::settings;
use crate::sync::{self, SyncReport};

/// Calls `op` up to `attempts` times, sleeping `backoff * n` between tries.
/// Only retryable failures are retried.
pub fn with_retry<T, F>(attempts: u32, backoff: Duration, mut op: F) -> ApiResult<T>
where
    F: FnMut() -> ApiResult<T>,
{
    let attempts = attempts.max(1);
    let mut n = 1;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if e.is_retryable() && n < attempts => {
                tracing::warn!(attempt = n, error = %e, "retrying");
                std::thread::sleep(backoff * n);
                n += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

pub fn request_link_token(
    api: &dyn AggregationApi,
    cfg: &Config,
    backoff: Duration,
) -> Result<String> {
    let Some(user_id) = cfg.user_id.as_deref().filter(|u| !u.is_empty()) else {
        tracing::error!("no user id configured for link-token issuance");
        bail!("A user id is required to connect a bank (set BANKDASH_USER_ID or user_id in config)");
    };
    let token = with_retry(cfg.link_retries + 1, backoff, || api.link_token(user_id))
        .context("Failed to initialize bank connection. Is the backend server running?")?;
    tracing::info!("link token received");
    Ok(token)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub initial_sync: Option<SyncReport>,
    /// Set when the credential was stored but the first sync did not finish.
    pub sync_error: Option<String>,
}

/// Exchanges the public token, stores the credential and runs a first sync
/// from an empty cursor. A failed first sync is logged and reported but does
/// not undo the link.
pub fn complete_link(
    conn: &mut Connection,
    api: &dyn AggregationApi,
    cfg: &Config,
    public_token: &str,
    now: DateTime<Utc>,
) -> Result<LinkOutcome> {
    let public_token = public_token.trim();
    if public_token.is_empty() {
        bail!("Public token must not be empty");
    }
    let access_token = api
        .exchange_public_token(public_token)
        .context("Failed to complete bank connection. Please try again.")?;
    settings::set_access_token(conn, &access_token)?;
    settings::clear_sync_cursor(conn)?;
    tracing::info!("bank connection stored");

    match sync::sync_transactions(conn, api, &access_token, cfg.max_sync_pages, now) {
        Ok(report) => Ok(LinkOutcome {
            initial_sync: Some(report),
            sync_error: None,
        }),
        Err(e) => {
            tracing::error!("initial sync after linking failed: {e:#}");
            Ok(LinkOutcome {
                initial_sync: None,
                sync_error: Some(format!("{e:#}")),
            })
        }
    }
}
