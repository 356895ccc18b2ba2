// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures talking to the aggregation backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },
    #[error("could not decode {endpoint} response: {message}")]
    Decode { endpoint: String, message: String },
    #[error("{endpoint} response is missing '{field}'")]
    MissingField {
        endpoint: String,
        field: &'static str,
    },
}

impl ApiError {
    /// Transport failures, throttling and server-side errors may succeed on a
    /// second attempt; everything else will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Transport { .. } => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            ApiError::Decode { .. } | ApiError::MissingField { .. } => false,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
