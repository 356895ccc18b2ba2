// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod ingest;
pub mod link;
pub mod models;
pub mod settings;
pub mod store;
pub mod sync;
pub mod theme;
pub mod utils;
pub mod views;
