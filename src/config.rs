// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::project_dirs;

/// Runtime settings. Resolved from defaults, then `config.json` in the
/// platform config dir, then `BANKDASH_*` environment variables, then
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub user_id: Option<String>,
    pub plaid_env: String,
    pub db_path: Option<PathBuf>,
    pub timeout_secs: u64,
    pub max_sync_pages: usize,
    pub link_retries: u32,
    pub prefers_dark: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            user_id: None,
            plaid_env: "sandbox".to_string(),
            db_path: None,
            timeout_secs: 15,
            max_sync_pages: 50,
            link_retries: 2,
            prefers_dark: false,
        }
    }
}

impl Config {
    pub fn config_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.json"))
    }

    /// Loads the file (if any) and applies the process environment. A file
    /// named explicitly must exist; the platform default is optional.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut cfg = match file {
            Some(p) => {
                if !p.is_file() {
                    bail!("Config file {} does not exist", p.display());
                }
                Self::from_file(p)?
            }
            None => match Self::config_path() {
                Ok(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        cfg.apply_env(|k| std::env::var(k).ok());
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        if let Some(v) = get("BANKDASH_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = get("BANKDASH_USER_ID") {
            self.user_id = Some(v);
        }
        if let Some(v) = get("BANKDASH_PLAID_ENV") {
            self.plaid_env = v;
        }
        if let Some(v) = get("BANKDASH_DB") {
            self.db_path = Some(PathBuf::from(v));
        }
    }

    pub fn apply_cli(&mut self, m: &clap::ArgMatches) {
        if let Some(base) = m.get_one::<String>("api-base") {
            self.api_base_url = base.trim().to_string();
        }
        if let Some(db) = m.get_one::<String>("db") {
            self.db_path = Some(PathBuf::from(db.trim()));
        }
    }
}
