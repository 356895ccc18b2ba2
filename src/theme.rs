// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};
use comfy_table::Color;
use rusqlite::Connection;

use crate::settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Colour for money coming in.
    pub fn inflow(&self) -> Color {
        match self {
            Theme::Light => Color::DarkGreen,
            Theme::Dark => Color::Green,
        }
    }

    /// Colour for money going out.
    pub fn outflow(&self) -> Color {
        match self {
            Theme::Light => Color::DarkRed,
            Theme::Dark => Color::Red,
        }
    }

    pub fn muted(&self) -> Color {
        match self {
            Theme::Light => Color::DarkGrey,
            Theme::Dark => Color::Grey,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(anyhow!("Unknown theme '{}', expected light|dark", other)),
        }
    }
}

/// No saved value follows the system preference; a saved value that is not
/// a known theme falls back to dark.
pub fn initial(saved: Option<&str>, prefers_dark: bool) -> Theme {
    match saved {
        None => {
            if prefers_dark {
                Theme::Dark
            } else {
                Theme::Light
            }
        }
        Some(s) => s.parse().unwrap_or(Theme::Dark),
    }
}

pub fn current(conn: &Connection, prefers_dark: bool) -> Result<Theme> {
    let saved = settings::get(conn, settings::THEME_KEY)?;
    Ok(initial(saved.as_deref(), prefers_dark))
}

pub fn save(conn: &Connection, theme: Theme) -> Result<()> {
    settings::set(conn, settings::THEME_KEY, theme.as_str())
}

pub fn toggle(conn: &Connection, prefers_dark: bool) -> Result<Theme> {
    let next = current(conn, prefers_dark)?.toggled();
    save(conn, next)?;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_theme_resolution() {
        assert_eq!(initial(None, false), Theme::Light);
        assert_eq!(initial(None, true), Theme::Dark);
        assert_eq!(initial(Some("light"), true), Theme::Light);
        assert_eq!(initial(Some("sepia"), false), Theme::Dark);
    }

    #[test]
    fn toggle_is_persisted() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();

        assert_eq!(current(&conn, false).unwrap(), Theme::Light);
        assert_eq!(toggle(&conn, false).unwrap(), Theme::Dark);
        assert_eq!(
            settings::get(&conn, settings::THEME_KEY).unwrap().as_deref(),
            Some("dark")
        );
        // stored choice beats the system preference
        assert_eq!(current(&conn, false).unwrap(), Theme::Dark);
        assert_eq!(toggle(&conn, true).unwrap(), Theme::Light);
        assert_eq!(current(&conn, true).unwrap(), Theme::Light);
    }

    #[test]
    fn toggle_flips_both_ways() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }
}
