// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration read from environment variables.

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::logic::fetch::AssetRoot;

pub const CATALOG_VAR: &str = "EMOJIPACK_CATALOG";
pub const ASSET_ROOT_VAR: &str = "EMOJIPACK_ASSET_ROOT";
pub const TIMEOUT_VAR: &str = "EMOJIPACK_FETCH_TIMEOUT_SECS";

const DEFAULT_CATALOG: &str = "assets/emojis.json";
const DEFAULT_ASSET_ROOT: &str = "assets";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for catalog loading and image fetching.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding the emoji records.
    pub catalog_path: PathBuf,
    /// Base for image locations that are neither URLs nor absolute.
    pub asset_root: AssetRoot,
    /// Upper bound for a single image request.
    pub fetch_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG),
            asset_root: AssetRoot::parse(DEFAULT_ASSET_ROOT),
            fetch_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load through an arbitrary lookup; missing or invalid values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let catalog: String = try_load(&lookup, CATALOG_VAR, DEFAULT_CATALOG.to_string());
        let asset_root: String = try_load(&lookup, ASSET_ROOT_VAR, DEFAULT_ASSET_ROOT.to_string());
        let timeout_secs: u64 = match try_load(&lookup, TIMEOUT_VAR, DEFAULT_TIMEOUT_SECS) {
            0 => {
                log::warn!("{TIMEOUT_VAR} must be positive, using default: {DEFAULT_TIMEOUT_SECS}");
                DEFAULT_TIMEOUT_SECS
            }
            secs => secs,
        };

        Self {
            catalog_path: PathBuf::from(catalog),
            asset_root: AssetRoot::parse(&asset_root),
            fetch_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn try_load<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Some(raw) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        log::info!("{key} not set, using default: {default}");
        return default;
    };

    raw.trim().parse().unwrap_or_else(|e| {
        log::warn!("Invalid {key} value '{raw}': {e}; using default: {default}");
        default
    })
}
