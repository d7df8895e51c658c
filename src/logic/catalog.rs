// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Load the emoji catalog from a JSON file.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::emoji::EmojiRecord;

/// Read and parse the catalog at `path`.
///
/// # Errors
///
/// Returns an error when the file cannot be read or is not a JSON array of records.
pub fn load_catalog(path: &Path) -> Result<Vec<EmojiRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read emoji catalog {:?}", path))?;
    let records = parse_catalog(&content)
        .with_context(|| format!("Failed to parse emoji catalog {:?}", path))?;
    log::info!("Loaded {} emoji(s) from {:?}", records.len(), path);
    Ok(records)
}

/// Parse catalog JSON, keeping the first record for each id.
pub fn parse_catalog(json: &str) -> Result<Vec<EmojiRecord>> {
    let raw: Vec<EmojiRecord> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());
    for record in raw {
        if record.id.trim().is_empty() {
            log::warn!("Catalog record '{}' has no id; dropped", record.name);
            continue;
        }
        if !seen.insert(record.id.clone()) {
            log::warn!("Duplicate catalog id '{}'; keeping the first entry", record.id);
            continue;
        }
        records.push(record);
    }
    Ok(records)
}
