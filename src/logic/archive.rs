// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Business logic for bundling emoji images into zip archives.
//!
//! Responsibilities:
//! - Turn the catalog (or the selected part of it) into an id-unique request.
//! - Fetch every image, collecting per-record failures instead of aborting.
//! - Derive collision-free entry names from image locations.
//! - Serialize the entries under the scope's folder and write the zip to disk.

use std::collections::HashSet;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::NamedTempFile;
use thiserror::Error;
use url::Url;
use zip::{CompressionMethod, write::FileOptions};

use crate::logic::fetch::ImageSource;
use crate::models::emoji::EmojiRecord;
use crate::models::selection::SelectionSet;
use crate::utils::sanitize_component;
use crate::utils::sanitize_component::{join_extension, split_extension};

/// Which records a download covers. Fixes the folder and file names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArchiveScope {
    All,
    Selected,
}

impl ArchiveScope {
    /// Top-level folder inside the archive.
    pub fn folder_name(self) -> &'static str {
        match self {
            ArchiveScope::All => "tiktok-emojis",
            ArchiveScope::Selected => "tiktok-emojis-selected",
        }
    }

    /// Suggested file name for the saved archive.
    pub fn file_name(self) -> &'static str {
        match self {
            ArchiveScope::All => "tiktok-emojis.zip",
            ArchiveScope::Selected => "selected-tiktok-emojis.zip",
        }
    }
}

/// Ordered, id-unique records to package for one download action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveRequest {
    scope: ArchiveScope,
    records: Vec<EmojiRecord>,
}

impl ArchiveRequest {
    /// Build a request; later records repeating an earlier id are dropped.
    pub fn new(scope: ArchiveScope, records: impl IntoIterator<Item = EmojiRecord>) -> Self {
        let mut seen = HashSet::new();
        let records = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();
        Self { scope, records }
    }

    /// Every given record, typically the records the gallery currently shows.
    pub fn all<'a>(records: impl IntoIterator<Item = &'a EmojiRecord>) -> Self {
        Self::new(ArchiveScope::All, records.into_iter().cloned())
    }

    /// Given records whose id is selected, in their original order.
    pub fn selected<'a>(
        records: impl IntoIterator<Item = &'a EmojiRecord>,
        selection: &SelectionSet,
    ) -> Self {
        Self::new(
            ArchiveScope::Selected,
            records
                .into_iter()
                .filter(|r| selection.is_selected(&r.id))
                .cloned(),
        )
    }

    pub fn scope(&self) -> ArchiveScope {
        self.scope
    }

    pub fn records(&self) -> &[EmojiRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cooperative cancellation flag shared between the UI and a running build.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A record whose image could not be fetched. The build continues without it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchFailure {
    pub id: String,
    pub location: String,
    pub reason: String,
}

/// Serialized archive plus what went into it.
#[derive(Debug)]
pub struct ArchiveOutcome {
    /// Complete zip file contents.
    pub bytes: Vec<u8>,
    /// Entry paths in insertion order (`<folder>/<name>`), folder entry excluded.
    pub entries: Vec<String>,
    pub failures: Vec<FetchFailure>,
    /// Records without an image location.
    pub skipped: usize,
}

/// Result of a saved download, for status reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    pub entries: Vec<String>,
    pub failures: Vec<FetchFailure>,
    pub skipped: usize,
    pub size: u64,
}

/// Fatal reasons a download produced no archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("download cancelled")]
    Cancelled,
    #[error("none of the {attempted} images could be downloaded (first error: {first_reason})")]
    NothingFetched {
        attempted: usize,
        first_reason: String,
    },
    #[error("duplicate entry name in archive: {0}")]
    DuplicateEntry(String),
    #[error("failed to serialize archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to write archive {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One fetched image waiting to be serialized.
struct PendingEntry {
    name: String,
    bytes: Vec<u8>,
}

/// Fetch every image in `request` and pack the results into an in-memory zip.
///
/// Records without a location are skipped silently. Individual fetch
/// failures are collected in [`ArchiveOutcome::failures`]; the build only
/// fails when every attempted fetch failed, when `cancel` fires, or when the
/// zip itself cannot be written.
pub fn build_archive(
    request: &ArchiveRequest,
    source: &dyn ImageSource,
    cancel: &CancelToken,
) -> Result<ArchiveOutcome, ArchiveError> {
    let folder = request.scope.folder_name();
    log::info!(
        "Building {folder} archive from {} record(s)",
        request.records.len()
    );

    let mut pending = Vec::with_capacity(request.records.len());
    let mut used_names = HashSet::new();
    let mut failures = Vec::new();
    let mut skipped = 0;
    let mut attempted = 0;

    for record in &request.records {
        if cancel.is_cancelled() {
            return Err(ArchiveError::Cancelled);
        }
        if !record.has_image() {
            log::debug!("Record {} has no image location; skipping", record.id);
            skipped += 1;
            continue;
        }

        attempted += 1;
        match source.fetch(&record.image_location) {
            Ok(image) => {
                let candidate = derive_file_name(&record.image_location)
                    .unwrap_or_else(|| fallback_name(&record.id, image.content_type.as_deref()));
                let name = unique_entry_name(candidate, &record.id, &mut used_names);
                pending.push(PendingEntry {
                    name,
                    bytes: image.bytes,
                });
            }
            Err(err) => {
                log::warn!("Skipping {} ({}): {err}", record.id, record.image_location);
                failures.push(FetchFailure {
                    id: record.id.clone(),
                    location: record.image_location.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    if attempted > 0 && pending.is_empty() {
        let first_reason = failures
            .first()
            .map(|f| f.reason.clone())
            .unwrap_or_default();
        return Err(ArchiveError::NothingFetched {
            attempted,
            first_reason,
        });
    }
    if cancel.is_cancelled() {
        return Err(ArchiveError::Cancelled);
    }

    let entries: Vec<String> = pending
        .iter()
        .map(|e| format!("{folder}/{}", e.name))
        .collect();
    assert_unique_entry_names(&entries)?;

    let bytes = serialize(folder, &pending)?;
    log::info!(
        "Packed {} image(s) into {folder} ({} failed, {skipped} without image)",
        entries.len(),
        failures.len()
    );

    Ok(ArchiveOutcome {
        bytes,
        entries,
        failures,
        skipped,
    })
}

/// Build the archive for `request` and write it to `output`.
///
/// Nothing is written when the build fails or is cancelled.
pub fn save_archive(
    output: &Path,
    request: &ArchiveRequest,
    source: &dyn ImageSource,
    cancel: &CancelToken,
) -> Result<ArchiveReport, ArchiveError> {
    let outcome = build_archive(request, source, cancel)?;
    if cancel.is_cancelled() {
        return Err(ArchiveError::Cancelled);
    }
    write_archive(output, &outcome.bytes)?;

    Ok(ArchiveReport {
        path: output.to_path_buf(),
        size: outcome.bytes.len() as u64,
        entries: outcome.entries,
        failures: outcome.failures,
        skipped: outcome.skipped,
    })
}

/// Persist archive bytes, creating missing parent directories.
///
/// Bytes go to a temporary file next to `output` that is renamed into place
/// once complete, so a failed write never leaves a truncated archive behind.
pub fn write_archive(output: &Path, bytes: &[u8]) -> Result<(), ArchiveError> {
    let io_err = |source| ArchiveError::Io {
        path: output.to_path_buf(),
        source,
    };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
    staged.write_all(bytes).map_err(io_err)?;
    staged.as_file().sync_all().map_err(io_err)?;
    staged.persist(output).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Force a specific extension onto a path when it is missing or different.
///
/// Keeps existing matching extension (case-insensitive); otherwise replaces it.
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

/// Last path segment of an image location, sanitized for use as an entry name.
///
/// Query strings and fragments are ignored. Returns `None` when the final
/// segment is empty or holds nothing alphanumeric.
pub fn derive_file_name(location: &str) -> Option<String> {
    let location = location.trim();
    let segment = match Url::parse(location) {
        Ok(url) if url.scheme().len() > 1 => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .map(str::to_string)?,
        _ => {
            let path = location
                .split(['?', '#'])
                .next()
                .unwrap_or_default();
            path.rsplit(['/', '\\']).next().unwrap_or_default().to_string()
        }
    };

    if !segment.chars().any(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(sanitize_component(&segment))
}

/// Name for a record whose location has no usable file name.
///
/// Embeds the record id so two such records never share a name.
fn fallback_name(id: &str, content_type: Option<&str>) -> String {
    const PREFERRED: [&str; 6] = ["png", "jpg", "gif", "webp", "svg", "bmp"];

    let ext = content_type
        .and_then(mime_guess::get_mime_extensions_str)
        .and_then(|exts| {
            PREFERRED
                .iter()
                .find(|p| exts.contains(*p))
                .or_else(|| exts.first())
                .copied()
        })
        .unwrap_or("png");
    format!("emoji-{}.{ext}", sanitize_component(id))
}

/// Reserve `candidate`, or a variant tagged with the record id when taken.
///
/// Comparison ignores ASCII case so the archive also extracts cleanly on
/// case-insensitive filesystems.
fn unique_entry_name(candidate: String, id: &str, used: &mut HashSet<String>) -> String {
    if used.insert(candidate.to_ascii_lowercase()) {
        return candidate;
    }

    let (base, ext) = split_extension(&candidate);
    let tag = sanitize_component(id);
    let mut name = join_extension(&format!("{base}-{tag}"), ext);
    let mut counter = 2;
    while !used.insert(name.to_ascii_lowercase()) {
        name = join_extension(&format!("{base}-{tag}-{counter}"), ext);
        counter += 1;
    }
    name
}

/// Ensure no two entries share a path inside the archive.
fn assert_unique_entry_names(entries: &[String]) -> Result<(), ArchiveError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.to_ascii_lowercase()) {
            return Err(ArchiveError::DuplicateEntry(entry.clone()));
        }
    }
    Ok(())
}

/// Write the folder entry and every image into a fresh zip.
fn serialize(folder: &str, entries: &[PendingEntry]) -> Result<Vec<u8>, ArchiveError> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.add_directory(format!("{folder}/"), options)?;
    for entry in entries {
        zip.start_file(format!("{folder}/{}", entry.name), options)?;
        zip.write_all(&entry.bytes)
            .map_err(|e| ArchiveError::Zip(e.into()))?;
    }

    Ok(zip.finish()?.into_inner())
}
