// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Turn image locations and record ids into zip-safe entry names.

/// Name used when nothing usable survives sanitization.
pub const FALLBACK_COMPONENT: &str = "emoji";

/// Produce a path component that is safe inside a zip archive.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Å" → "A").
/// - Allow ASCII alphanumerics plus `-`, `_`, and `.`; everything else becomes `_`.
/// - Collapse runs of `_` and `.`; trim leading and trailing dots.
/// - Suffix Windows device names so extraction works everywhere.
///
/// `smile.png` stays `smile.png`; `%F0%9F%98%80 grin.png` becomes
/// `F0_9F_98_80_grin.png`.
pub fn sanitize_component(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len());
    let mut last: Option<char> = None;

    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.' {
            ch
        } else {
            '_'
        };

        if (mapped == '_' || mapped == '.') && last == Some(mapped) {
            continue;
        }
        out.push(mapped);
        last = Some(mapped);
    }

    while let Some(pos) = out.find("_.") {
        out.remove(pos);
    }

    // Leading dots would hide the entry on Unix; trailing ones break Windows.
    let trimmed = out.trim_matches(|c| c == '.' || c == '_' || c == ' ');
    if trimmed.is_empty() {
        return FALLBACK_COMPONENT.to_string();
    }
    let mut out = trimmed.to_string();

    let (basename, ext) = split_extension(&out);
    let is_reserved = matches!(
        basename.to_ascii_uppercase().as_str(),
        "CON" | "PRN" | "AUX" | "NUL"
            | "COM1" | "COM2" | "COM3" | "COM4" | "COM5" | "COM6" | "COM7" | "COM8" | "COM9"
            | "LPT1" | "LPT2" | "LPT3" | "LPT4" | "LPT5" | "LPT6" | "LPT7" | "LPT8" | "LPT9"
    );

    if is_reserved {
        out = join_extension(&format!("{basename}_"), ext);
    }

    out
}

/// Split `name.ext` into its basename and optional extension.
///
/// Dot-leading names (`.png`) have no extension.
pub fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((base, ext)) if !base.is_empty() && !ext.is_empty() => (base, Some(ext)),
        _ => (name, None),
    }
}

/// Inverse of [`split_extension`].
pub fn join_extension(basename: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{basename}.{ext}"),
        None => basename.to_string(),
    }
}
