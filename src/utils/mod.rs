// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and business logic.

pub mod format;
pub mod sanitize_component;

/// Human-readable byte sizes for status messages.
pub use format::format_bytes;
/// Sanitize arbitrary strings into zip-safe path components.
pub use sanitize_component::sanitize_component;
