// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Emoji catalog record (UI-agnostic).

use serde::Deserialize;

/// One catalog entry: identity, display name, and where its image lives.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EmojiRecord {
    pub id: String,
    pub name: String,
    /// URL, `file://` URL, or path relative to the asset root. May be empty.
    #[serde(rename = "imagePath", alias = "imageLocation", default)]
    pub image_location: String,
}

impl EmojiRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        image_location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image_location: image_location.into(),
        }
    }

    /// True when the record points at an image that can be fetched.
    pub fn has_image(&self) -> bool {
        !self.image_location.trim().is_empty()
    }
}
