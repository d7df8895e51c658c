// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Search bar narrowing the gallery to matching emojis.

use eframe::egui;

use crate::models::emoji::EmojiRecord;

/// UI model for the search bar, kept free of side effects.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct SearchModel {
    term: String,
}

/// Messages emitted by the search view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchMsg {
    TermChanged(String),
    Clear,
}

impl SearchModel {
    pub fn term(&self) -> &str {
        &self.term
    }
}

pub fn update(model: &mut SearchModel, msg: SearchMsg) {
    match msg {
        SearchMsg::TermChanged(term) => model.term = term,
        SearchMsg::Clear => model.term.clear(),
    }
}

/// Render the search field and return any messages triggered by user interaction.
pub fn view(ui: &mut egui::Ui, model: &SearchModel) -> Vec<SearchMsg> {
    let mut msgs = Vec::new();

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS).size(18.0));
        let mut term = model.term.clone();
        let response = ui.add(
            egui::TextEdit::singleline(&mut term)
                .hint_text("Search tiktok emojis...")
                .desired_width(ui.available_width().min(420.0)),
        );
        if response.changed() {
            msgs.push(SearchMsg::TermChanged(term));
        }

        if !model.term.is_empty()
            && ui
                .button(egui_phosphor::regular::X)
                .on_hover_text("Clear search")
                .clicked()
        {
            msgs.push(SearchMsg::Clear);
        }
    });

    msgs
}

/// Records whose name or id contains `term`, ignoring case. A blank term matches everything.
pub fn filter<'a>(records: &'a [EmojiRecord], term: &str) -> Vec<&'a EmojiRecord> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| r.name.to_lowercase().contains(&needle) || r.id.to_lowercase().contains(&needle))
        .collect()
}
