// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Static FAQ rendered as a single-open accordion.

use eframe::egui;
use pulldown_cmark::{Event, Parser};

use crate::signals::SignalEmitter;

/// One question with its answer. Answers may use inline markdown code spans.
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

/// Index of the entry that offers a direct "download all" action.
const BATCH_DOWNLOAD_ENTRY: usize = 5;

pub const FAQ_ENTRIES: [FaqEntry; 10] = [
    FaqEntry {
        question: "What are TikTok Emojis?",
        answer: "TikTok emojis are a set of hidden, exclusive emojis that can only be displayed on the TikTok platform. You can't type them with a regular keyboard; they require special codes or tools to use.",
    },
    FaqEntry {
        question: "How do I use tiktok emojis on TikTok?",
        answer: "Copy your favorite tiktok emojis shortcode (like `[smile]`) and paste it into your TikTok comment, message, or video description. After posting, the tiktok emojis will appear automatically.",
    },
    FaqEntry {
        question: "Why can't I see tiktok emojis on other platforms?",
        answer: "Tiktok emojis are exclusive to the TikTok app and website. Other platforms will only show the shortcode or a blank box instead of the emoji.",
    },
    FaqEntry {
        question: "Why are some tiktok emojis not showing up on my TikTok?",
        answer: "This may be due to an outdated TikTok app, regional restrictions, or network issues. Please update your app and check your internet connection.",
    },
    FaqEntry {
        question: "Can I use tiktok emojis on Instagram, Facebook, Twitter, or Snapchat?",
        answer: "No, tiktok emojis are only supported on the TikTok platform. Other platforms cannot recognize the special tiktok emojis shortcode. However, you can save tiktok emojis images and send them to users on other platforms as pictures.",
    },
    FaqEntry {
        question: "How can I copy or download all tiktok emojis at once?",
        answer: "Use the batch download buttons below the gallery: \"Download All\" bundles every emoji image into one zip, \"Download Selected\" only the ones you ticked.",
    },
    FaqEntry {
        question: "Are tiktok emojis free for commercial use?",
        answer: "Tiktok emojis are for personal entertainment and content creation only. Commercial use or redistribution is not allowed.",
    },
    FaqEntry {
        question: "Why does the tiktok emojis shortcode show as text after I paste it?",
        answer: "The shortcode will only turn into a tiktok emoji after you post it on TikTok. On other platforms, it will remain as text.",
    },
    FaqEntry {
        question: "Does this app collect my personal information?",
        answer: "No. Nothing leaves your machine except the image requests needed to show and download the emojis.",
    },
    FaqEntry {
        question: "How can I give feedback or report an issue?",
        answer: "Open an issue in the project repository. We welcome all suggestions to improve your tiktok emojis experience!",
    },
];

/// Accordion state: at most one entry is open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaqModel {
    open: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaqMsg {
    /// Header clicked: open it, or close it when it is already open.
    Toggle(usize),
}

impl FaqModel {
    pub fn open(&self) -> Option<usize> {
        self.open
    }
}

pub fn update(model: &mut FaqModel, msg: FaqMsg) {
    match msg {
        FaqMsg::Toggle(index) if index < FAQ_ENTRIES.len() => {
            model.open = if model.open == Some(index) {
                None
            } else {
                Some(index)
            };
        }
        FaqMsg::Toggle(_) => {}
    }
}

/// Piece of an answer: plain text or an inline code span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Code(String),
}

/// Split an answer into text and code segments, merging adjacent text.
pub fn answer_segments(answer: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    for event in Parser::new(answer) {
        let piece = match event {
            Event::Text(text) => Segment::Text(text.into_string()),
            Event::Code(code) => Segment::Code(code.into_string()),
            Event::SoftBreak | Event::HardBreak => Segment::Text(" ".into()),
            _ => continue,
        };
        if let (Segment::Text(next), Some(Segment::Text(prev))) = (&piece, segments.last_mut()) {
            prev.push_str(next);
            continue;
        }
        segments.push(piece);
    }
    segments
}

/// Render the FAQ section and return accordion messages.
///
/// The batch-download entry gets a button that raises the download-all
/// signal through `emitter`, so the FAQ never touches gallery state.
pub fn view(ui: &mut egui::Ui, model: &FaqModel, emitter: &SignalEmitter) -> Vec<FaqMsg> {
    let mut msgs = Vec::new();

    ui.vertical_centered(|ui| {
        ui.heading("Frequently Asked Questions about tiktok emojis");
    });
    ui.add_space(8.0);

    for (index, entry) in FAQ_ENTRIES.iter().enumerate() {
        let is_open = model.open() == Some(index);
        let response = egui::CollapsingHeader::new(format!("{}. {}", index + 1, entry.question))
            .id_salt(("faq", index))
            .open(Some(is_open))
            .show(ui, |ui| {
                render_answer(ui, entry.answer);
                if index == BATCH_DOWNLOAD_ENTRY
                    && ui
                        .button(format!(
                            "{} Download all now",
                            egui_phosphor::regular::DOWNLOAD_SIMPLE
                        ))
                        .clicked()
                {
                    emitter.request_download_all();
                }
            });
        if response.header_response.clicked() {
            msgs.push(FaqMsg::Toggle(index));
        }
    }

    msgs
}

/// Lay out answer segments inline, code spans in monospace.
fn render_answer(ui: &mut egui::Ui, answer: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for segment in answer_segments(answer) {
            match segment {
                Segment::Text(text) => {
                    ui.label(text);
                }
                Segment::Code(code) => {
                    ui.label(egui::RichText::new(code).code());
                }
            }
        }
    });
}
