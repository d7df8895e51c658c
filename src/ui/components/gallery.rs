// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Emoji grid with selection checkboxes and lazily loaded thumbnails.

use std::collections::{HashMap, HashSet};

use eframe::egui;

use crate::models::emoji::EmojiRecord;
use crate::models::selection::SelectionSet;

/// Edge length of a rendered thumbnail.
const THUMB_SIZE: f32 = 72.0;
/// Approximate card width used to derive the column count.
const CARD_WIDTH: f32 = 120.0;

/// MVU state for the grid's thumbnail cache.
#[derive(Default)]
pub struct GalleryModel {
    thumbnails: HashMap<String, egui::TextureHandle>,
    failures: HashSet<String>,
    requested: HashSet<String>,
}

/// Thumbnail cache messages.
// Debug omitted because TextureHandle is not Debug.
pub enum GalleryMsg {
    LoadThumbnail(String),
    ThumbnailReady {
        id: String,
        texture: egui::TextureHandle,
    },
    ThumbnailFailed {
        id: String,
    },
}

/// What the grid reports back after a frame.
pub enum GalleryEvent {
    /// Checkbox flipped; the app model owns the selection.
    Toggle { id: String, selected: bool },
    /// Thumbnail cache message for [`update`].
    Gallery(GalleryMsg),
}

/// Side-effectful commands that can be run off the UI path.
pub enum GalleryCommand {
    LoadThumbnail { id: String },
}

impl GalleryModel {
    /// Forget cached thumbnails, e.g. after the catalog changed.
    pub fn reset(&mut self) {
        self.thumbnails.clear();
        self.failures.clear();
        self.requested.clear();
    }

    pub fn has_failed(&self, id: &str) -> bool {
        self.failures.contains(id)
    }

    fn needs_thumbnail(&self, id: &str) -> bool {
        !self.thumbnails.contains_key(id) && !self.failures.contains(id) && !self.requested.contains(id)
    }
}

/// Apply a thumbnail message to the gallery model.
pub fn update(model: &mut GalleryModel, msg: GalleryMsg, cmds: &mut Vec<GalleryCommand>) {
    match msg {
        GalleryMsg::LoadThumbnail(id) => {
            if model.needs_thumbnail(&id) {
                model.requested.insert(id.clone());
                cmds.push(GalleryCommand::LoadThumbnail { id });
            }
        }
        GalleryMsg::ThumbnailReady { id, texture } => {
            model.requested.remove(&id);
            model.thumbnails.insert(id, texture);
        }
        GalleryMsg::ThumbnailFailed { id } => {
            model.requested.remove(&id);
            model.failures.insert(id);
        }
    }
}

/// Render the gallery heading and grid for the filtered records.
pub fn view(
    ui: &mut egui::Ui,
    model: &GalleryModel,
    records: &[&EmojiRecord],
    selection: &SelectionSet,
) -> Vec<GalleryEvent> {
    let mut msgs = Vec::new();

    ui.vertical_centered(|ui| {
        ui.heading(format!("{} TikTok Emojis Collection", records.len()));
        ui.label(
            egui::RichText::new(
                "Discover and download all hidden tiktok emojis. Tick the ones you want, or grab them all at once.",
            )
            .color(egui::Color32::from_gray(110)),
        );
    });
    ui.add_space(10.0);

    if records.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS).size(40.0));
            ui.label(egui::RichText::new("No tiktok emojis found").strong().size(18.0));
            ui.label(
                egui::RichText::new("Try adjusting your search or browse all tiktok emojis.")
                    .color(egui::Color32::from_gray(110)),
            );
            ui.add_space(24.0);
        });
        return msgs;
    }

    let cols = (ui.available_width() / CARD_WIDTH).floor().max(1.0) as usize;
    egui::Grid::new("emoji_grid")
        .num_columns(cols)
        .spacing(egui::vec2(8.0, 8.0))
        .min_col_width(CARD_WIDTH - 8.0)
        .show(ui, |ui| {
            for (i, record) in records.iter().enumerate() {
                render_card(ui, model, record, selection.is_selected(&record.id), &mut msgs);
                if (i + 1) % cols == 0 {
                    ui.end_row();
                }
            }
            if !records.len().is_multiple_of(cols) {
                ui.end_row();
            }
        });

    msgs
}

/// One card: checkbox, thumbnail (or placeholder), and name.
fn render_card(
    ui: &mut egui::Ui,
    model: &GalleryModel,
    record: &EmojiRecord,
    selected: bool,
    msgs: &mut Vec<GalleryEvent>,
) {
    ui.group(|ui| {
        ui.set_width(CARD_WIDTH - 24.0);
        ui.vertical_centered(|ui| {
            let mut checked = selected;
            if ui
                .checkbox(&mut checked, "")
                .on_hover_text(format!("Select {}", record.name))
                .changed()
            {
                msgs.push(GalleryEvent::Toggle {
                    id: record.id.clone(),
                    selected: checked,
                });
            }

            if let Some(texture) = model.thumbnails.get(&record.id) {
                let size = texture.size_vec2();
                let scale = (THUMB_SIZE / size.x).min(THUMB_SIZE / size.y).min(1.0);
                ui.add(egui::Image::new((texture.id(), size * scale)));
            } else if model.has_failed(&record.id) || !record.has_image() {
                ui.add_sized(
                    egui::vec2(THUMB_SIZE, THUMB_SIZE),
                    egui::Label::new(
                        egui::RichText::new(egui_phosphor::regular::IMAGE_BROKEN)
                            .size(32.0)
                            .color(egui::Color32::from_gray(150)),
                    ),
                )
                .on_hover_text("Image unavailable");
            } else {
                if model.needs_thumbnail(&record.id) {
                    msgs.push(GalleryEvent::Gallery(GalleryMsg::LoadThumbnail(
                        record.id.clone(),
                    )));
                }
                ui.add_sized(egui::vec2(THUMB_SIZE, THUMB_SIZE), egui::Spinner::new());
            }

            ui.label(egui::RichText::new(&record.name).small());
        });
    });
}

/// Decode image bytes into a thumbnail-friendly `ColorImage`.
pub(crate) fn decode_thumbnail(bytes: &[u8]) -> Result<egui::ColorImage, String> {
    const MAX: u32 = 128;

    let dyn_img = image::load_from_memory(bytes).map_err(|e| e.to_string())?;
    let resized = dyn_img.thumbnail(MAX, MAX).to_rgba8();
    let size = [resized.width() as usize, resized.height() as usize];
    let pixels = resized.into_raw();
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, &pixels))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageBuffer, ImageFormat, Rgba};

    use super::{GalleryCommand, GalleryModel, GalleryMsg, decode_thumbnail, update};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
            ImageBuffer::from_pixel(width, height, Rgba([255, 0, 80, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).expect("png encoded");
        out.into_inner()
    }

    // Raster thumbnails should retain aspect ratio and respect max bounds.
    #[test]
    fn decode_thumbnail_scales_large_images() {
        let thumb = decode_thumbnail(&png_bytes(400, 200)).expect("thumbnail created");

        assert!(thumb.size[0] <= 128 && thumb.size[1] <= 128);
        let aspect = thumb.size[0] as f32 / thumb.size[1] as f32;
        assert!((aspect - 2.0).abs() < 0.05);
    }

    // Invalid image data should yield an error instead of panicking.
    #[test]
    fn decode_thumbnail_errors_on_invalid_image() {
        assert!(decode_thumbnail(b"not an image").is_err());
    }

    #[test]
    fn thumbnail_is_requested_once_while_pending() {
        let mut model = GalleryModel::default();
        let mut cmds = Vec::new();

        update(&mut model, GalleryMsg::LoadThumbnail("a".into()), &mut cmds);
        update(&mut model, GalleryMsg::LoadThumbnail("a".into()), &mut cmds);

        assert_eq!(cmds.len(), 1);
        assert!(matches!(&cmds[0], GalleryCommand::LoadThumbnail { id } if id == "a"));
    }

    #[test]
    fn failed_thumbnail_is_not_retried_until_reset() {
        let mut model = GalleryModel::default();
        let mut cmds = Vec::new();

        update(&mut model, GalleryMsg::LoadThumbnail("a".into()), &mut cmds);
        update(&mut model, GalleryMsg::ThumbnailFailed { id: "a".into() }, &mut cmds);
        update(&mut model, GalleryMsg::LoadThumbnail("a".into()), &mut cmds);
        assert_eq!(cmds.len(), 1);
        assert!(model.has_failed("a"));

        model.reset();
        update(&mut model, GalleryMsg::LoadThumbnail("a".into()), &mut cmds);

        assert_eq!(cmds.len(), 2);
        assert!(!model.has_failed("a"));
    }
}
