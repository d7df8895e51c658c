// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe to launch the emoji gallery.

use eframe::egui;
use egui_phosphor::Variant;

use crate::config::Config;
use crate::ui::EmojiPackApp;

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: Config) -> eframe::Result<()> {
    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EmojiPack",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            let app = EmojiPackApp::new(&config)?;
            Ok(Box::new(app))
        }),
    )
}
