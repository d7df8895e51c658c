// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for browsing and downloading emojis.
//! Handles layout, download controls, and wiring to background workers.

pub mod components;

use std::sync::Arc;

use eframe::egui;

use crate::config::Config;
use crate::logic::archive::ArchiveScope;
use crate::logic::fetch::AssetSource;
use crate::mvu::{self, AppModel, Command, CommandEnv, Msg, WorkerOutput};
use crate::signals::{SignalBus, SignalEmitter};
use crate::ui::components::gallery::GalleryEvent;
use crate::ui::components::{faq, gallery, search};

/// Stateful egui application for browsing the catalog and exporting archives.
pub struct EmojiPackApp {
    model: AppModel,
    inbox: Vec<Msg>,
    signals: SignalBus,
    emitter: SignalEmitter,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<WorkerOutput>,
}

impl EmojiPackApp {
    /// Spawn the worker pool and queue the initial catalog load.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let source = AssetSource::new(config.asset_root.clone(), config.fetch_timeout)?;
        let env = CommandEnv {
            source: Arc::new(source),
        };

        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<WorkerOutput>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().max(2))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            let env = env.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let output = mvu::run_command(cmd, &env);
                    let _ = msg_tx.send(output);
                }
            });
        }
        log::debug!("Started {threads} command worker(s)");

        let signals = SignalBus::default();
        let emitter = signals.emitter();

        Ok(Self {
            model: AppModel::new(config.catalog_path.clone()),
            inbox: vec![Msg::ReloadCatalog],
            signals,
            emitter,
            cmd_tx,
            msg_rx,
        })
    }
}

impl eframe::App for EmojiPackApp {
    /// Required by eframe 0.34; all rendering happens in [`Self::update`],
    /// which eframe still invokes before this each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame.
    ///
    /// Drains worker results (uploading decoded thumbnails as textures) and
    /// bus signals into the inbox, applies every message to the model,
    /// dispatches resulting commands, then renders the top bar, status line,
    /// error modal, and the scrollable gallery/FAQ content.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull results produced by the command workers.
        while let Ok(output) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            let msg = match output {
                WorkerOutput::Msg(msg) => msg,
                WorkerOutput::Thumbnail { id, image } => {
                    let texture = ctx.load_texture(
                        format!("thumb-{id}"),
                        image,
                        egui::TextureOptions::default(),
                    );
                    Msg::ThumbnailReady { id, texture }
                }
            };
            self.inbox.push(msg);
        }

        if ctx.input(|i| i.modifiers.command && i.modifiers.shift && i.key_pressed(egui::Key::D)) {
            self.emitter.request_download_all();
        }
        self.inbox
            .extend(self.signals.drain().into_iter().map(Msg::Signal));

        // Process pending messages in arrival order.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                if self.cmd_tx.send(cmd).is_ok() {
                    self.model.pending_commands += 1;
                }
            }
        }

        // Keep polling workers while something is in flight.
        if self.model.pending_commands > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("TikTok Emojis");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    self.render_reload_button(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_search(ui);
                ui.add_space(12.0);

                self.render_gallery(ui);
                ui.add_space(16.0);

                self.render_download_controls(ui);
                ui.add_space(24.0);

                ui.separator();
                self.render_faq(ui);
                ui.add_space(8.0);
            });
        });
    }
}

impl EmojiPackApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Re-read the catalog file; disabled while a load is running.
    fn render_reload_button(&mut self, ui: &mut egui::Ui) {
        let button = egui::Button::new(format!(
            "{} Reload catalog",
            egui_phosphor::regular::ARROW_CLOCKWISE
        ));
        if ui
            .add_enabled(!self.model.catalog_loading, button)
            .on_hover_text(self.model.catalog_path.display().to_string())
            .clicked()
        {
            self.inbox.push(Msg::ReloadCatalog);
        }
    }

    fn render_search(&mut self, ui: &mut egui::Ui) {
        let msgs = search::view(ui, &self.model.search);
        self.inbox.extend(msgs.into_iter().map(Msg::Search));
    }

    fn render_gallery(&mut self, ui: &mut egui::Ui) {
        let records = self.model.filtered();
        let events = gallery::view(ui, &self.model.gallery, &records, &self.model.selection);
        self.inbox.extend(events.into_iter().map(|event| match event {
            GalleryEvent::Toggle { id, selected } => Msg::ToggleSelection { id, selected },
            GalleryEvent::Gallery(msg) => Msg::Gallery(msg),
        }));
    }

    /// Render the download buttons plus "Clear selection" and "Cancel" when they apply.
    ///
    /// "Download Selected" stays disabled while nothing is selected. Clicks only
    /// enqueue messages; the save dialog runs as a background command.
    fn render_download_controls(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                let all = egui::Button::new(format!(
                    "{} Download All",
                    egui_phosphor::regular::FILE_ZIP
                ));
                if ui
                    .add_enabled(self.model.can_download_all(), all)
                    .on_hover_text("Bundle every emoji shown into tiktok-emojis.zip (Ctrl+Shift+D)")
                    .clicked()
                {
                    self.inbox.push(Msg::DownloadClicked(ArchiveScope::All));
                }

                let selected = egui::Button::new(format!(
                    "{} Download Selected ({})",
                    egui_phosphor::regular::DOWNLOAD_SIMPLE,
                    self.model.selection.len()
                ));
                if ui
                    .add_enabled(self.model.can_download_selected(), selected)
                    .on_disabled_hover_text("Tick at least one emoji to download a selection")
                    .clicked()
                {
                    self.inbox
                        .push(Msg::DownloadClicked(ArchiveScope::Selected));
                }

                if !self.model.selection.is_empty()
                    && ui
                        .button(format!("{} Clear selection", egui_phosphor::regular::X))
                        .clicked()
                {
                    self.inbox.push(Msg::ClearSelection);
                }

                if self.model.download.is_some()
                    && ui
                        .button(format!("{} Cancel", egui_phosphor::regular::STOP))
                        .on_hover_text("Stop the running download")
                        .clicked()
                {
                    self.inbox.push(Msg::CancelDownload);
                }
            });
        });
    }

    fn render_faq(&mut self, ui: &mut egui::Ui) {
        let msgs = faq::view(ui, &self.model.faq, &self.emitter);
        self.inbox.extend(msgs.into_iter().map(Msg::Faq));
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} working…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0))
                        .on_hover_text(format!(
                            "{} task(s) running in background",
                            self.model.pending_commands
                        ));
                }
            });
        }
    }
}
