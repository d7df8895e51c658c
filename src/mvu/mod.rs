// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring component state, messages, and commands.

use std::path::PathBuf;
use std::sync::Arc;

use crate::logic::archive::{
    ArchiveError, ArchiveReport, ArchiveRequest, ArchiveScope, CancelToken, ensure_extension,
    save_archive,
};
use crate::logic::catalog::load_catalog;
use crate::logic::fetch::ImageSource;
use crate::models::emoji::EmojiRecord;
use crate::models::selection::SelectionSet;
use crate::signals::DownloadSignal;
use crate::ui::components::faq::{self, FaqModel, FaqMsg};
use crate::ui::components::gallery::{self, GalleryCommand, GalleryModel, GalleryMsg};
use crate::ui::components::search::{self, SearchModel, SearchMsg};
use crate::utils::format_bytes;

/// Download currently being built on a worker.
#[derive(Clone, Debug)]
pub struct ActiveDownload {
    pub scope: ArchiveScope,
    pub cancel: CancelToken,
}

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Catalog file to (re)load.
    pub catalog_path: PathBuf,
    /// Records in catalog order.
    pub catalog: Vec<EmojiRecord>,
    /// Ids marked for "Download Selected".
    pub selection: SelectionSet,
    /// Search bar state.
    pub search: SearchModel,
    /// Thumbnail cache for the grid.
    pub gallery: GalleryModel,
    /// Accordion state.
    pub faq: FaqModel,
    /// True while a catalog load command is in flight.
    pub catalog_loading: bool,
    /// Scope whose save dialog is open.
    pub awaiting_destination: Option<ArchiveScope>,
    /// Archive build in progress.
    pub download: Option<ActiveDownload>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn new(catalog_path: PathBuf) -> Self {
        Self {
            catalog_path,
            ..Default::default()
        }
    }

    /// Records matching the current search term, in catalog order.
    pub fn filtered(&self) -> Vec<&EmojiRecord> {
        search::filter(&self.catalog, self.search.term())
    }

    /// A download or its save dialog is in progress.
    pub fn is_busy(&self) -> bool {
        self.download.is_some() || self.awaiting_destination.is_some()
    }

    /// "Download All" packs what the gallery shows, so it needs a non-empty view.
    pub fn can_download_all(&self) -> bool {
        !self.is_busy() && !self.filtered().is_empty()
    }

    /// "Download Selected" is actionable iff something is selected.
    pub fn can_download_selected(&self) -> bool {
        !self.is_busy() && !self.selection.is_empty()
    }

    /// Selected records the current search leaves visible.
    pub fn visible_selected_count(&self) -> usize {
        self.filtered()
            .iter()
            .filter(|r| self.selection.is_selected(&r.id))
            .count()
    }

    fn contains_id(&self, id: &str) -> bool {
        self.catalog.iter().any(|r| r.id == id)
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    ReloadCatalog,
    CatalogLoaded(Result<Vec<EmojiRecord>, String>),
    Search(SearchMsg),
    Gallery(GalleryMsg),
    /// Checkbox flipped in the gallery.
    ToggleSelection {
        id: String,
        selected: bool,
    },
    Faq(FaqMsg),
    /// Raised through the signal bus instead of a button.
    Signal(DownloadSignal),
    DownloadClicked(ArchiveScope),
    DownloadRequested {
        scope: ArchiveScope,
        output: PathBuf,
    },
    DownloadDialogCancelled,
    CancelDownload,
    ClearSelection,
    DownloadCompleted(Result<ArchiveReport, ArchiveError>),
    ThumbnailReady {
        id: String,
        texture: eframe::egui::TextureHandle,
    },
    DismissError,
}

/// Commands represent side-effects executed between frames.
pub enum Command {
    LoadCatalog { path: PathBuf },
    LoadThumbnail { id: String, location: String },
    PickDestination { scope: ArchiveScope },
    BuildArchive(DownloadPayload),
}

/// What a worker hands back to the UI thread.
pub enum WorkerOutput {
    Msg(Msg),
    /// Decoded pixels; turning them into a texture needs the egui context.
    Thumbnail {
        id: String,
        image: eframe::egui::ColorImage,
    },
}

impl From<Msg> for WorkerOutput {
    fn from(msg: Msg) -> Self {
        WorkerOutput::Msg(msg)
    }
}

/// Everything a worker needs to build and save one archive.
pub struct DownloadPayload {
    /// Final archive path on disk (with `.zip` extension enforced).
    pub output: PathBuf,
    pub request: ArchiveRequest,
    pub cancel: CancelToken,
}

/// Shared services available to command workers.
#[derive(Clone)]
pub struct CommandEnv {
    pub source: Arc<dyn ImageSource>,
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::ReloadCatalog => {
            if !model.catalog_loading {
                model.catalog_loading = true;
                cmds.push(Command::LoadCatalog {
                    path: model.catalog_path.clone(),
                });
            }
        }
        Msg::CatalogLoaded(result) => {
            model.catalog_loading = false;
            match result {
                Ok(records) => apply_catalog(model, records),
                Err(err) => {
                    surface_event(model, format!("Failed to load emoji catalog:\n\n{err}"), true)
                }
            }
        }
        Msg::Search(m) => search::update(&mut model.search, m),
        Msg::ToggleSelection { id, selected } => {
            // Ids outside the catalog would dangle in the selection.
            if model.contains_id(&id) {
                model.selection.toggle(&id, selected);
            }
        }
        Msg::Gallery(m) => {
            let mut gallery_cmds = Vec::new();
            gallery::update(&mut model.gallery, m, &mut gallery_cmds);
            for c in gallery_cmds {
                match c {
                    GalleryCommand::LoadThumbnail { id } => {
                        if let Some(record) = model.catalog.iter().find(|r| r.id == id) {
                            cmds.push(Command::LoadThumbnail {
                                id,
                                location: record.image_location.clone(),
                            });
                        }
                    }
                }
            }
        }
        Msg::Faq(m) => faq::update(&mut model.faq, m),
        Msg::Signal(DownloadSignal::All) => request_destination(model, ArchiveScope::All, cmds),
        Msg::DownloadClicked(scope) => request_destination(model, scope, cmds),
        Msg::DownloadRequested { scope, output } => {
            model.awaiting_destination = None;
            match validate_for_download(model, scope, output) {
                Ok(Some(payload)) => {
                    let count = payload.request.records().len();
                    model.download = Some(ActiveDownload {
                        scope,
                        cancel: payload.cancel.clone(),
                    });
                    surface_event(model, format!("Downloading {count} emoji(s)..."), false);
                    cmds.push(Command::BuildArchive(payload));
                }
                Ok(None) => {}
                Err(err) => surface_event(model, err, true),
            }
        }
        Msg::DownloadDialogCancelled => {
            model.awaiting_destination = None;
            surface_event(model, "Download cancelled.".to_string(), false);
        }
        Msg::CancelDownload => {
            if let Some(active) = &model.download {
                active.cancel.cancel();
                surface_event(model, "Cancelling download...".to_string(), false);
            }
        }
        Msg::ClearSelection => model.selection.clear(),
        Msg::DownloadCompleted(result) => {
            model.download = None;
            match result {
                Ok(report) => surface_event(model, describe_report(&report), false),
                Err(ArchiveError::Cancelled) => {
                    surface_event(model, "Download cancelled.".to_string(), false)
                }
                Err(err) => surface_event(model, format!("Failed to save archive:\n\n{err}"), true),
            }
        }
        Msg::ThumbnailReady { id, texture } => {
            gallery::update(
                &mut model.gallery,
                GalleryMsg::ThumbnailReady { id, texture },
                &mut Vec::new(),
            );
        }
        Msg::DismissError => model.error = None,
    }
}

/// Execute a command (on a worker thread) and return its result.
pub fn run_command(cmd: Command, env: &CommandEnv) -> WorkerOutput {
    match cmd {
        Command::LoadCatalog { path } => {
            Msg::CatalogLoaded(load_catalog(&path).map_err(|err| format!("{err:#}"))).into()
        }
        Command::LoadThumbnail { id, location } => {
            let decoded = env
                .source
                .fetch(&location)
                .map_err(|err| err.to_string())
                .and_then(|image| gallery::decode_thumbnail(&image.bytes));
            match decoded {
                Ok(image) => WorkerOutput::Thumbnail { id, image },
                Err(err) => {
                    log::debug!("Thumbnail for {id} unavailable: {err}");
                    Msg::Gallery(GalleryMsg::ThumbnailFailed { id }).into()
                }
            }
        }
        Command::PickDestination { scope } => {
            let dialog = rfd::FileDialog::new()
                .set_title("Save emoji archive")
                .add_filter("Zip archive", &["zip"])
                .set_file_name(scope.file_name());
            match dialog.save_file() {
                Some(output) => Msg::DownloadRequested { scope, output }.into(),
                None => Msg::DownloadDialogCancelled.into(),
            }
        }
        Command::BuildArchive(payload) => Msg::DownloadCompleted(save_archive(
            &payload.output,
            &payload.request,
            env.source.as_ref(),
            &payload.cancel,
        ))
        .into(),
    }
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

/// Replace the catalog and drop selections that no longer resolve.
fn apply_catalog(model: &mut AppModel, records: Vec<EmojiRecord>) {
    model.catalog = records;
    model.gallery.reset();
    let dropped = model
        .selection
        .retain_known(model.catalog.iter().map(|r| r.id.as_str()));

    let mut message = format!("Loaded {} emoji(s).", model.catalog.len());
    if dropped > 0 {
        message.push_str(&format!(" {dropped} stale selection(s) cleared."));
    }
    surface_event(model, message, false);
}

/// Ask for a save location when the scope is actionable; otherwise do nothing.
fn request_destination(model: &mut AppModel, scope: ArchiveScope, cmds: &mut Vec<Command>) {
    let allowed = match scope {
        ArchiveScope::All => model.can_download_all(),
        ArchiveScope::Selected => model.can_download_selected(),
    };
    if !allowed {
        log::debug!("Ignoring {scope:?} download request: not actionable");
        return;
    }
    if scope == ArchiveScope::Selected && model.visible_selected_count() == 0 {
        surface_event(
            model,
            "None of the selected emojis match the current search.".to_string(),
            false,
        );
        return;
    }
    model.awaiting_destination = Some(scope);
    cmds.push(Command::PickDestination { scope });
}

/// Validate model state and build the payload required for a download.
///
/// Both scopes cover the records the gallery currently shows. `Ok(None)`
/// means the request is silently ignored (nothing visible is selected).
fn validate_for_download(
    model: &AppModel,
    scope: ArchiveScope,
    output: PathBuf,
) -> Result<Option<DownloadPayload>, String> {
    if model.download.is_some() {
        return Err("A download is already running.".into());
    }

    let request = match scope {
        ArchiveScope::All => {
            let visible = model.filtered();
            if visible.is_empty() {
                return Err("There are no emojis to download.".into());
            }
            ArchiveRequest::all(visible)
        }
        ArchiveScope::Selected => {
            if model.selection.is_empty() {
                return Ok(None);
            }
            let request = ArchiveRequest::selected(model.filtered(), &model.selection);
            if request.is_empty() {
                return Ok(None);
            }
            request
        }
    };

    Ok(Some(DownloadPayload {
        output: ensure_extension(output, "zip"),
        request,
        cancel: CancelToken::default(),
    }))
}

/// Status line for a finished download, listing records that were left out.
fn describe_report(report: &ArchiveReport) -> String {
    let mut message = format!(
        "Archive saved: {} ({} image(s), {})",
        report.path.display(),
        report.entries.len(),
        format_bytes(report.size)
    );
    if report.skipped > 0 {
        message.push_str(&format!(", {} without image", report.skipped));
    }
    if !report.failures.is_empty() {
        let ids: Vec<&str> = report.failures.iter().map(|f| f.id.as_str()).collect();
        message.push_str(&format!(
            ". Warning: {} image(s) failed to download: {}",
            report.failures.len(),
            ids.join(", ")
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::logic::archive::FetchFailure;
    use crate::logic::fetch::{AssetRoot, AssetSource};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    fn catalog() -> Vec<EmojiRecord> {
        vec![
            EmojiRecord::new("a", "Smile", "/img/smile.png"),
            EmojiRecord::new("b", "Wink", "/img/wink.png"),
        ]
    }

    fn loaded_model() -> AppModel {
        let mut model = AppModel::new(PathBuf::from("emojis.json"));
        let mut cmds = Vec::new();
        update(&mut model, Msg::CatalogLoaded(Ok(catalog())), &mut cmds);
        assert!(cmds.is_empty());
        model
    }

    fn asset_env(tmp: &TempDir) -> CommandEnv {
        fs::create_dir_all(tmp.path().join("img")).unwrap();
        fs::write(tmp.path().join("img/smile.png"), b"smile").unwrap();
        fs::write(tmp.path().join("img/wink.png"), b"wink").unwrap();
        let source = AssetSource::new(
            AssetRoot::Dir(tmp.path().to_path_buf()),
            Duration::from_secs(1),
        )
        .unwrap();
        CommandEnv {
            source: Arc::new(source),
        }
    }

    fn into_msg(output: WorkerOutput) -> Msg {
        match output {
            WorkerOutput::Msg(msg) => msg,
            WorkerOutput::Thumbnail { id, .. } => panic!("unexpected thumbnail for {id}"),
        }
    }

    fn request_ids(cmds: &mut Vec<Command>) -> Vec<String> {
        match cmds.pop() {
            Some(Command::BuildArchive(payload)) => payload
                .request
                .records()
                .iter()
                .map(|r| r.id.clone())
                .collect(),
            _ => panic!("expected build command"),
        }
    }

    fn report(failures: Vec<FetchFailure>) -> ArchiveReport {
        ArchiveReport {
            path: PathBuf::from("/tmp/tiktok-emojis.zip"),
            entries: vec!["tiktok-emojis/smile.png".into()],
            failures,
            skipped: 0,
            size: 2048,
        }
    }

    #[test]
    fn download_request_enqueues_and_completes() {
        let tmp = TempDir::new().unwrap();
        let env = asset_env(&tmp);
        let output = tmp.path().join("out/tiktok-emojis");

        let mut model = loaded_model();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::DownloadRequested {
                scope: ArchiveScope::All,
                output: output.clone(),
            },
            &mut cmds,
        );

        assert_eq!(cmds.len(), 1, "download should enqueue command");
        assert!(model.download.is_some());
        assert!(!model.can_download_all());

        let msg = into_msg(run_command(cmds.pop().unwrap(), &env));
        let mut cmds2 = Vec::new();
        update(&mut model, msg, &mut cmds2);

        assert!(model.error.is_none(), "unexpected error: {:?}", model.error);
        assert!(model.download.is_none());
        assert!(
            model
                .status
                .as_deref()
                .map(|s| s.contains("Archive saved") && s.contains("2 image(s)"))
                .unwrap_or(false)
        );
        assert!(output.with_extension("zip").exists());
    }

    #[test]
    fn download_buttons_and_signal_request_a_destination() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(&mut model, Msg::Signal(DownloadSignal::All), &mut cmds);

        assert_eq!(cmds.len(), 1);
        assert!(matches!(
            cmds.pop().unwrap(),
            Command::PickDestination {
                scope: ArchiveScope::All
            }
        ));
        assert_eq!(model.awaiting_destination, Some(ArchiveScope::All));

        // A second trigger while the dialog is open is ignored.
        update(
            &mut model,
            Msg::DownloadClicked(ArchiveScope::All),
            &mut cmds,
        );
        assert!(cmds.is_empty());
    }

    #[test]
    fn download_selected_with_empty_selection_has_no_effect() {
        let mut model = loaded_model();
        model.status = None;
        assert!(!model.can_download_selected());

        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::DownloadClicked(ArchiveScope::Selected),
            &mut cmds,
        );
        update(
            &mut model,
            Msg::DownloadRequested {
                scope: ArchiveScope::Selected,
                output: PathBuf::from("/tmp/ignored.zip"),
            },
            &mut cmds,
        );

        assert!(cmds.is_empty());
        assert!(model.status.is_none());
        assert!(model.error.is_none());
        assert!(model.download.is_none());
    }

    #[test]
    fn download_selected_is_enabled_iff_selection_non_empty() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::ToggleSelection {
                id: "b".into(),
                selected: true,
            },
            &mut cmds,
        );
        assert!(model.can_download_selected());

        update(
            &mut model,
            Msg::ToggleSelection {
                id: "b".into(),
                selected: false,
            },
            &mut cmds,
        );
        assert!(!model.can_download_selected());
        assert!(cmds.is_empty());
    }

    #[test]
    fn selected_download_packs_only_selected_records() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::ToggleSelection {
                id: "b".into(),
                selected: true,
            },
            &mut cmds,
        );
        update(
            &mut model,
            Msg::DownloadRequested {
                scope: ArchiveScope::Selected,
                output: PathBuf::from("/tmp/selected.zip"),
            },
            &mut cmds,
        );

        match cmds.pop() {
            Some(Command::BuildArchive(payload)) => {
                assert_eq!(payload.request.scope(), ArchiveScope::Selected);
                let ids: Vec<&str> = payload
                    .request
                    .records()
                    .iter()
                    .map(|r| r.id.as_str())
                    .collect();
                assert_eq!(ids, vec!["b"]);
            }
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn clear_selection_disables_download_selected() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::ToggleSelection {
                id: "a".into(),
                selected: true,
            },
            &mut cmds,
        );

        update(&mut model, Msg::ClearSelection, &mut cmds);

        assert!(model.selection.is_empty());
        assert!(!model.can_download_selected());
    }

    #[test]
    fn toggling_unknown_id_is_ignored() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::ToggleSelection {
                id: "ghost".into(),
                selected: true,
            },
            &mut cmds,
        );

        assert!(model.selection.is_empty());
    }

    #[test]
    fn catalog_reload_prunes_stale_selection() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        for id in ["a", "b"] {
            update(
                &mut model,
                Msg::ToggleSelection {
                    id: id.into(),
                    selected: true,
                },
                &mut cmds,
            );
        }

        update(
            &mut model,
            Msg::CatalogLoaded(Ok(vec![EmojiRecord::new("b", "Wink", "/img/wink.png")])),
            &mut cmds,
        );

        assert!(!model.selection.is_selected("a"));
        assert!(model.selection.is_selected("b"));
        assert!(
            model
                .status
                .as_deref()
                .is_some_and(|s| s.contains("1 stale selection"))
        );
    }

    #[test]
    fn catalog_load_failure_sets_error() {
        let mut model = AppModel::default();
        let mut cmds = Vec::new();
        update(&mut model, Msg::ReloadCatalog, &mut cmds);
        assert!(model.catalog_loading);
        assert_eq!(cmds.len(), 1);

        update(
            &mut model,
            Msg::CatalogLoaded(Err("boom".into())),
            &mut cmds,
        );

        assert!(!model.catalog_loading);
        assert!(model.error.as_deref().is_some_and(|e| e.contains("boom")));
    }

    #[test]
    fn second_download_while_running_is_rejected() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        let request = || Msg::DownloadRequested {
            scope: ArchiveScope::All,
            output: PathBuf::from("/tmp/a.zip"),
        };

        update(&mut model, request(), &mut cmds);
        update(&mut model, request(), &mut cmds);

        assert_eq!(cmds.len(), 1);
        assert!(model.error.is_some());
    }

    #[test]
    fn cancel_download_sets_token() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::DownloadRequested {
                scope: ArchiveScope::All,
                output: PathBuf::from("/tmp/a.zip"),
            },
            &mut cmds,
        );

        update(&mut model, Msg::CancelDownload, &mut cmds);

        match cmds.pop() {
            Some(Command::BuildArchive(payload)) => assert!(payload.cancel.is_cancelled()),
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn completed_with_failures_warns_without_error_modal() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::DownloadCompleted(Ok(report(vec![FetchFailure {
                id: "b".into(),
                location: "/img/wink.png".into(),
                reason: "404".into(),
            }]))),
            &mut cmds,
        );

        assert!(model.error.is_none());
        let status = model.status.unwrap();
        assert!(status.contains("1 image(s) failed"));
        assert!(status.contains(": b"));
        assert!(status.contains("2.0 KB"));
    }

    #[test]
    fn cancelled_and_fatal_results_are_reported_differently() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::DownloadCompleted(Err(ArchiveError::Cancelled)),
            &mut cmds,
        );
        assert_eq!(model.status.as_deref(), Some("Download cancelled."));
        assert!(model.error.is_none());

        update(
            &mut model,
            Msg::DownloadCompleted(Err(ArchiveError::NothingFetched {
                attempted: 2,
                first_reason: "offline".into(),
            })),
            &mut cmds,
        );
        assert!(
            model
                .error
                .as_deref()
                .is_some_and(|e| e.starts_with("Failed to save archive"))
        );
    }

    #[test]
    fn dialog_cancel_clears_pending_destination() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        update(&mut model, Msg::DownloadClicked(ArchiveScope::All), &mut cmds);

        update(&mut model, Msg::DownloadDialogCancelled, &mut cmds);

        assert!(model.awaiting_destination.is_none());
        assert!(model.can_download_all());
    }

    #[test]
    fn thumbnail_request_enqueues_command_with_location() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::Gallery(GalleryMsg::LoadThumbnail("a".into())),
            &mut cmds,
        );

        assert_eq!(cmds.len(), 1);
        match cmds.pop().unwrap() {
            Command::LoadThumbnail { id, location } => {
                assert_eq!(id, "a");
                assert_eq!(location, "/img/smile.png");
            }
            _ => panic!("unexpected command"),
        }
    }

    #[test]
    fn pending_commands_can_track_thumbnail_flow() {
        let tmp = TempDir::new().unwrap();
        let env = asset_env(&tmp);
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::Gallery(GalleryMsg::LoadThumbnail("a".into())),
            &mut cmds,
        );
        model.pending_commands += cmds.len();
        assert_eq!(model.pending_commands, 1);

        // The fixture bytes are not a real PNG, so decoding fails.
        let msg = into_msg(run_command(cmds.pop().unwrap(), &env));
        assert!(matches!(
            msg,
            Msg::Gallery(GalleryMsg::ThumbnailFailed { .. })
        ));
        let mut cmds2 = Vec::new();
        update(&mut model, msg, &mut cmds2);
        model.pending_commands = model.pending_commands.saturating_sub(1);

        assert_eq!(model.pending_commands, 0);
        assert!(model.gallery.has_failed("a"));
    }

    #[test]
    fn decoded_thumbnail_is_handed_back_for_texture_upload() {
        let tmp = TempDir::new().unwrap();
        let env = asset_env(&tmp);
        let png = image::RgbaImage::from_pixel(4, 4, image::Rgba([0, 200, 100, 255]));
        png.save(tmp.path().join("img/real.png")).unwrap();

        let output = run_command(
            Command::LoadThumbnail {
                id: "a".into(),
                location: "/img/real.png".into(),
            },
            &env,
        );

        match output {
            WorkerOutput::Thumbnail { id, image } => {
                assert_eq!(id, "a");
                assert!(image.size[0] > 0);
                assert_eq!(image.size[0], image.size[1]);
            }
            WorkerOutput::Msg(_) => panic!("expected decoded thumbnail"),
        }
    }

    #[test]
    fn downloads_cover_only_records_visible_under_search() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        for id in ["a", "b"] {
            update(
                &mut model,
                Msg::ToggleSelection {
                    id: id.into(),
                    selected: true,
                },
                &mut cmds,
            );
        }
        update(
            &mut model,
            Msg::Search(SearchMsg::TermChanged("wink".into())),
            &mut cmds,
        );

        for scope in [ArchiveScope::All, ArchiveScope::Selected] {
            update(
                &mut model,
                Msg::DownloadRequested {
                    scope,
                    output: PathBuf::from("/tmp/visible.zip"),
                },
                &mut cmds,
            );
            assert_eq!(request_ids(&mut cmds), vec!["b"], "{scope:?}");
            model.download = None;
        }
    }

    #[test]
    fn hidden_selection_does_not_open_the_dialog() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();
        update(
            &mut model,
            Msg::ToggleSelection {
                id: "a".into(),
                selected: true,
            },
            &mut cmds,
        );
        update(
            &mut model,
            Msg::Search(SearchMsg::TermChanged("wink".into())),
            &mut cmds,
        );

        update(
            &mut model,
            Msg::DownloadClicked(ArchiveScope::Selected),
            &mut cmds,
        );
        update(
            &mut model,
            Msg::DownloadRequested {
                scope: ArchiveScope::Selected,
                output: PathBuf::from("/tmp/hidden.zip"),
            },
            &mut cmds,
        );

        assert!(cmds.is_empty());
        assert!(model.awaiting_destination.is_none());
        assert!(model.download.is_none());
        assert!(
            model
                .status
                .as_deref()
                .is_some_and(|s| s.contains("match the current search"))
        );
    }

    #[test]
    fn download_all_is_disabled_when_search_hides_everything() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::Search(SearchMsg::TermChanged("angry".into())),
            &mut cmds,
        );
        update(&mut model, Msg::DownloadClicked(ArchiveScope::All), &mut cmds);

        assert!(!model.can_download_all());
        assert!(cmds.is_empty());
    }

    #[test]
    fn filtered_follows_search_term() {
        let mut model = loaded_model();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::Search(SearchMsg::TermChanged("WIN".into())),
            &mut cmds,
        );

        let ids: Vec<&str> = model.filtered().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }
}
