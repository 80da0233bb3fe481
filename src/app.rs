//! Root application component
//!
//! The App struct implements the Component trait, acting as the root component
//! that delegates event handling and rendering to child components.
//! Refactoring state lives in the `Workflow`; App turns its effects into
//! background requests, tab switches and notices.

use crate::action::Action;
use crate::component::Component;
use crate::components::settings_dialog::ROW_COUNT as SETTINGS_ROWS;
use crate::components::{
    draw_home_screen, CodeViewComponent, HelpDialog, HomeComponent, HomeRenderContext,
    PathDialog, QuitDialog, ResultsComponent, SettingsChange, SettingsDialog, SplashComponent,
    StatsDialog,
};
use crate::config::Config;
use crate::model::modal::{Modal, ModalStack};
use crate::model::notice::Notice;
use crate::model::source::{Language, SourceUnit};
use crate::model::ui::{AppMode, ServerHealth, Tab};
use crate::model::workflow::{Effect, Workflow, WorkflowEvent, WorkflowMode};
use crate::services::api::ApiClient;
use crate::services::files::{is_zip_path, read_source_file, save_archive, save_refactored_code};
use crate::services::request_runner::{RequestMessage, RequestRunner};
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{layout::Rect, Frame};
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

/// Name given to code pasted without a file
const PASTED_NAME: &str = "pasted";

// ═══════════════════════════════════════════════════════════════════════════════
// App Struct
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application state - coordinates between components
pub struct App {
    /// Current application mode
    pub mode: AppMode,

    /// Modal overlay stack
    pub modals: ModalStack,

    /// User configuration, saved when the settings dialog closes
    pub config: Config,

    /// Refactoring state machine
    pub workflow: Workflow,

    /// Background HTTP requests
    pub runner: RequestRunner,

    /// Latest notice shown in the status bar
    pub notice: Option<Notice>,

    /// Result of the startup health check
    pub health: ServerHealth,

    /// Flag to indicate the app should quit
    pub should_quit: bool,

    /// File to open in the external editor on the next loop iteration
    pub pending_editor_file: Option<PathBuf>,

    /// Scratch file backing `pending_editor_file`, removed on drop
    scratch_file: Option<NamedTempFile>,

    // Components
    pub splash: SplashComponent,
    pub home: HomeComponent,
    pub code_view: CodeViewComponent,
    pub results: ResultsComponent,
    pub quit_dialog: QuitDialog,
    pub help_dialog: HelpDialog,
    pub settings_dialog: SettingsDialog,
    pub stats_dialog: StatsDialog,
    pub path_dialog: PathDialog,
}

// ═══════════════════════════════════════════════════════════════════════════════
// App Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    /// Create a new App instance
    pub fn new(config: Config) -> Result<App> {
        let api = ApiClient::new(
            config.effective_base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )?;
        let workflow = Workflow::new(
            config.language,
            config.settings,
            config.animation_speed_ms,
            config.max_jitter_ms,
        );
        info!(base_url = %api.base_url(), "app created");

        Ok(App {
            mode: AppMode::Splash,
            modals: ModalStack::new(),
            config,
            workflow,
            runner: RequestRunner::new(api),
            notice: None,
            health: ServerHealth::Checking,
            should_quit: false,
            pending_editor_file: None,
            scratch_file: None,
            splash: SplashComponent::new(),
            home: HomeComponent::new(),
            code_view: CodeViewComponent::new(),
            results: ResultsComponent::default(),
            quit_dialog: QuitDialog,
            help_dialog: HelpDialog::default(),
            settings_dialog: SettingsDialog,
            stats_dialog: StatsDialog::default(),
            path_dialog: PathDialog,
        })
    }

    /// Show a notice in the status bar
    pub fn notify(&mut self, notice: Notice) {
        if notice.is_error() {
            warn!(title = %notice.title, description = %notice.description, "notice");
        } else {
            info!(title = %notice.title, description = %notice.description, "notice");
        }
        self.notice = Some(notice);
    }

    fn dispatch(&mut self, event: WorkflowEvent) {
        let effects = self.workflow.dispatch(event, Instant::now());
        self.execute_effects(effects);
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::RefactorSingle { run, request } => self.runner.spawn_refactor(run, request),
                Effect::UploadZip { run, path } => self.runner.spawn_upload_zip(run, path),
                Effect::RefactorZip { run, files } => self.runner.spawn_refactor_zip(run, files),
                Effect::FetchArchive { run, files } => self.runner.spawn_fetch_archive(run, files),
                Effect::CancelRequests => {
                    self.runner.cancel_all();
                    // The health reply went down with the old channel
                    if self.health == ServerHealth::Checking {
                        self.runner.spawn_health();
                    }
                }
                Effect::ShowTab(tab) => {
                    self.home.active_tab = tab;
                    self.code_view.reset();
                }
                Effect::Notify(notice) => self.notify(notice),
            }
        }
    }

    /// Drain finished requests and advance the animation
    fn on_tick(&mut self) {
        for message in self.runner.poll() {
            match message {
                RequestMessage::Stats(result) => {
                    self.stats_dialog
                        .set_result(result.map_err(|e| e.to_string()));
                }
                RequestMessage::Health(result) => {
                    self.health = match result {
                        Ok(_) => ServerHealth::Online,
                        Err(e) => {
                            warn!(error = %e, "health check failed");
                            ServerHealth::Offline
                        }
                    };
                }
                message => {
                    if let Some(event) = message.into_event() {
                        self.dispatch(event);
                    }
                }
            }
        }

        let effects = self.workflow.tick(Instant::now());
        self.execute_effects(effects);

        if self.home.ensure_enabled(&self.workflow) {
            self.code_view.reset();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Source loading
    // ─────────────────────────────────────────────────────────────────────────

    /// Load a source file or upload a zip archive
    fn load_path(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.notify(Notice::warning("No path given", "Type a file or .zip path."));
            return;
        }
        let path = expand_home(trimmed);

        if is_zip_path(&path) {
            if !path.is_file() {
                self.notify(Notice::error(
                    "File not found",
                    path.display().to_string(),
                ));
                return;
            }
            self.dispatch(WorkflowEvent::UploadZip { path });
            return;
        }

        match read_source_file(&path) {
            Ok(content) => {
                let language =
                    Language::from_path(&path).or_else(|| Language::detect_from_content(&content));
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| trimmed.to_string());
                self.dispatch(WorkflowEvent::SourceLoaded {
                    unit: SourceUnit::new(name, content),
                    language,
                });
                self.home.active_tab = Tab::Input;
                self.code_view.reset();
            }
            Err(e) => self.notify(Notice::error("Could not open file", e.to_string())),
        }
    }

    /// Prepare a scratch file for the external editor
    fn open_editor(&mut self) -> Result<()> {
        let mut file = tempfile::Builder::new()
            .prefix("refactor-tui-")
            .suffix(&format!(".{}", self.workflow.language().extension()))
            .tempfile()?;
        if let Some(source) = self.workflow.source() {
            file.write_all(source.content.as_bytes())?;
            file.flush()?;
        }
        debug!(path = %file.path().display(), "opening editor");
        self.pending_editor_file = Some(file.path().to_path_buf());
        self.scratch_file = Some(file);
        Ok(())
    }

    /// Pick up whatever was written in the editor
    fn editor_closed(&mut self) {
        let Some(file) = self.scratch_file.take() else {
            return;
        };

        let content = match read_source_file(file.path()) {
            Ok(content) => content,
            Err(e) => {
                self.notify(Notice::warning("Nothing pasted", e.to_string()));
                return;
            }
        };

        if self.workflow.source().is_some_and(|s| s.content == content) {
            return;
        }

        let name = self
            .workflow
            .source()
            .map(|s| s.name.clone())
            .unwrap_or_else(|| PASTED_NAME.to_string());
        let language = Language::detect_from_content(&content);
        self.dispatch(WorkflowEvent::SourceLoaded {
            unit: SourceUnit::new(name, content),
            language,
        });
        self.home.active_tab = Tab::Input;
        self.code_view.reset();
    }

    /// Pasted text goes into the path prompt when it is open, else becomes the source
    fn paste(&mut self, text: String) {
        if let Some(input) = self.modals.path_input_mut() {
            input.push_str(text.trim());
            return;
        }
        if self.mode != AppMode::Running || !self.modals.is_empty() {
            return;
        }
        if text.trim().is_empty() {
            return;
        }
        let language = Language::detect_from_content(&text);
        self.dispatch(WorkflowEvent::SourceLoaded {
            unit: SourceUnit::new(PASTED_NAME, text),
            language,
        });
        self.home.active_tab = Tab::Input;
        self.code_view.reset();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Download
    // ─────────────────────────────────────────────────────────────────────────

    fn download(&mut self) {
        let dir = self.config.output_dir.clone();

        let notice = if self.workflow.mode().is_zip() {
            match (self.workflow.archive(), self.workflow.archive_error()) {
                (Some(archive), _) if self.workflow.download_all_available() => {
                    match save_archive(&dir, archive) {
                        Ok(path) => Notice::success("Download complete", format!("Saved {}", path.display())),
                        Err(e) => Notice::error("Download failed", e.to_string()),
                    }
                }
                (None, Some(reason)) if self.workflow.is_zip_done() => Notice::error(
                    "Project archive unavailable",
                    format!("The server could not build the archive: {}", reason),
                ),
                _ => Notice::warning(
                    "Not ready yet",
                    "The project archive is still being prepared.",
                ),
            }
        } else {
            match self.workflow.result() {
                Some(result) if self.workflow.mode() == WorkflowMode::SingleDone => {
                    match save_refactored_code(&dir, self.workflow.language(), &result.refactored_code) {
                        Ok(path) => Notice::success("Download complete", format!("Saved {}", path.display())),
                        Err(e) => Notice::error("Download failed", e.to_string()),
                    }
                }
                _ => Notice::warning("Nothing to download", "Please refactor some code first."),
            }
        };

        self.notify(notice);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    fn open_settings(&mut self) {
        self.config.language = self.workflow.language();
        self.config.animation_speed_ms = self.workflow.speed_ms();
        self.config.settings = self.workflow.settings();
        self.modals.open(Modal::Settings { selected_index: 0 });
    }

    fn toggle_setting(&mut self, index: usize) {
        let Some(change) = SettingsDialog::toggle(&mut self.config, index) else {
            return;
        };
        let event = match change {
            SettingsChange::Language => WorkflowEvent::SetLanguage(self.config.language),
            SettingsChange::Speed => WorkflowEvent::SetSpeed(self.config.animation_speed_ms),
            SettingsChange::Options => WorkflowEvent::SetSettings(self.config.settings),
        };
        self.dispatch(event);
    }

    fn save_config(&mut self) {
        match self.config.save() {
            Ok(()) => info!("config saved"),
            Err(e) => {
                warn!(error = %e, "failed to save config");
                self.notify(Notice::warning("Settings not saved", e.to_string()));
            }
        }
    }
}

/// Expand a leading `~/` to `$HOME`
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var("HOME")) {
        (Some(rest), Ok(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Component Implementation
// ═══════════════════════════════════════════════════════════════════════════════

impl Component for App {
    fn init(&mut self) -> Result<()> {
        self.splash.init()?;
        self.runner.spawn_health();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.mode {
            AppMode::Splash => self.splash.handle_key_event(key),
            AppMode::Running => {
                if let Some(modal) = self.modals.top().cloned() {
                    self.handle_modal_key_event(&modal, key)
                } else {
                    self.home.handle_key_event(key)
                }
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.mode != AppMode::Running || !self.modals.is_empty() {
            return Ok(None);
        }
        let action = match mouse.kind {
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            // ─────────────────────────────────────────────────────────────────
            // App Lifecycle
            // ─────────────────────────────────────────────────────────────────
            Action::Tick => {
                if self.mode == AppMode::Splash && self.splash.is_complete() {
                    return Ok(Some(Action::SplashComplete));
                }
                self.on_tick();
            }
            Action::SplashComplete => {
                self.mode = AppMode::Running;
            }
            Action::ForceQuit => {
                self.runner.cancel_all();
                self.should_quit = true;
            }
            Action::Resize(_, _) => {}

            // ─────────────────────────────────────────────────────────────────
            // Navigation (delegate to HomeComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::NextTab => {
                if self.home.next_tab(&self.workflow) {
                    self.code_view.reset();
                }
            }
            Action::PrevTab => {
                if self.home.previous_tab(&self.workflow) {
                    self.code_view.reset();
                }
            }
            Action::SelectTab(tab) => {
                if self.home.select_tab(tab, &self.workflow) {
                    self.code_view.reset();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Scrolling (delegate to CodeViewComponent)
            // ─────────────────────────────────────────────────────────────────
            Action::ScrollUp | Action::ScrollDown | Action::PageUp | Action::PageDown => {
                self.code_view.update(action)?;
            }

            // ─────────────────────────────────────────────────────────────────
            // Modals
            // ─────────────────────────────────────────────────────────────────
            Action::OpenQuitDialog => {
                self.modals.open(Modal::QuitConfirm);
            }
            Action::OpenHelp => {
                self.help_dialog.scroll_offset = 0;
                self.modals.open(Modal::Help { scroll_offset: 0 });
            }
            Action::OpenSettings => self.open_settings(),
            Action::OpenStats => {
                self.stats_dialog.begin_loading();
                self.runner.spawn_stats();
                self.modals.open(Modal::Stats);
            }
            Action::OpenPathPrompt => {
                self.modals.open(Modal::OpenPath {
                    input: String::new(),
                });
            }
            Action::CloseModal => {
                if let Some(Modal::Settings { .. }) = self.modals.pop() {
                    self.save_config();
                }
            }
            Action::ConfirmModal => {
                if let Some(Modal::OpenPath { input }) = self.modals.top().cloned() {
                    self.modals.pop();
                    return Ok(Some(Action::LoadPath(input)));
                }
            }
            Action::ModalUp => {
                if let Some(row) = self.modals.settings_row_mut() {
                    *row = (*row + SETTINGS_ROWS - 1) % SETTINGS_ROWS;
                }
            }
            Action::ModalDown => {
                if let Some(row) = self.modals.settings_row_mut() {
                    *row = (*row + 1) % SETTINGS_ROWS;
                }
            }
            Action::ModalToggle => {
                if let Some(index) = self.modals.settings_row_mut().map(|row| *row) {
                    self.toggle_setting(index);
                }
            }
            Action::PathInput(c) => {
                if let Some(input) = self.modals.path_input_mut() {
                    input.push(c);
                }
            }
            Action::PathBackspace => {
                if let Some(input) = self.modals.path_input_mut() {
                    input.pop();
                }
            }

            // ─────────────────────────────────────────────────────────────────
            // Source
            // ─────────────────────────────────────────────────────────────────
            Action::LoadPath(path) => self.load_path(&path),
            Action::OpenEditor => {
                if let Err(e) = self.open_editor() {
                    self.notify(Notice::error("Could not open editor", e.to_string()));
                }
            }
            Action::EditorClosed => self.editor_closed(),
            Action::Paste(text) => self.paste(text),

            // ─────────────────────────────────────────────────────────────────
            // Refactoring
            // ─────────────────────────────────────────────────────────────────
            Action::StartRefactor => self.dispatch(WorkflowEvent::Start),
            Action::Reset => {
                self.dispatch(WorkflowEvent::Reset);
                self.results.update(action)?;
                self.home.active_tab = Tab::Input;
                self.code_view.reset();
            }
            Action::Download => self.download(),

            // ─────────────────────────────────────────────────────────────────
            // Animation
            // ─────────────────────────────────────────────────────────────────
            Action::TogglePause => self.dispatch(WorkflowEvent::TogglePause),
            Action::RestartAnimation => {
                self.dispatch(WorkflowEvent::RestartAnimation);
                self.code_view.update(action)?;
            }
            Action::SpeedUp => {
                self.dispatch(WorkflowEvent::SpeedUp);
                self.config.animation_speed_ms = self.workflow.speed_ms();
            }
            Action::SpeedDown => {
                self.dispatch(WorkflowEvent::SpeedDown);
                self.config.animation_speed_ms = self.workflow.speed_ms();
            }
            Action::NextFile => {
                self.dispatch(WorkflowEvent::StepForward);
                self.code_view.update(action)?;
            }
            Action::PrevFile => {
                self.dispatch(WorkflowEvent::StepBackward);
                self.code_view.update(action)?;
            }
        }

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        match self.mode {
            AppMode::Splash => self.splash.draw(frame, area)?,
            AppMode::Running => {
                // Build render context
                let ctx = HomeRenderContext {
                    workflow: &self.workflow,
                    notice: self.notice.as_ref(),
                    health: self.health,
                    base_url: self.runner.api().base_url(),
                    now: Instant::now(),
                };

                draw_home_screen(
                    frame,
                    area,
                    &self.home,
                    &mut self.code_view,
                    &mut self.results,
                    &ctx,
                )?;

                // Draw modal overlay if active
                if let Some(modal) = self.modals.top().cloned() {
                    self.draw_modal(frame, area, &modal)?;
                }
            }
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Helper Methods
// ═══════════════════════════════════════════════════════════════════════════════

impl App {
    fn handle_modal_key_event(&mut self, modal: &Modal, key: KeyEvent) -> Result<Option<Action>> {
        match modal {
            Modal::QuitConfirm => self.quit_dialog.handle_key_event(key),
            Modal::Help { .. } => self.help_dialog.handle_key_event(key),
            Modal::Settings { .. } => self.settings_dialog.handle_key_event(key),
            Modal::Stats => self.stats_dialog.handle_key_event(key),
            Modal::OpenPath { .. } => self.path_dialog.handle_key_event(key),
        }
    }

    fn draw_modal(&mut self, frame: &mut Frame, area: Rect, modal: &Modal) -> Result<()> {
        match modal {
            Modal::QuitConfirm => {
                self.quit_dialog
                    .draw_with_in_flight(frame, area, self.runner.in_flight());
            }
            Modal::Help { .. } => self.help_dialog.draw(frame, area)?,
            Modal::Settings { selected_index } => {
                self.settings_dialog
                    .draw_with_config(frame, area, &self.config, *selected_index)?;
            }
            Modal::Stats => self.stats_dialog.draw_with_state(frame, area)?,
            Modal::OpenPath { input } => {
                self.path_dialog.draw_with_input(frame, area, input)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_util::render_to_text;
    use crate::model::notice::NoticeLevel;
    use crate::services::files::ARCHIVE_FILE_NAME;
    use serde_json::json;
    use std::fs;
    use std::path::Path;
    use std::thread;

    fn test_config(base_url: &str, output_dir: PathBuf) -> Config {
        Config {
            api_base_url: base_url.to_string(),
            animation_speed_ms: 1,
            max_jitter_ms: 0,
            request_timeout_secs: 5,
            output_dir,
            ..Config::default()
        }
    }

    fn running_app(config: Config) -> App {
        let mut app = App::new(config).unwrap();
        app.update(Action::SplashComplete).unwrap();
        app
    }

    fn notice_level(app: &App) -> Option<NoticeLevel> {
        app.notice.as_ref().map(|n| n.level)
    }

    /// Tick until `done` holds or five seconds pass
    fn tick_until(app: &mut App, done: impl Fn(&App) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !done(app) && Instant::now() < deadline {
            app.update(Action::Tick).unwrap();
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_start_without_code_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = running_app(test_config("http://127.0.0.1:9", dir.path().to_path_buf()));

        app.update(Action::StartRefactor).unwrap();

        assert_eq!(app.workflow.mode(), WorkflowMode::Idle);
        assert_eq!(notice_level(&app), Some(NoticeLevel::Error));
        assert_eq!(app.runner.in_flight(), 0);
    }

    #[test]
    fn test_path_prompt_loads_file_with_detected_language() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("widget.tsx");
        fs::write(&file, "export const Widget = () => <div />;\n").unwrap();
        let mut app = running_app(test_config("http://127.0.0.1:9", dir.path().to_path_buf()));

        app.update(Action::OpenPathPrompt).unwrap();
        for c in file.display().to_string().chars() {
            app.update(Action::PathInput(c)).unwrap();
        }
        app.update(Action::PathInput('x')).unwrap();
        app.update(Action::PathBackspace).unwrap();
        let follow_up = app.update(Action::ConfirmModal).unwrap();
        assert!(app.modals.is_empty());
        app.update(follow_up.unwrap()).unwrap();

        let source = app.workflow.source().unwrap();
        assert_eq!(source.name, "widget.tsx");
        assert_eq!(app.workflow.language(), Language::React);
        assert_eq!(app.home.active_tab, Tab::Input);
    }

    #[test]
    fn test_paste_becomes_source_or_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = running_app(test_config("http://127.0.0.1:9", dir.path().to_path_buf()));

        app.update(Action::Paste("{\"name\": \"demo\"}".to_string()))
            .unwrap();
        assert_eq!(app.workflow.source().unwrap().name, PASTED_NAME);
        assert_eq!(app.workflow.language(), Language::Json);

        app.update(Action::OpenPathPrompt).unwrap();
        app.update(Action::Paste(" /tmp/app.js\n".to_string())).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::OpenPath {
                input: "/tmp/app.js".to_string()
            })
        );
    }

    #[test]
    fn test_missing_zip_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = running_app(test_config("http://127.0.0.1:9", dir.path().to_path_buf()));

        app.update(Action::LoadPath(
            dir.path().join("missing.zip").display().to_string(),
        ))
        .unwrap();

        assert!(!app.workflow.is_uploading());
        assert_eq!(notice_level(&app), Some(NoticeLevel::Error));
    }

    #[test]
    fn test_settings_changes_reach_workflow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = running_app(test_config("http://127.0.0.1:9", dir.path().to_path_buf()));

        app.update(Action::OpenSettings).unwrap();
        app.update(Action::ModalToggle).unwrap();
        assert_eq!(app.workflow.language(), Language::React);

        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalToggle).unwrap();
        assert_eq!(app.workflow.speed_ms(), 10);

        app.update(Action::ModalDown).unwrap();
        app.update(Action::ModalToggle).unwrap();
        assert!(!app.workflow.settings().use_airbnb_style);

        app.update(Action::ModalUp).unwrap();
        app.update(Action::ModalUp).unwrap();
        app.update(Action::ModalUp).unwrap();
        assert_eq!(
            app.modals.top(),
            Some(&Modal::Settings {
                selected_index: SETTINGS_ROWS - 1
            })
        );
    }

    #[test]
    fn test_download_without_result_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = running_app(test_config("http://127.0.0.1:9", dir.path().to_path_buf()));

        app.update(Action::Download).unwrap();

        assert_eq!(notice_level(&app), Some(NoticeLevel::Warning));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_single_refactor_end_to_end() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/refactor")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "success": true,
                    "data": {
                        "refactoredCode": "const x = 1;",
                        "metrics": {"originalLines": 1, "refactoredLines": 1, "linesReduced": 0, "qualityScore": 4}
                    }
                })
                .to_string(),
            )
            .create();
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("input.js");
        fs::write(&source, "var x = 1;\n").unwrap();
        let out = dir.path().join("out");
        let mut app = running_app(test_config(&server.url(), out.clone()));

        app.update(Action::LoadPath(source.display().to_string())).unwrap();
        app.update(Action::StartRefactor).unwrap();
        assert_eq!(app.home.active_tab, Tab::Generation);

        tick_until(&mut app, |app| app.workflow.mode() == WorkflowMode::SingleDone);
        mock.assert();
        assert_eq!(app.workflow.mode(), WorkflowMode::SingleDone);

        app.update(Action::SelectTab(Tab::Results)).unwrap();
        assert_eq!(app.home.active_tab, Tab::Results);
        let text = render_to_text(120, 30, |frame| app.draw(frame, frame.area()).unwrap());
        assert!(text.contains("+const x = 1;"));

        app.update(Action::Download).unwrap();
        assert_eq!(
            fs::read_to_string(out.join("refactored_code.js")).unwrap(),
            "const x = 1;"
        );

        app.update(Action::Reset).unwrap();
        assert_eq!(app.home.active_tab, Tab::Input);
        assert!(app.workflow.source().is_none());
    }

    /// Serve the upload and animated refactor endpoints for `a.js` and `b.jsx`
    fn mock_zip_endpoints(server: &mut mockito::Server) {
        server
            .mock("POST", "/refactor/upload-zip")
            .with_status(200)
            .with_body(
                json!({
                    "success": true,
                    "files": [
                        {"name": "a.js", "content": "var a = 1;", "path": "src/a.js"},
                        {"name": "b.jsx", "content": "var B = () => <b/>;", "path": "src/b.jsx"}
                    ]
                })
                .to_string(),
            )
            .create();
        server
            .mock("POST", "/refactor/refactor-zip-animated")
            .with_status(200)
            .with_body(
                json!({
                    "success": true,
                    "files": [
                        {"name": "a.js", "refactoredCode": "const a = 1;"},
                        {"name": "b.jsx", "refactoredCode": "const B = () => <b />;"}
                    ]
                })
                .to_string(),
            )
            .create();
    }

    /// Load `project.zip`, refactor it and step to the last file
    fn run_zip_to_completion(app: &mut App, zip: &Path) {
        app.update(Action::LoadPath(zip.display().to_string())).unwrap();
        tick_until(app, |app| app.workflow.zip_files().len() == 2);
        assert_eq!(app.workflow.zip_files().len(), 2);

        app.update(Action::StartRefactor).unwrap();
        assert_eq!(app.home.active_tab, Tab::Generation);
        tick_until(app, |app| app.workflow.mode() == WorkflowMode::ZipAnimating);
        assert_eq!(app.workflow.mode(), WorkflowMode::ZipAnimating);

        // Stepping past the end stays on the last file
        app.update(Action::NextFile).unwrap();
        app.update(Action::NextFile).unwrap();
        assert_eq!(app.workflow.cursor(), 1);

        tick_until(app, |app| app.workflow.mode() == WorkflowMode::ZipDone);
        assert_eq!(app.workflow.mode(), WorkflowMode::ZipDone);
    }

    #[test]
    fn test_zip_refactor_end_to_end() {
        let mut server = mockito::Server::new();
        mock_zip_endpoints(&mut server);
        let archive_mock = server
            .mock("POST", "/refactor/refactor-zip")
            .with_status(200)
            .with_body(b"PK\x03\x04project")
            .create();
        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("project.zip");
        fs::write(&zip, b"PK\x03\x04").unwrap();
        let out = dir.path().join("out");
        let mut app = running_app(test_config(&server.url(), out.clone()));

        run_zip_to_completion(&mut app, &zip);
        tick_until(&mut app, |app| app.workflow.download_all_available());
        archive_mock.assert();
        assert!(app.workflow.download_all_available());

        let text = render_to_text(120, 30, |frame| app.draw(frame, frame.area()).unwrap());
        assert!(text.contains("b.jsx (2 / 2)"));

        app.update(Action::Download).unwrap();
        assert_eq!(notice_level(&app), Some(NoticeLevel::Success));
        assert_eq!(
            fs::read(out.join(ARCHIVE_FILE_NAME)).unwrap(),
            b"PK\x03\x04project"
        );
    }

    #[test]
    fn test_zip_download_reports_failed_archive() {
        let mut server = mockito::Server::new();
        mock_zip_endpoints(&mut server);
        server
            .mock("POST", "/refactor/refactor-zip")
            .with_status(502)
            .with_body("Bad Gateway")
            .create();
        let dir = tempfile::tempdir().unwrap();
        let zip = dir.path().join("project.zip");
        fs::write(&zip, b"PK\x03\x04").unwrap();
        let mut app = running_app(test_config(&server.url(), dir.path().join("out")));

        run_zip_to_completion(&mut app, &zip);
        tick_until(&mut app, |app| app.workflow.archive_error().is_some());
        assert!(app.workflow.archive_error().is_some());

        app.update(Action::Download).unwrap();
        let notice = app.notice.as_ref().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.title, "Project archive unavailable");
    }

    #[test]
    fn test_failed_refactor_returns_to_input() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/refactor")
            .with_status(500)
            .with_body("boom")
            .create();
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("input.js");
        fs::write(&source, "var x = 1;\n").unwrap();
        let mut app = running_app(test_config(&server.url(), dir.path().to_path_buf()));

        app.update(Action::LoadPath(source.display().to_string())).unwrap();
        app.update(Action::StartRefactor).unwrap();
        tick_until(&mut app, |app| app.runner.in_flight() == 0);

        assert_eq!(app.workflow.mode(), WorkflowMode::Idle);
        assert_eq!(app.home.active_tab, Tab::Input);
        assert!(app.workflow.source().is_some());
        assert_eq!(notice_level(&app), Some(NoticeLevel::Error));
    }
}
