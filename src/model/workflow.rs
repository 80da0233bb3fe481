//! Refactor workflow state machine
//!
//! One typed state struct, mutated only through [`Workflow::dispatch`] and
//! [`Workflow::tick`]. Neither performs I/O: they return [`Effect`]s that the
//! app carries out (spawning requests, switching tabs, showing notices).
//!
//! Every request is tagged with the [`RunId`] that issued it. A new upload,
//! a reset or a new start bumps the run, so late replies from an abandoned
//! run are recognised and dropped.

use super::animation::{AnimatorEvent, TypingAnimator};
use super::archive::ArchiveHandle;
use super::notice::Notice;
use super::progress::ZipProgressTicker;
use super::refactor::{RefactorRequest, RefactorResult, RefactorSettings, ZipFileResult};
use super::source::{ExtractedFile, Language, SourceUnit};
use super::ui::Tab;
use crate::error::RefactorError;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Identifies one upload/refactor run
pub type RunId = u64;

/// Which stage of the workflow is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowMode {
    #[default]
    Idle,
    SingleAnimating,
    SingleDone,
    ZipProgress,
    ZipAnimating,
    ZipDone,
}

impl WorkflowMode {
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowMode::Idle => "Idle",
            WorkflowMode::SingleAnimating => "Generating",
            WorkflowMode::SingleDone => "Done",
            WorkflowMode::ZipProgress => "Refactoring project",
            WorkflowMode::ZipAnimating => "Reviewing files",
            WorkflowMode::ZipDone => "Project done",
        }
    }

    pub fn is_zip(&self) -> bool {
        matches!(
            self,
            WorkflowMode::ZipProgress | WorkflowMode::ZipAnimating | WorkflowMode::ZipDone
        )
    }
}

/// Inputs to the state machine
#[derive(Debug)]
pub enum WorkflowEvent {
    /// A single file was read from disk or pasted through the editor
    SourceLoaded {
        unit: SourceUnit,
        language: Option<Language>,
    },
    /// A zip archive was chosen for upload
    UploadZip { path: PathBuf },
    ZipExtracted {
        run: RunId,
        files: Vec<ExtractedFile>,
    },
    UploadFailed {
        run: RunId,
        error: RefactorError,
    },
    /// "Start refactoring"
    Start,
    SingleSucceeded {
        run: RunId,
        result: RefactorResult,
    },
    SingleFailed {
        run: RunId,
        error: RefactorError,
    },
    ZipSucceeded {
        run: RunId,
        files: Vec<ZipFileResult>,
    },
    ZipFailed {
        run: RunId,
        error: RefactorError,
    },
    ArchiveReady {
        run: RunId,
        archive: ArchiveHandle,
    },
    ArchiveFailed {
        run: RunId,
        error: RefactorError,
    },
    StepForward,
    StepBackward,
    SelectUnit(usize),
    TogglePause,
    RestartAnimation,
    SpeedUp,
    SpeedDown,
    SetSpeed(u64),
    SetLanguage(Language),
    SetSettings(RefactorSettings),
    /// Discard everything and return to an empty idle state
    Reset,
}

/// Work the app must carry out on behalf of the state machine
#[derive(Debug, Clone)]
pub enum Effect {
    RefactorSingle {
        run: RunId,
        request: RefactorRequest,
    },
    UploadZip {
        run: RunId,
        path: PathBuf,
    },
    RefactorZip {
        run: RunId,
        files: Vec<SourceUnit>,
    },
    FetchArchive {
        run: RunId,
        files: Vec<SourceUnit>,
    },
    /// Drop every reply still in flight
    CancelRequests,
    ShowTab(Tab),
    Notify(Notice),
}

/// Refactor workflow state
#[derive(Debug)]
pub struct Workflow {
    mode: WorkflowMode,
    run: RunId,
    language: Language,
    settings: RefactorSettings,
    speed_ms: u64,
    max_jitter_ms: u64,

    source: Option<SourceUnit>,
    zip_files: Vec<ExtractedFile>,
    uploading: bool,
    zip_summary: Option<String>,
    last_error: Option<String>,

    result: Option<RefactorResult>,
    zip_results: Vec<ZipFileResult>,
    cursor: usize,
    zip_done: bool,

    animator: Option<TypingAnimator>,
    progress: Option<ZipProgressTicker>,
    archive: Option<ArchiveHandle>,
    /// Why the archive request of the current run failed
    archive_error: Option<String>,
}

impl Workflow {
    pub fn new(
        language: Language,
        settings: RefactorSettings,
        speed_ms: u64,
        max_jitter_ms: u64,
    ) -> Self {
        Self {
            mode: WorkflowMode::Idle,
            run: 0,
            language,
            settings,
            speed_ms,
            max_jitter_ms,
            source: None,
            zip_files: Vec::new(),
            uploading: false,
            zip_summary: None,
            last_error: None,
            result: None,
            zip_results: Vec::new(),
            cursor: 0,
            zip_done: false,
            animator: None,
            progress: None,
            archive: None,
            archive_error: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatcher
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply one event and return the effects it requires
    pub fn dispatch(&mut self, event: WorkflowEvent, now: Instant) -> Vec<Effect> {
        match event {
            WorkflowEvent::SourceLoaded { unit, language } => self.load_source(unit, language),
            WorkflowEvent::UploadZip { path } => self.upload_zip(path),
            WorkflowEvent::ZipExtracted { run, files } => self.zip_extracted(run, files),
            WorkflowEvent::UploadFailed { run, error } => self.upload_failed(run, error),
            WorkflowEvent::Start => self.start(now),
            WorkflowEvent::SingleSucceeded { run, result } => {
                self.single_succeeded(run, result, now)
            }
            WorkflowEvent::SingleFailed { run, error } => self.single_failed(run, error),
            WorkflowEvent::ZipSucceeded { run, files } => self.zip_succeeded(run, files, now),
            WorkflowEvent::ZipFailed { run, error } => self.zip_failed(run, error),
            WorkflowEvent::ArchiveReady { run, archive } => self.archive_ready(run, archive),
            WorkflowEvent::ArchiveFailed { run, error } => self.archive_failed(run, error),
            WorkflowEvent::StepForward => self.select_unit(self.cursor.saturating_add(1), now),
            WorkflowEvent::StepBackward => self.select_unit(self.cursor.saturating_sub(1), now),
            WorkflowEvent::SelectUnit(index) => self.select_unit(index, now),
            WorkflowEvent::TogglePause => {
                if let Some(animator) = self.animator.as_mut() {
                    animator.toggle_pause(now);
                }
                Vec::new()
            }
            WorkflowEvent::RestartAnimation => {
                if let Some(animator) = self.animator.as_mut() {
                    animator.restart(now);
                }
                Vec::new()
            }
            WorkflowEvent::SpeedUp => {
                if let Some(animator) = self.animator.as_mut() {
                    animator.speed_up();
                    self.speed_ms = animator.speed_ms();
                }
                Vec::new()
            }
            WorkflowEvent::SpeedDown => {
                if let Some(animator) = self.animator.as_mut() {
                    animator.slow_down();
                    self.speed_ms = animator.speed_ms();
                }
                Vec::new()
            }
            WorkflowEvent::SetSpeed(speed_ms) => {
                self.speed_ms = speed_ms;
                if let Some(animator) = self.animator.as_mut() {
                    animator.set_speed_ms(speed_ms);
                }
                Vec::new()
            }
            WorkflowEvent::SetLanguage(language) => {
                self.language = language;
                Vec::new()
            }
            WorkflowEvent::SetSettings(settings) => {
                self.settings = settings;
                Vec::new()
            }
            WorkflowEvent::Reset => {
                self.reset();
                self.source = None;
                self.zip_files.clear();
                vec![Effect::CancelRequests]
            }
        }
    }

    /// Advance the cosmetic ticker and the animator to `now`
    pub fn tick(&mut self, now: Instant) -> Vec<Effect> {
        if let Some(progress) = self.progress.as_mut() {
            progress.tick(now);
        }

        let completed = self
            .animator
            .as_mut()
            .and_then(|a| a.advance(now))
            .is_some_and(|e| e == AnimatorEvent::Completed);

        if completed {
            self.animation_completed()
        } else {
            Vec::new()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Drop every derived field and start a fresh run
    fn reset(&mut self) {
        self.run += 1;
        self.mode = WorkflowMode::Idle;
        self.uploading = false;
        self.zip_summary = None;
        self.last_error = None;
        self.result = None;
        self.zip_results.clear();
        self.cursor = 0;
        self.zip_done = false;
        self.animator = None;
        self.progress = None;
        self.archive = None;
        self.archive_error = None;
        debug!(run = self.run, "workflow reset");
    }

    fn load_source(&mut self, unit: SourceUnit, language: Option<Language>) -> Vec<Effect> {
        self.reset();
        self.zip_files.clear();
        if let Some(language) = language {
            self.language = language;
        }
        let notice = Notice::info(
            "File loaded",
            format!("Loaded {} ({} characters)", unit.name, unit.content.chars().count()),
        );
        info!(name = %unit.name, language = self.language.as_str(), "source loaded");
        self.source = Some(unit);
        vec![Effect::CancelRequests, Effect::Notify(notice)]
    }

    fn upload_zip(&mut self, path: PathBuf) -> Vec<Effect> {
        self.reset();
        self.source = None;
        self.zip_files.clear();
        self.uploading = true;
        info!(path = %path.display(), run = self.run, "uploading zip");
        vec![
            Effect::CancelRequests,
            Effect::UploadZip {
                run: self.run,
                path,
            },
            Effect::Notify(Notice::info(
                "Uploading zip file...",
                "Extracting files. This may take a moment.",
            )),
        ]
    }

    fn zip_extracted(&mut self, run: RunId, files: Vec<ExtractedFile>) -> Vec<Effect> {
        if run != self.run {
            debug!(run, current = self.run, "dropping stale zip extraction");
            return Vec::new();
        }
        self.uploading = false;

        if files.is_empty() {
            return vec![Effect::Notify(Notice::warning(
                "Zip extracted",
                "No code files were found in the archive.",
            ))];
        }

        let count = files.len();
        self.zip_files = files;
        self.zip_summary = Some(format!(
            "Found {} code files in the zip. Review and press s to start refactoring.",
            count
        ));
        info!(count, "zip extracted");
        vec![Effect::Notify(Notice::success(
            "Zip extracted!",
            format!("Found {} code files.", count),
        ))]
    }

    fn upload_failed(&mut self, run: RunId, error: RefactorError) -> Vec<Effect> {
        if run != self.run {
            return Vec::new();
        }
        self.uploading = false;
        warn!(%error, "zip upload failed");
        let message = error.to_string();
        self.last_error = Some(message.clone());
        vec![Effect::Notify(Notice::error("Zip upload failed", message))]
    }

    fn start(&mut self, now: Instant) -> Vec<Effect> {
        if self.mode != WorkflowMode::Idle {
            return Vec::new();
        }

        if !self.zip_files.is_empty() {
            return self.start_zip(now);
        }

        match &self.source {
            Some(unit) if !unit.is_blank() => {
                let request = RefactorRequest {
                    code: unit.content.clone(),
                    language: self.language,
                    settings: Some(self.settings),
                };
                self.run += 1;
                self.mode = WorkflowMode::SingleAnimating;
                self.result = None;
                self.animator = None;
                self.last_error = None;
                info!(run = self.run, language = self.language.as_str(), "starting single refactor");
                vec![
                    Effect::ShowTab(Tab::Generation),
                    Effect::RefactorSingle {
                        run: self.run,
                        request,
                    },
                ]
            }
            _ => vec![Effect::Notify(Notice::error(
                "No code to refactor",
                "Please enter or upload some code first.",
            ))],
        }
    }

    fn start_zip(&mut self, now: Instant) -> Vec<Effect> {
        self.run += 1;
        self.mode = WorkflowMode::ZipProgress;
        self.progress = Some(ZipProgressTicker::new(now));
        self.zip_results.clear();
        self.cursor = 0;
        self.zip_done = false;
        self.animator = None;
        self.archive = None;
        self.archive_error = None;
        self.zip_summary = None;
        self.last_error = None;
        info!(run = self.run, files = self.zip_files.len(), "starting zip refactor");
        vec![
            Effect::ShowTab(Tab::Generation),
            Effect::RefactorZip {
                run: self.run,
                files: self.units(),
            },
        ]
    }

    fn single_succeeded(&mut self, run: RunId, result: RefactorResult, now: Instant) -> Vec<Effect> {
        if run != self.run || self.mode != WorkflowMode::SingleAnimating {
            debug!(run, current = self.run, "dropping stale refactor result");
            return Vec::new();
        }
        self.animator = Some(self.new_animator(&result.refactored_code, now));
        self.result = Some(result);
        Vec::new()
    }

    fn single_failed(&mut self, run: RunId, error: RefactorError) -> Vec<Effect> {
        if run != self.run || self.mode != WorkflowMode::SingleAnimating {
            return Vec::new();
        }
        warn!(%error, "single refactor failed");
        self.mode = WorkflowMode::Idle;
        self.animator = None;
        self.result = None;
        let message = error.to_string();
        self.last_error = Some(message.clone());
        vec![
            Effect::ShowTab(Tab::Input),
            Effect::Notify(Notice::error("Refactoring failed", message)),
        ]
    }

    fn zip_succeeded(&mut self, run: RunId, files: Vec<ZipFileResult>, now: Instant) -> Vec<Effect> {
        if run != self.run || self.mode != WorkflowMode::ZipProgress {
            debug!(run, current = self.run, "dropping stale zip result");
            return Vec::new();
        }
        self.progress = None;

        let Some(first) = files.first() else {
            return self.zip_failed(
                run,
                RefactorError::Application("The server returned no refactored files".to_string()),
            );
        };

        self.animator = Some(self.new_animator(&first.refactored_code, now));
        info!(count = files.len(), "zip refactor finished");
        self.zip_results = files;
        self.cursor = 0;
        self.mode = WorkflowMode::ZipAnimating;
        vec![Effect::FetchArchive {
            run: self.run,
            files: self.units(),
        }]
    }

    fn zip_failed(&mut self, run: RunId, error: RefactorError) -> Vec<Effect> {
        if run != self.run || self.mode != WorkflowMode::ZipProgress {
            return Vec::new();
        }
        warn!(%error, "zip refactor failed");
        self.mode = WorkflowMode::Idle;
        self.progress = None;
        self.zip_results.clear();
        self.animator = None;
        let message = error.to_string();
        self.last_error = Some(message.clone());
        vec![
            Effect::ShowTab(Tab::Input),
            Effect::Notify(Notice::error("Refactoring failed", message)),
        ]
    }

    fn archive_ready(&mut self, run: RunId, archive: ArchiveHandle) -> Vec<Effect> {
        if run != self.run {
            // Dropping the handle deletes its temp file
            debug!(run, current = self.run, "discarding stale archive");
            return Vec::new();
        }
        info!(size = archive.size(), "archive ready");
        self.archive = Some(archive);
        if self.zip_done {
            vec![Effect::Notify(Notice::success(
                "Download ready",
                "Press d to save the refactored project.",
            ))]
        } else {
            Vec::new()
        }
    }

    fn archive_failed(&mut self, run: RunId, error: RefactorError) -> Vec<Effect> {
        if run != self.run {
            return Vec::new();
        }
        warn!(%error, "archive download failed");
        self.archive_error = Some(error.to_string());
        vec![Effect::Notify(Notice::warning(
            "Archive download failed",
            error.to_string(),
        ))]
    }

    fn select_unit(&mut self, index: usize, now: Instant) -> Vec<Effect> {
        if !matches!(self.mode, WorkflowMode::ZipAnimating | WorkflowMode::ZipDone)
            || self.zip_results.is_empty()
        {
            return Vec::new();
        }
        let clamped = index.min(self.zip_results.len() - 1);
        if clamped == self.cursor {
            return Vec::new();
        }
        self.cursor = clamped;
        let code = self.zip_results[clamped].refactored_code.clone();
        if let Some(animator) = self.animator.as_mut() {
            animator.retarget(code, now);
        } else {
            self.animator = Some(self.new_animator(&code, now));
        }
        Vec::new()
    }

    fn animation_completed(&mut self) -> Vec<Effect> {
        match self.mode {
            WorkflowMode::SingleAnimating => {
                self.mode = WorkflowMode::SingleDone;
                info!(run = self.run, "single refactor animation complete");
                vec![Effect::Notify(Notice::success(
                    "Code refactored successfully!",
                    "Your code has been cleaned up and optimized.",
                ))]
            }
            WorkflowMode::ZipAnimating if self.cursor + 1 == self.zip_results.len() => {
                self.zip_done = true;
                self.mode = WorkflowMode::ZipDone;
                info!(run = self.run, "zip animation complete");
                let description = if self.archive.is_some() {
                    "Press d to save the refactored project."
                } else if self.archive_error.is_some() {
                    "The project archive could not be built."
                } else {
                    "Preparing the project archive..."
                };
                vec![Effect::Notify(Notice::success("All files refactored", description))]
            }
            _ => Vec::new(),
        }
    }

    fn new_animator(&self, target: &str, now: Instant) -> TypingAnimator {
        TypingAnimator::new(target, self.speed_ms, self.max_jitter_ms, now)
    }

    fn units(&self) -> Vec<SourceUnit> {
        self.zip_files.iter().map(SourceUnit::from).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn mode(&self) -> WorkflowMode {
        self.mode
    }

    pub fn run_id(&self) -> RunId {
        self.run
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn settings(&self) -> RefactorSettings {
        self.settings
    }

    pub fn speed_ms(&self) -> u64 {
        self.speed_ms
    }

    pub fn source(&self) -> Option<&SourceUnit> {
        self.source.as_ref()
    }

    pub fn zip_files(&self) -> &[ExtractedFile] {
        &self.zip_files
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn zip_summary(&self) -> Option<&str> {
        self.zip_summary.as_deref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn result(&self) -> Option<&RefactorResult> {
        self.result.as_ref()
    }

    pub fn zip_results(&self) -> &[ZipFileResult] {
        &self.zip_results
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_zip_result(&self) -> Option<&ZipFileResult> {
        self.zip_results.get(self.cursor)
    }

    pub fn is_zip_done(&self) -> bool {
        self.zip_done
    }

    pub fn animator(&self) -> Option<&TypingAnimator> {
        self.animator.as_ref()
    }

    pub fn progress(&self) -> Option<&ZipProgressTicker> {
        self.progress.as_ref()
    }

    pub fn archive(&self) -> Option<&ArchiveHandle> {
        self.archive.as_ref()
    }

    pub fn archive_error(&self) -> Option<&str> {
        self.archive_error.as_deref()
    }

    /// Waiting on the server with nothing to animate yet
    pub fn is_awaiting_response(&self) -> bool {
        match self.mode {
            WorkflowMode::SingleAnimating => self.animator.is_none(),
            WorkflowMode::ZipProgress => true,
            _ => self.uploading,
        }
    }

    /// "Download all" is offered only after the last unit finished animating
    pub fn download_all_available(&self) -> bool {
        self.zip_done && self.archive.is_some()
    }

    pub fn is_tab_enabled(&self, tab: Tab) -> bool {
        match tab {
            Tab::Input => true,
            Tab::Generation => self.mode != WorkflowMode::Idle,
            Tab::Results => self.mode == WorkflowMode::SingleDone,
        }
    }
}
