//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use crate::model::ui::Tab;
use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for animations and request polling
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,
    /// Transition from splash to main app
    SplashComplete,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to the next enabled tab
    NextTab,
    /// Move to the previous enabled tab
    PrevTab,
    /// Jump straight to a tab if it is enabled
    SelectTab(Tab),

    // ─────────────────────────────────────────────────────────────────────────
    // Scrolling
    // ─────────────────────────────────────────────────────────────────────────
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open language / speed / refactor options
    OpenSettings,
    /// Fetch and show server statistics
    OpenStats,
    /// Prompt for a file or zip path
    OpenPathPrompt,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Navigate up in modal
    ModalUp,
    /// Navigate down in modal
    ModalDown,
    /// Change the value of the selected modal row
    ModalToggle,
    /// Add character to the path prompt
    PathInput(char),
    /// Remove last character from the path prompt
    PathBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Source
    // ─────────────────────────────────────────────────────────────────────────
    /// Load a single file or upload a zip archive
    LoadPath(String),
    /// Paste code through $EDITOR
    OpenEditor,
    /// The external editor exited; pick up the scratch file
    EditorClosed,
    /// Text pasted into the terminal
    Paste(String),

    // ─────────────────────────────────────────────────────────────────────────
    // Refactoring
    // ─────────────────────────────────────────────────────────────────────────
    /// Send the loaded code to the refactoring service
    StartRefactor,
    /// Discard the current source and results
    Reset,
    /// Save the refactored file, or the project archive in zip mode
    Download,

    // ─────────────────────────────────────────────────────────────────────────
    // Animation
    // ─────────────────────────────────────────────────────────────────────────
    TogglePause,
    RestartAnimation,
    SpeedUp,
    SpeedDown,
    /// Show the next refactored file of a zip batch
    NextFile,
    /// Show the previous refactored file of a zip batch
    PrevFile,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::SplashComplete => write!(f, "SplashComplete"),
            Action::NextTab => write!(f, "NextTab"),
            Action::PrevTab => write!(f, "PrevTab"),
            Action::SelectTab(tab) => write!(f, "SelectTab({})", tab.name()),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenSettings => write!(f, "OpenSettings"),
            Action::OpenStats => write!(f, "OpenStats"),
            Action::OpenPathPrompt => write!(f, "OpenPathPrompt"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::ModalToggle => write!(f, "ModalToggle"),
            Action::PathInput(c) => write!(f, "PathInput('{}')", c),
            Action::PathBackspace => write!(f, "PathBackspace"),
            Action::LoadPath(path) => write!(f, "LoadPath({})", path),
            Action::OpenEditor => write!(f, "OpenEditor"),
            Action::EditorClosed => write!(f, "EditorClosed"),
            Action::Paste(text) => write!(f, "Paste({} chars)", text.chars().count()),
            Action::StartRefactor => write!(f, "StartRefactor"),
            Action::Reset => write!(f, "Reset"),
            Action::Download => write!(f, "Download"),
            Action::TogglePause => write!(f, "TogglePause"),
            Action::RestartAnimation => write!(f, "RestartAnimation"),
            Action::SpeedUp => write!(f, "SpeedUp"),
            Action::SpeedDown => write!(f, "SpeedDown"),
            Action::NextFile => write!(f, "NextFile"),
            Action::PrevFile => write!(f, "PrevFile"),
        }
    }
}
