//! Popup overlays
//!
//! Dialogs stack on top of the home screen. Only the top one sees keys.

#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    QuitConfirm,
    Help { scroll_offset: usize },
    /// Language, animation speed and refactor options
    Settings { selected_index: usize },
    /// Server-side usage statistics
    Stats,
    /// Path prompt for loading a file or zip archive
    OpenPath { input: String },
}

impl Modal {
    fn same_kind(&self, other: &Modal) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Open dialogs, bottom to top
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `modal` unless a dialog of the same kind is already open
    ///
    /// Returns whether it was opened.
    pub fn open(&mut self, modal: Modal) -> bool {
        if self.stack.iter().any(|m| m.same_kind(&modal)) {
            return false;
        }
        self.stack.push(modal);
        true
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Text typed into the path prompt, when it is the top dialog
    pub fn path_input_mut(&mut self) -> Option<&mut String> {
        match self.stack.last_mut() {
            Some(Modal::OpenPath { input }) => Some(input),
            _ => None,
        }
    }

    /// Highlighted row of the settings dialog, when it is the top dialog
    pub fn settings_row_mut(&mut self) -> Option<&mut usize> {
        match self.stack.last_mut() {
            Some(Modal::Settings { selected_index }) => Some(selected_index),
            _ => None,
        }
    }
}
