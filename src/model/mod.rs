//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `Workflow` - The refactoring state machine and its effects
//! - `TypingAnimator` - Character-by-character reveal of refactored code
//! - Request/response types shared with the API client
//! - `ModalStack` and UI enums - Presentation state

pub mod animation;
pub mod archive;
pub mod modal;
pub mod notice;
pub mod progress;
pub mod refactor;
pub mod source;
pub mod ui;
pub mod workflow;
