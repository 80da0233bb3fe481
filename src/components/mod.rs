//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod code_highlight;
pub mod code_view;
pub mod generation;
pub mod help_dialog;
pub mod home;
pub mod input;
pub mod layout;
pub mod path_dialog;
pub mod quit_dialog;
pub mod results;
pub mod settings_dialog;
pub mod splash;
pub mod stats_dialog;

#[cfg(test)]
pub(crate) mod test_util;

pub use code_view::CodeViewComponent;
pub use generation::draw_generation_panel;
pub use help_dialog::HelpDialog;
pub use home::{draw_home_screen, HomeComponent, HomeRenderContext};
pub use input::draw_input_panel;
pub use layout::calculate_main_layout;
pub use path_dialog::PathDialog;
pub use quit_dialog::QuitDialog;
pub use results::ResultsComponent;
pub use settings_dialog::{SettingsChange, SettingsDialog};
pub use splash::SplashComponent;
pub use stats_dialog::StatsDialog;
