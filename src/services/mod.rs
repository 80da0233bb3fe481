//! External service interactions
//!
//! This module contains services for interacting with external systems:
//! - HTTP client for the refactoring backend
//! - Background request execution
//! - Diff rendering
//! - Reading sources and saving downloads

pub mod api;
pub mod diff;
pub mod files;
pub mod request_runner;
