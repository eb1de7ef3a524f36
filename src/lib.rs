//! Core of the Friendly Pics image browser: settings persistence, per-screen
//! window layout, and the paged thumbnail list behind the main window.

pub mod config;
pub mod display;
pub mod error;
pub mod file_utils;
pub mod image_loader;
pub mod services;
pub mod settings;
pub mod state;

pub use error::{AppError, Result};
