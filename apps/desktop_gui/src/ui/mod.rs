//! UI layer for the desktop catalog app.

pub mod app;

pub use app::{CatalogApp, StartupConfig};
