//! UI layer for the exam desktop client: app shell, per-view panels, theme and text formatting.

pub mod app;
pub mod format;
pub mod panels;
pub mod theme;

pub use app::{load_persisted_selection, ExamDesktopApp};
