//! Presentation shared by the TUI and the plain-text commands

pub mod detail;
pub mod text;

pub use detail::{detail_sections, detail_title, raw_data};
