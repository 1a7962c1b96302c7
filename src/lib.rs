//! Turns marked-up language notes into flashcards.
//!
//! Terms are marked inline, `<term|gloss>`, and come out as tab-separated
//! lines with the surrounding sentence as context, ready for Anki's importer.

pub mod card_id;
pub mod config_loader;
pub mod error;
pub mod extract;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod types;
pub mod write;

pub use error::FlashmarkError;
pub use extract::{Cards, ExtractOptions, Extraction};
pub use pipeline::{Summary, run};
pub use types::{card::{Card, FlashcardRecord}, config::{Config, Markup, OutputFormat}};
