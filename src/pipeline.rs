use std::{io, path::PathBuf};

use fs_err as fs;
use tracing::{info, instrument, warn};

use crate::{error::FlashmarkError, extract::{ExtractOptions, Extraction}, types::{card::Card, config::{Config, OutputFormat}, diagnostic::Diagnostic}, write::{WriteOptions, write_output}};

/// What a run produced
#[derive(Debug, Clone)]
pub struct Summary {
	pub output:      PathBuf,
	pub cards:       usize,
	pub lines:       usize,
	pub diagnostics: Vec<Diagnostic>,
	/// The input text, kept for rendering diagnostics against
	pub source:      String,
}

/// Reads the whole input as UTF-8, dropping a byte-order mark
pub fn read_source(config: &Config) -> Result<String, FlashmarkError> {
	let path = config.input()?;

	let text = fs::read_to_string(path).map_err(|e| match e.kind() {
		io::ErrorKind::InvalidData => FlashmarkError::InputEncoding(path.to_path_buf()),
		_ => FlashmarkError::InputRead(e),
	})?;

	Ok(match text.strip_prefix('\u{feff}') {
		Some(stripped) => stripped.to_string(),
		None => text,
	})
}

/// Runs the whole conversion: input file -> cards -> output file. The input
/// is read in full before the output is opened, so a bad input leaves any
/// existing output untouched.
#[instrument(skip(config), fields(input = ?config.input_path))]
pub fn run(config: &Config) -> Result<Summary, FlashmarkError> {
	config.validate()?;
	let output = config.output()?;

	let source = read_source(config)?;

	let extraction = Extraction::new(&source, ExtractOptions::from_config(config))?;
	let cards: Vec<Card> = extraction.cards().collect();

	if cards.is_empty() {
		warn!("No marked terms found; the output will be empty");
	}

	if config.reverse && config.format == OutputFormat::Anki {
		warn!("Reverse cards come from the note type in the anki format; ignoring `reverse`");
	}

	let options = WriteOptions {
		format:          config.format,
		reverse:         config.reverse,
		source_language: config.source_language.clone(),
		target_language: config.target_language.clone(),
	};
	let lines = write_output(&output, &cards, &options)?;

	info!("Converted {} terms into {} lines", cards.len(), lines);

	let diagnostics = extraction.diagnostics().to_vec();
	drop(extraction);

	Ok(Summary { output, cards: cards.len(), lines, diagnostics, source })
}
