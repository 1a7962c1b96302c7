use std::{io::{BufWriter, Write}, path::Path};

use fs_err as fs;
use tracing::{debug, info, instrument};

use crate::{error::FlashmarkError, types::{card::{Card, FlashcardRecord}, config::OutputFormat}};

/// How cards are laid out in the output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
	pub format:          OutputFormat,
	pub reverse:         bool,
	pub source_language: String,
	pub target_language: String,
}

impl WriteOptions {
	fn header(&self) -> String {
		let (l1, l2) = (&self.source_language, &self.target_language);
		format!(
			"Hash\tBefore\t{l2}\t{l1}\t{l2}Def\tAfter\tSource\tSection\tPage\tPara\tPartOfSpeech\tNote\tFreq\tTags"
		)
	}
}

/// The records a card contributes to the simple format
pub fn records<'c>(cards: impl IntoIterator<Item = &'c Card>, reverse: bool) -> Vec<FlashcardRecord> {
	cards
		.into_iter()
		.flat_map(|card| {
			let reversed = if reverse { card.reverse_record() } else { None };
			std::iter::once(card.record()).chain(reversed)
		})
		.collect()
}

pub fn write_records<'r, W: Write>(
	out: &mut W,
	records: impl IntoIterator<Item = &'r FlashcardRecord>,
) -> std::io::Result<usize> {
	let mut written = 0;
	for record in records {
		writeln!(out, "{}\t{}", record.front, record.back)?;
		written += 1;
	}
	Ok(written)
}

pub fn write_anki_notes<'c, W: Write>(
	out: &mut W,
	cards: impl IntoIterator<Item = &'c Card>,
	options: &WriteOptions,
) -> std::io::Result<usize> {
	writeln!(out, "{}", options.header())?;

	let mut written = 0;
	for card in cards {
		let location = &card.location;
		let columns = [
			card.id.simple().to_string(),
			card.before.clone(),
			card.term.clone(),
			card.gloss.clone(),
			card.l2_definition.clone(),
			card.after.clone(),
			location.source.clone().unwrap_or_default(),
			location.section.clone().unwrap_or_default(),
			location.page.clone().unwrap_or_default(),
			location.paragraph.clone().unwrap_or_default(),
			card.part_of_speech.clone(),
			card.note.clone(),
			// Frequency, not computed yet
			String::new(),
			card.tags.join(" "),
		];

		let line = columns.iter().map(|c| anki_escape(c)).collect::<Vec<_>>().join("\t");
		writeln!(out, "{line}")?;
		written += 1;
	}

	Ok(written)
}

/// Anki's importer treats a bare `"` as a field quote
fn anki_escape(field: &str) -> String { field.replace('"', "&quot;") }

/// Creates or truncates `path` and writes the cards to it, returning the
/// number of lines written after the header.
#[instrument(skip(cards), fields(path = %path.display()))]
pub fn write_output(path: &Path, cards: &[Card], options: &WriteOptions) -> Result<usize, FlashmarkError> {
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		debug!("Ensuring output directory {:?}", parent);
		fs::create_dir_all(parent).map_err(FlashmarkError::OutputWrite)?;
	}

	let file = fs::File::create(path).map_err(FlashmarkError::OutputWrite)?;
	let mut out = BufWriter::new(file);

	let written = match options.format {
		OutputFormat::Simple => write_records(&mut out, &records(cards, options.reverse)),
		OutputFormat::Anki => write_anki_notes(&mut out, cards, options),
	}
	.map_err(FlashmarkError::OutputWrite)?;

	out.flush().map_err(FlashmarkError::OutputWrite)?;

	info!("Wrote {} lines to {}", written, path.display());
	Ok(written)
}

/// Reads a file in the simple format back into records.
#[instrument(fields(path = %path.display()))]
pub fn read_records(path: &Path) -> Result<Vec<FlashcardRecord>, FlashmarkError> {
	let content = fs::read_to_string(path).map_err(FlashmarkError::InputRead)?;

	content
		.lines()
		.enumerate()
		.map(|(index, line)| {
			let (front, back) = line
				.split_once('\t')
				.ok_or_else(|| FlashmarkError::MalformedRecord { path: path.to_path_buf(), line: index + 1 })?;
			Ok(FlashcardRecord { front: front.to_string(), back: back.to_string() })
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use uuid::Uuid;

	use super::*;
	use crate::types::card::Location;

	fn card(term: &str, gloss: &str) -> Card {
		Card {
			id:             Uuid::nil(),
			term:           term.into(),
			gloss:          gloss.into(),
			l2_definition:  String::new(),
			part_of_speech: String::new(),
			note:           String::new(),
			before:         "The ".into(),
			after:          " eat rice.".into(),
			tags:           Vec::new(),
			location:       Location::default(),
		}
	}

	fn options(format: OutputFormat, reverse: bool) -> WriteOptions {
		WriteOptions {
			format,
			reverse,
			source_language: "English".into(),
			target_language: "Bangla".into(),
		}
	}

	#[test]
	fn simple_format_is_tab_separated() {
		let mut out = Vec::new();
		let written = write_records(&mut out, &records(&[card("ami", "")], false)).unwrap();

		assert_eq!(written, 1);
		assert_eq!(String::from_utf8(out).unwrap(), "ami\tThe [ami] eat rice.\n");
	}

	#[test]
	fn reverse_cards_follow_their_card() {
		let cards = [card("ami", "I"), card("tumi", "")];
		let fronts: Vec<_> = records(&cards, true).into_iter().map(|r| r.front).collect();

		assert_eq!(fronts, vec!["ami", "The [I] eat rice.", "tumi"]);
	}

	#[test]
	fn anki_format_has_header_and_all_columns() {
		let mut glossed = card("ami", "I");
		glossed.location.source = Some("Reader \"One\"".into());
		glossed.tags = vec!["pronoun".into(), "basics".into()];

		let mut out = Vec::new();
		write_anki_notes(&mut out, &[glossed], &options(OutputFormat::Anki, false)).unwrap();
		let text = String::from_utf8(out).unwrap();
		let lines: Vec<_> = text.lines().collect();

		assert_eq!(
			lines[0],
			"Hash\tBefore\tBangla\tEnglish\tBanglaDef\tAfter\tSource\tSection\tPage\tPara\tPartOfSpeech\tNote\tFreq\tTags"
		);
		let columns: Vec<_> = lines[1].split('\t').collect();
		assert_eq!(columns.len(), 14);
		assert_eq!(columns[0], "00000000000000000000000000000000");
		assert_eq!(columns[2], "ami");
		assert_eq!(columns[3], "I");
		assert_eq!(columns[6], "Reader &quot;One&quot;");
		assert_eq!(columns[13], "pronoun basics");
	}

	#[test]
	fn writes_and_reads_back() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("cards.txt");
		let cards = [card("ami", "I"), card("ভাত", "")];

		let written = write_output(&path, &cards, &options(OutputFormat::Simple, true)).unwrap();
		let read = read_records(&path).unwrap();

		assert_eq!(written, 3);
		assert_eq!(read, records(&cards, true));
	}

	#[test]
	fn truncates_existing_output() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cards.txt");
		std::fs::write(&path, "old\tcontent\nmore\tlines\n").unwrap();

		write_output(&path, &[], &options(OutputFormat::Simple, false)).unwrap();

		assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
	}

	#[test]
	fn rejects_lines_without_a_tab() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("cards.txt");
		std::fs::write(&path, "ok\tline\nbroken line\n").unwrap();

		assert!(matches!(read_records(&path), Err(FlashmarkError::MalformedRecord { line: 2, .. })));
	}
}
