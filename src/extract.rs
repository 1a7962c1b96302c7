//! Turns a parsed document into cards. Each marked term becomes one card,
//! carrying the words around it as context. Context windows stop at the
//! keywords that open a new source, section, paragraph or tag set.

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{card_id::{create_pair_uuid, generate_card_uuid}, error::FlashmarkError, parse::{Parsed, parse_markup}, types::{card::{Card, Location}, config::{Config, Delimiters}, diagnostic::Diagnostic, markup::{Fragment, Term}}};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
	pub delimiters:    Delimiters,
	pub context_words: usize,
	pub pair_uuid:     Uuid,
}

impl ExtractOptions {
	pub fn from_config(config: &Config) -> Self {
		Self {
			delimiters:    config.markup.delimiters(),
			context_words: config.context_words,
			pair_uuid:     create_pair_uuid(&config.source_language, &config.target_language),
		}
	}
}

impl Default for ExtractOptions {
	fn default() -> Self { Self::from_config(&Config::default()) }
}

/// A scanned document, ready to hand out its cards
#[derive(Debug, Clone)]
pub struct Extraction<'t> {
	parsed:  Parsed<'t>,
	options: ExtractOptions,
}

impl<'t> Extraction<'t> {
	#[instrument(skip(source), fields(bytes = source.len()))]
	pub fn new(source: &'t str, options: ExtractOptions) -> Result<Self, FlashmarkError> {
		let parsed = parse_markup(source, options.delimiters)?;
		info!(
			"Found {} marked terms and {} markup problems",
			parsed.fragments.iter().filter(|f| matches!(f, Fragment::Term(_))).count(),
			parsed.diagnostics.len()
		);

		Ok(Self { parsed, options })
	}

	pub fn diagnostics(&self) -> &[Diagnostic] { &self.parsed.diagnostics }

	/// The cards in source order. Each call starts over from the top.
	pub fn cards(&self) -> Cards<'_, 't> {
		Cards { extraction: self, position: 0, location: Location::default() }
	}

	/// Index of the first fragment of the context before `focus`
	fn window_start(&self, focus: usize) -> usize {
		let mut start = focus;
		let mut words = 0;

		for (index, fragment) in self.parsed.fragments[..focus].iter().enumerate().rev() {
			if fragment.breaks_context() {
				break;
			}

			start = index;
			if fragment.is_word() {
				words += 1;
				if words == self.options.context_words {
					break;
				}
			}
		}

		start
	}

	/// Index one past the last fragment of the context after `focus`
	fn window_end(&self, focus: usize) -> usize {
		let mut end = focus + 1;
		let mut words = 0;

		for (index, fragment) in self.parsed.fragments.iter().enumerate().skip(focus + 1) {
			if fragment.breaks_context() {
				break;
			}

			if words == self.options.context_words {
				// Punctuation stays with the word it follows
				if matches!(fragment, Fragment::Punct(_)) {
					end = index + 1;
					continue;
				}
				break;
			}

			end = index + 1;
			if fragment.is_word() {
				words += 1;
			}
		}

		end
	}

	fn build_card(&self, focus: usize, term: &Term<'_>, location: &Location) -> Card {
		let fragments = &self.parsed.fragments;

		let before = render(&fragments[self.window_start(focus)..focus]).trim_start().to_string();
		let after = render(&fragments[focus + 1..self.window_end(focus)]).trim_end().to_string();
		let text = collapse_whitespace(term.text);

		let tags = merge_tags([location.tags.as_deref(), term.tags, location.file_tags.as_deref()]);

		let id = generate_card_uuid(&self.options.pair_uuid, &before, &text, &after);
		debug!("Card {} for '{}'", id, text);

		Card {
			id,
			term: text,
			gloss: term.gloss.map(collapse_whitespace).unwrap_or_default(),
			l2_definition: term.l2_definition.map(collapse_whitespace).unwrap_or_default(),
			part_of_speech: term.part_of_speech.map(collapse_whitespace).unwrap_or_default(),
			note: term.note.map(collapse_whitespace).unwrap_or_default(),
			before,
			after,
			tags,
			location: location.clone(),
		}
	}
}

/// Lazily walks the fragments, tracking keywords, and yields a card per term
pub struct Cards<'e, 't> {
	extraction: &'e Extraction<'t>,
	position:   usize,
	location:   Location,
}

impl Iterator for Cards<'_, '_> {
	type Item = Card;

	fn next(&mut self) -> Option<Card> {
		let fragments = &self.extraction.parsed.fragments;

		while let Some(fragment) = fragments.get(self.position) {
			let focus = self.position;
			self.position += 1;

			match fragment {
				Fragment::Keyword(keyword, value) => self.location.apply(*keyword, value),
				Fragment::Term(term) => return Some(self.extraction.build_card(focus, term, &self.location)),
				_ => {}
			}
		}

		None
	}
}

/// Renders fragments as plain text, every whitespace run as one space
fn render(fragments: &[Fragment<'_>]) -> String {
	let mut text = String::new();

	for fragment in fragments {
		match fragment {
			Fragment::Word(word) | Fragment::Punct(word) => text.push_str(word),
			Fragment::Term(term) => text.push_str(&collapse_whitespace(term.text)),
			Fragment::Space => {
				if !text.ends_with(' ') {
					text.push(' ');
				}
			}
			Fragment::Keyword(..) | Fragment::Comment => {}
		}
	}

	text
}

fn collapse_whitespace(text: &str) -> String { text.split_whitespace().collect::<Vec<_>>().join(" ") }

fn merge_tags<'a>(sources: impl IntoIterator<Item = Option<&'a str>>) -> Vec<String> {
	let mut tags: Vec<String> = Vec::new();

	for tag in sources.into_iter().flatten().flat_map(str::split_whitespace) {
		if !tags.iter().any(|t| t == tag) {
			tags.push(tag.to_string());
		}
	}

	tags
}
