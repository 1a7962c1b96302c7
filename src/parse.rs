use chumsky::prelude::*;
use logos::Logos;
use tracing::{debug, instrument, warn};

use crate::{error::FlashmarkError, types::{config::Delimiters, diagnostic::{Diagnostic, DiagnosticKind}, markup::{Fragment, Keyword, Segment, Span, Term}}};

/// Prose between marked spans
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Prose {
	#[regex(r"\s+")]
	Space,

	#[regex(r"[\p{P}\p{S}]")]
	Punct,

	#[regex(r"[^\s\p{P}\p{S}]+")]
	Word,
}

/// A document split into fragments, with the problems found along the way
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Parsed<'t> {
	pub fragments:   Vec<Fragment<'t>>,
	pub diagnostics: Vec<Diagnostic>,
}

/// State machine for building fragments from scanned segments
struct FragmentBuilder<'t> {
	source: &'t str,
	parsed: Parsed<'t>,
}

impl<'t> FragmentBuilder<'t> {
	fn new(source: &'t str) -> Self { Self { source, parsed: Parsed::default() } }

	fn report(&mut self, kind: DiagnosticKind, span: Span) {
		let diagnostic = Diagnostic::new(kind, span.start..span.end, self.source);
		warn!(line = diagnostic.line, column = diagnostic.column, "{}", diagnostic.kind);
		self.parsed.diagnostics.push(diagnostic);
	}

	fn push_prose(&mut self, text: &'t str) {
		for (piece, range) in Prose::lexer(text).spanned() {
			let slice = &text[range];
			let fragment = match piece {
				Ok(Prose::Space) => Fragment::Space,
				Ok(Prose::Punct) => Fragment::Punct(slice),
				Ok(Prose::Word) | Err(_) => Fragment::Word(slice),
			};
			self.parsed.fragments.push(fragment);
		}
	}

	fn push_markup(&mut self, body: &'t str, span: Span) {
		if let Some(keyword) = Keyword::ALL.into_iter().find(|k| starts_with_ignore_case(body, k.prefix())) {
			let value = &body[keyword.prefix().len()..];
			debug!("Keyword {:?} = {:?}", keyword, value);
			self.parsed.fragments.push(Fragment::Keyword(keyword, value));
			return;
		}

		// "<!--" is the comment form; "<--" is common enough to accept too
		if body.starts_with("!--") || body.starts_with("--") {
			self.parsed.fragments.push(Fragment::Comment);
			return;
		}

		if let Some(term) = self.parse_term(body, span) {
			self.parsed.fragments.push(Fragment::Term(term));
		}
	}

	fn parse_term(&mut self, body: &'t str, span: Span) -> Option<Term<'t>> {
		let mut items = body.split('|');
		let text = items.next().unwrap_or_default();

		if text.trim().is_empty() {
			self.report(DiagnosticKind::EmptyTerm, span);
			return None;
		}

		let mut term = Term { text, ..Term::default() };
		let mut positional = 0;

		for item in items {
			if let Some((key, value)) = item.split_once('=') {
				let slot = match key.trim().to_ascii_lowercase().as_str() {
					"l2" => Some(&mut term.l2_definition),
					"tags" => Some(&mut term.tags),
					"part" => Some(&mut term.part_of_speech),
					"note" => Some(&mut term.note),
					_ => None,
				};

				if let Some(slot) = slot {
					*slot = non_empty(value);
					continue;
				}

				// A bare identifier before '=' is a property name, just not one we know
				let key = key.trim();
				if !key.is_empty() && !key.contains(char::is_whitespace) {
					self.report(DiagnosticKind::UnknownProperty(item.trim().to_string()), span);
					continue;
				}
			}

			// Positional items: the gloss first, then the L2 definition
			match positional {
				0 => term.gloss = non_empty(item),
				1 => {
					let definition =
						if starts_with_ignore_case(item, "L2:") { &item["L2:".len()..] } else { item };
					term.l2_definition = non_empty(definition);
				}
				_ => self.report(DiagnosticKind::UnknownProperty(item.trim().to_string()), span),
			}
			positional += 1;
		}

		Some(term)
	}

	fn process_segment(&mut self, segment: Segment<'t>, span: Span) {
		match segment {
			Segment::Text(text) => self.push_prose(text),

			Segment::Markup(body) => self.push_markup(body, span),

			Segment::Unterminated(rest) => {
				self.report(DiagnosticKind::Unterminated, span);
				self.push_prose(rest);
			}

			Segment::StrayClose(text) => {
				self.report(DiagnosticKind::StrayClose, span);
				self.push_prose(text);
			}
		}
	}

	fn into_parsed(self) -> Parsed<'t> { self.parsed }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
	text.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn non_empty(value: &str) -> Option<&str> {
	let value = value.trim();
	(!value.is_empty()).then_some(value)
}

/// Splits a document into prose and delimited spans. Every input scans: an
/// opening delimiter that never closes, and a closing one that was never
/// opened, come out as their own segments.
pub fn segments<'a>(
	delimiters: Delimiters,
) -> impl Parser<'a, &'a str, Vec<(Segment<'a>, Span)>, extra::Err<Rich<'a, char>>> + Clone {
	let Delimiters { open, close } = delimiters;

	// A span may cross lines but never contains its own opening delimiter
	let body = none_of([open, close]).repeated().to_slice();

	let closed = just(open).ignore_then(body.clone()).then_ignore(just(close)).map(Segment::Markup);

	let unterminated = just(open).ignore_then(body).map(Segment::Unterminated);

	let stray = just(close).to_slice().map(Segment::StrayClose);

	let text = none_of([open, close]).repeated().at_least(1).to_slice().map(Segment::Text);

	// Order matters: a closed span is tried before the unterminated fallback
	choice((closed, unterminated, stray, text))
		.map_with(|segment, e| (segment, e.span()))
		.repeated()
		.collect::<Vec<_>>()
		.then_ignore(end())
}

/// Main parser entry point
#[instrument(skip(source), fields(bytes = source.len()))]
pub fn parse_markup(source: &str, delimiters: Delimiters) -> Result<Parsed<'_>, FlashmarkError> {
	let segments = segments(delimiters).parse(source).into_result().map_err(|errors| {
		let message = errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ");
		FlashmarkError::Parse(message)
	})?;

	debug!("Scanned {} segments", segments.len());

	let mut builder = FragmentBuilder::new(source);
	for (segment, span) in segments {
		builder.process_segment(segment, span);
	}

	Ok(builder.into_parsed())
}
