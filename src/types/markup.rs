use chumsky::span::SimpleSpan;

pub type Span = SimpleSpan;

/// A top level piece of a document, as split by the span scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
	Text(&'t str),
	/// The body of a closed span, delimiters excluded
	Markup(&'t str),
	/// An opening delimiter that never closes, with the text that follows it
	Unterminated(&'t str),
	StrayClose(&'t str),
}

/// The keywords that set context for the terms that follow them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
	Source,
	Section,
	Page,
	Paragraph,
	FileTags,
	Tags,
}

impl Keyword {
	pub const ALL: [Keyword; 6] = [
		Keyword::Source,
		Keyword::Section,
		Keyword::Page,
		Keyword::Paragraph,
		Keyword::FileTags,
		Keyword::Tags,
	];

	/// The prefix that introduces the keyword inside a span, matched
	/// case-insensitively
	pub fn prefix(self) -> &'static str {
		match self {
			Keyword::Source => "SOURCE:",
			Keyword::Section => "SECTION:",
			Keyword::Page => "PAGE:",
			Keyword::Paragraph => "PARAGRAPH:",
			Keyword::FileTags => "FILETAGS:",
			Keyword::Tags => "TAGS:",
		}
	}

	/// Context windows never reach across one of these.
	pub fn breaks_context(self) -> bool { !matches!(self, Keyword::Page) }
}

/// A marked word or phrase with its annotations
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Term<'t> {
	pub text:           &'t str,
	pub gloss:          Option<&'t str>,
	pub l2_definition:  Option<&'t str>,
	pub part_of_speech: Option<&'t str>,
	pub note:           Option<&'t str>,
	pub tags:           Option<&'t str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'t> {
	Word(&'t str),
	Space,
	Punct(&'t str),
	Term(Term<'t>),
	Keyword(Keyword, &'t str),
	Comment,
}

impl Fragment<'_> {
	/// Words and terms both count towards the context window
	pub fn is_word(&self) -> bool { matches!(self, Fragment::Word(_) | Fragment::Term(_)) }

	pub fn breaks_context(&self) -> bool {
		matches!(self, Fragment::Keyword(keyword, _) if keyword.breaks_context())
	}
}
