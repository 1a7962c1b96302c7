use uuid::Uuid;

use crate::types::markup::Keyword;

/// A front/back pair, as written to and read from the simple output format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlashcardRecord {
	pub front: String,
	pub back:  String,
}

/// Values of the keywords in effect where a term appears
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Location {
	pub source:    Option<String>,
	pub section:   Option<String>,
	pub page:      Option<String>,
	pub paragraph: Option<String>,
	pub file_tags: Option<String>,
	pub tags:      Option<String>,
}

impl Location {
	pub fn apply(&mut self, keyword: Keyword, value: &str) {
		let value = Some(value.split_whitespace().collect::<Vec<_>>().join(" "));

		match keyword {
			Keyword::Source => {
				// Only the file tags outlive a new source
				*self = Location { source: value, file_tags: self.file_tags.take(), ..Location::default() };
			}
			Keyword::Section => {
				self.section = value;
				self.paragraph = None;
			}
			Keyword::Page => self.page = value,
			Keyword::Paragraph => self.paragraph = value,
			Keyword::FileTags => self.file_tags = value,
			Keyword::Tags => self.tags = value,
		}
	}
}

/// Everything extracted for one marked term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
	pub id:             Uuid,
	pub term:           String,
	pub gloss:          String,
	pub l2_definition:  String,
	pub part_of_speech: String,
	pub note:           String,

	// Context on either side of the term, whitespace collapsed
	pub before: String,
	pub after:  String,

	pub tags:     Vec<String>,
	pub location: Location,
}

impl Card {
	/// The context with the term bracketed in place
	pub fn context(&self) -> String { format!("{}[{}]{}", self.before, self.term, self.after) }

	/// The recognition card: term on the front, context and gloss on the back.
	pub fn record(&self) -> FlashcardRecord {
		let mut back = self.context();
		if !self.gloss.is_empty() {
			back.push_str("<br>");
			back.push_str(&self.gloss);
		}

		FlashcardRecord { front: self.term.clone(), back }
	}

	/// The production card, asking for the term given its gloss in context.
	/// Only glossed terms have one.
	pub fn reverse_record(&self) -> Option<FlashcardRecord> {
		if self.gloss.is_empty() {
			return None;
		}

		Some(FlashcardRecord {
			front: format!("{}[{}]{}", self.before, self.gloss, self.after),
			back:  self.context(),
		})
	}
}
