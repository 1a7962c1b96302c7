use std::{fmt, ops::Range};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
	Unterminated,
	StrayClose,
	EmptyTerm,
	UnknownProperty(String),
}

impl fmt::Display for DiagnosticKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DiagnosticKind::Unterminated => write!(f, "unterminated markup, treating it as plain text"),
			DiagnosticKind::StrayClose => write!(f, "closing delimiter without an opening one"),
			DiagnosticKind::EmptyTerm => write!(f, "marked span has no term, skipping it"),
			DiagnosticKind::UnknownProperty(item) => write!(f, "ignoring unrecognised property '{item}'"),
		}
	}
}

/// A recoverable markup problem, located in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub kind:   DiagnosticKind,
	/// Byte range in the source
	pub span:   Range<usize>,
	/// 1-based
	pub line:   usize,
	/// 1-based, in characters
	pub column: usize,
}

impl Diagnostic {
	pub fn new(kind: DiagnosticKind, span: Range<usize>, source: &str) -> Self {
		let (line, column) = line_col(source, span.start);
		Self { kind, span, line, column }
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}: {}", self.line, self.column, self.kind)
	}
}

fn line_col(source: &str, offset: usize) -> (usize, usize) {
	let before = &source[..offset.min(source.len())];
	let line = before.matches('\n').count() + 1;
	let line_start = before.rfind('\n').map_or(0, |i| i + 1);
	(line, before[line_start..].chars().count() + 1)
}
