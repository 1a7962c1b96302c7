use std::io;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};

use crate::types::diagnostic::{Diagnostic, DiagnosticKind};

fn label_message(kind: &DiagnosticKind) -> &'static str {
	match kind {
		DiagnosticKind::Unterminated => "opened here, never closed",
		DiagnosticKind::StrayClose => "nothing to close",
		DiagnosticKind::EmptyTerm => "empty term",
		DiagnosticKind::UnknownProperty(_) => "in this span",
	}
}

/// Renders markup warnings as annotated snippets of `source`
pub fn write_diagnostics<W: io::Write>(
	out: &mut W,
	name: &str,
	source: &str,
	diagnostics: &[Diagnostic],
) -> io::Result<()> {
	let name = name.to_string();

	for diagnostic in diagnostics {
		let span = (name.clone(), diagnostic.span.clone());

		Report::build(ReportKind::Warning, span.clone())
			.with_config(Config::default().with_index_type(IndexType::Byte).with_color(false))
			.with_message(diagnostic.kind.to_string())
			.with_label(Label::new(span).with_message(label_message(&diagnostic.kind)).with_color(Color::Yellow))
			.finish()
			.write((name.clone(), Source::from(source)), &mut *out)?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_the_offending_line() {
		let source = "fine <one>\nthen <broken";
		let start = source.rfind('<').unwrap();
		let diagnostics = [Diagnostic::new(DiagnosticKind::Unterminated, start..source.len(), source)];

		let mut out = Vec::new();
		write_diagnostics(&mut out, "notes.txt", source, &diagnostics).unwrap();
		let text = String::from_utf8(out).unwrap();

		assert!(text.contains("unterminated markup"));
		assert!(text.contains("notes.txt"));
		assert!(text.contains("then <broken"));
		assert!(text.contains("opened here, never closed"));
	}
}
