use std::path::{Path, PathBuf};

use fs_err as fs;
use serde::Deserialize;

use crate::error::FlashmarkError;

/// Which pair of characters encloses a marked span.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
	/// `<term|gloss>`
	#[default]
	Angle,
	/// `[term|gloss]`
	Square,
}

impl Markup {
	pub fn delimiters(self) -> Delimiters {
		match self {
			Markup::Angle => Delimiters { open: '<', close: '>' },
			Markup::Square => Delimiters { open: '[', close: ']' },
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
	pub open:  char,
	pub close: char,
}

#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	/// `front<TAB>back`, one record per line
	#[default]
	Simple,
	/// One note per line with the full column layout and a header
	Anki,
}

#[derive(Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub input_path:  Option<PathBuf>,
	pub output_path: Option<PathBuf>,

	// The learner's language (L1) and the language being learned (L2)
	pub source_language: String,
	pub target_language: String,

	// Words of context kept on each side of a term
	pub context_words: usize,

	pub markup:  Markup,
	pub format:  OutputFormat,
	pub reverse: bool,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			input_path:      None,
			output_path:     None,
			source_language: "English".to_string(),
			target_language: "Bangla".to_string(),
			context_words:   20,
			markup:          Markup::default(),
			format:          OutputFormat::default(),
			reverse:         false,
		}
	}
}

impl Config {
	pub fn input(&self) -> Result<&Path, FlashmarkError> {
		self.input_path.as_deref().ok_or(FlashmarkError::NoInput)
	}

	/// The configured output path, or `<input stem>.cards.txt` beside the input.
	pub fn output(&self) -> Result<PathBuf, FlashmarkError> {
		if let Some(output) = &self.output_path {
			return Ok(output.clone());
		}

		let input = self.input()?;
		let stem = input.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
		Ok(input.with_file_name(format!("{stem}.cards.txt")))
	}

	pub fn validate(&self) -> Result<(), FlashmarkError> {
		let input = self.input()?;

		if self.context_words == 0 {
			return Err(FlashmarkError::InvalidConfig("`context_words` must be at least 1".into()));
		}
		if self.source_language.trim().is_empty() || self.target_language.trim().is_empty() {
			return Err(FlashmarkError::InvalidConfig("language names must not be empty".into()));
		}

		let output = self.output()?;
		if output == input || same_file(input, &output) {
			return Err(FlashmarkError::SamePath(output));
		}

		Ok(())
	}
}

/// True when both paths exist and resolve to one file, through `..` or links
fn same_file(a: &Path, b: &Path) -> bool {
	match (fs::canonicalize(a), fs::canonicalize(b)) {
		(Ok(a), Ok(b)) => a == b,
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_input(path: &str) -> Config {
		Config { input_path: Some(PathBuf::from(path)), ..Config::default() }
	}

	#[test]
	fn default_output_sits_beside_input() {
		let config = with_input("notes/chapter1.txt");
		assert_eq!(config.output().unwrap(), PathBuf::from("notes/chapter1.cards.txt"));
	}

	#[test]
	fn explicit_output_wins() {
		let config = Config { output_path: Some("out.tsv".into()), ..with_input("in.txt") };
		assert_eq!(config.output().unwrap(), PathBuf::from("out.tsv"));
	}

	#[test]
	fn missing_input_is_rejected() {
		assert!(matches!(Config::default().validate(), Err(FlashmarkError::NoInput)));
	}

	#[test]
	fn zero_context_is_rejected() {
		let config = Config { context_words: 0, ..with_input("in.txt") };
		assert!(matches!(config.validate(), Err(FlashmarkError::InvalidConfig(_))));
	}

	#[test]
	fn output_must_differ_from_input() {
		let config = Config { output_path: Some("in.txt".into()), ..with_input("in.txt") };
		assert!(matches!(config.validate(), Err(FlashmarkError::SamePath(_))));
	}

	#[test]
	fn output_resolving_to_the_input_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::create_dir(dir.path().join("sub")).unwrap();
		std::fs::write(dir.path().join("in.txt"), "<word>").unwrap();

		let config = Config {
			input_path: Some(dir.path().join("in.txt")),
			output_path: Some(dir.path().join("sub").join("..").join("in.txt")),
			..Config::default()
		};

		assert!(matches!(config.validate(), Err(FlashmarkError::SamePath(_))));
	}

	#[cfg(unix)]
	#[test]
	fn output_linked_to_the_input_is_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let input = dir.path().join("in.txt");
		let link = dir.path().join("link.txt");
		std::fs::write(&input, "<word>").unwrap();
		std::os::unix::fs::symlink(&input, &link).unwrap();

		let config = Config { input_path: Some(input), output_path: Some(link), ..Config::default() };

		assert!(matches!(config.validate(), Err(FlashmarkError::SamePath(_))));
	}

	#[test]
	fn distinct_existing_files_pass() {
		let dir = tempfile::tempdir().unwrap();
		std::fs::write(dir.path().join("in.txt"), "<word>").unwrap();
		std::fs::write(dir.path().join("out.txt"), "").unwrap();

		let config = Config {
			input_path: Some(dir.path().join("in.txt")),
			output_path: Some(dir.path().join("out.txt")),
			..Config::default()
		};

		assert!(config.validate().is_ok());
	}

	#[test]
	fn deserializes_lowercase_enums() {
		let config: Config = toml::from_str(
			r#"
			input_path = "a.txt"
			markup = "square"
			format = "anki"
			reverse = true
			"#,
		)
		.unwrap();

		assert_eq!(config.markup, Markup::Square);
		assert_eq!(config.format, OutputFormat::Anki);
		assert!(config.reverse);
		assert_eq!(config.context_words, 20);
		assert_eq!(config.target_language, "Bangla");
	}
}
