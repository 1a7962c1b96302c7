use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlashmarkError {
	#[error("No input file given (pass one on the command line or set `input_path`)")]
	NoInput,

	#[error("Could not read input file")]
	InputRead(#[source] io::Error),

	#[error("Input file '{0}' is not valid UTF-8")]
	InputEncoding(PathBuf),

	#[error("Output path '{0}' is the same file as the input")]
	SamePath(PathBuf),

	#[error("Could not write output file")]
	OutputWrite(#[source] io::Error),

	#[error("Could not read configuration file")]
	ConfigRead(#[source] io::Error),

	#[error("Invalid configuration in '{path}'")]
	ConfigParse {
		path:   PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("Markup could not be scanned: {0}")]
	Parse(String),

	#[error("Line {line} of '{path}' is not a `front<TAB>back` record")]
	MalformedRecord { path: PathBuf, line: usize },
}
