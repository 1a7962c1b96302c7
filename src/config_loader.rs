use std::path::Path;

use fs_err as fs;
use tracing::{debug, info, instrument};

use crate::{error::FlashmarkError, types::config::Config};

/// Loads a TOML configuration file. Relative paths inside it are taken
/// relative to the file's own directory.
#[instrument]
pub fn load_config(config_path: &Path) -> Result<Config, FlashmarkError> {
	debug!("Loading configuration from {:?}", config_path);

	let content = fs::read_to_string(config_path).map_err(FlashmarkError::ConfigRead)?;
	let mut config: Config = toml::from_str(&content)
		.map_err(|source| FlashmarkError::ConfigParse { path: config_path.to_path_buf(), source })?;

	if let Some(base) = config_path.parent() {
		for path in [&mut config.input_path, &mut config.output_path].into_iter().flatten() {
			if path.is_relative() {
				*path = base.join(&*path);
			}
		}
	}

	info!("Loaded configuration for {} -> {}", config.source_language, config.target_language);
	Ok(config)
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use super::*;
	use crate::types::config::OutputFormat;

	#[test]
	fn resolves_paths_next_to_the_file() {
		let dir = tempfile::tempdir().unwrap();
		let config_path = dir.path().join("flashmark.toml");
		std::fs::write(
			&config_path,
			"input_path = \"notes.txt\"\noutput_path = \"/tmp/abs.txt\"\nformat = \"anki\"\ncontext_words = 5\n",
		)
		.unwrap();

		let config = load_config(&config_path).unwrap();

		assert_eq!(config.input_path, Some(dir.path().join("notes.txt")));
		assert_eq!(config.output_path, Some(PathBuf::from("/tmp/abs.txt")));
		assert_eq!(config.format, OutputFormat::Anki);
		assert_eq!(config.context_words, 5);
	}

	#[test]
	fn unknown_keys_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let config_path = dir.path().join("flashmark.toml");
		std::fs::write(&config_path, "language = \"Bangla\"\n").unwrap();

		assert!(matches!(load_config(&config_path), Err(FlashmarkError::ConfigParse { .. })));
	}

	#[test]
	fn missing_file_is_an_error() {
		let dir = tempfile::tempdir().unwrap();
		assert!(matches!(load_config(&dir.path().join("nope.toml")), Err(FlashmarkError::ConfigRead(_))));
	}
}
