use std::{io, path::PathBuf};

use clap::{Parser, ValueEnum};
use eyre::{Result, WrapErr};
use flashmark::{Config, Markup, OutputFormat, config_loader::load_config, report::write_diagnostics};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt::{self, time::ChronoLocal}, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MarkupArg {
	Angle,
	Square,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
	Simple,
	Anki,
}

#[derive(Parser, Debug)]
#[command(name = "flashmark", version, about = "Turn marked-up language notes into flashcards")]
struct Cli {
	/// Marked-up text file to read
	input: Option<PathBuf>,

	/// Where to write the cards (default: <input stem>.cards.txt)
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// TOML configuration file; flags override its values
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// The learner's language
	#[arg(long)]
	source_language: Option<String>,

	/// The language being learned
	#[arg(long)]
	target_language: Option<String>,

	/// Words of context to keep on each side of a term
	#[arg(long)]
	context_words: Option<usize>,

	#[arg(long, value_enum)]
	markup: Option<MarkupArg>,

	#[arg(long, value_enum)]
	format: Option<FormatArg>,

	/// Also write a gloss-to-term card for every glossed term
	#[arg(long, overrides_with = "no_reverse")]
	reverse: bool,

	/// Turn off reverse cards enabled in the configuration file
	#[arg(long, overrides_with = "reverse")]
	no_reverse: bool,

	/// Show each markup warning against the source text
	#[arg(long)]
	show_source: bool,

	/// Increase verbosity (-v for debug, -vv for trace)
	#[arg(short, long, action = clap::ArgAction::Count, conflicts_with = "quiet")]
	verbose: u8,

	/// Only report errors
	#[arg(short, long)]
	quiet: bool,
}

impl Cli {
	fn log_filter(&self) -> &'static str {
		match (self.quiet, self.verbose) {
			(true, _) => "error",
			(false, 0) => "info",
			(false, 1) => "debug",
			(false, _) => "trace",
		}
	}

	fn into_config(self) -> Result<Config> {
		let mut config = match &self.config {
			Some(path) => load_config(path).wrap_err_with(|| format!("Loading {}", path.display()))?,
			None => Config::default(),
		};

		if let Some(input) = self.input {
			config.input_path = Some(input);
		}
		if let Some(output) = self.output {
			config.output_path = Some(output);
		}
		if let Some(language) = self.source_language {
			config.source_language = language;
		}
		if let Some(language) = self.target_language {
			config.target_language = language;
		}
		if let Some(words) = self.context_words {
			config.context_words = words;
		}
		if let Some(markup) = self.markup {
			config.markup = match markup {
				MarkupArg::Angle => Markup::Angle,
				MarkupArg::Square => Markup::Square,
			};
		}
		if let Some(format) = self.format {
			config.format = match format {
				FormatArg::Simple => OutputFormat::Simple,
				FormatArg::Anki => OutputFormat::Anki,
			};
		}
		if self.reverse {
			config.reverse = true;
		} else if self.no_reverse {
			config.reverse = false;
		}

		Ok(config)
	}
}

fn main() -> Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();

	let filter = cli.log_filter();

	tracing_subscriber::registry()
		.with(fmt::layer().with_writer(io::stderr).with_timer(ChronoLocal::rfc_3339()))
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
		.init();

	let show_source = cli.show_source;
	let config = cli.into_config()?;
	debug!("Effective configuration: {:?}", config);

	let input = config.input_path.clone().unwrap_or_default();
	let summary = flashmark::run(&config)
		.wrap_err_with(|| format!("Converting {}", input.display()))?;

	if show_source && !summary.diagnostics.is_empty() {
		let name = input.display().to_string();
		write_diagnostics(&mut io::stderr().lock(), &name, &summary.source, &summary.diagnostics)?;
	}

	info!("{} terms written as {} lines to {}", summary.cards, summary.lines, summary.output.display());

	Ok(())
}
