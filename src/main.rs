//! csvpaste command-line tool
//!
//! Drop a CSV file onto the executable (or pass its path) and the converted
//! TSV lands on the clipboard. On failure the window stays open until Enter
//! is pressed so the message can be read.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use csvpaste::{
    ClipboardSink, ColumnSplit, Converter, ConverterBuilder, CsvPasteError, EscapePolicy,
    LineTerminator, ReaderMode, SystemClipboard,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    /// Wrap only values like 0, 007, 0123
    LeadingZero,
    /// Wrap every value
    Always,
}

impl From<Policy> for EscapePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::LeadingZero => EscapePolicy::LeadingZero,
            Policy::Always => EscapePolicy::Always,
        }
    }
}

/// Convert a CSV file into spreadsheet-safe TSV on the clipboard
#[derive(Debug, Parser)]
#[command(name = "csvpaste", version, about)]
struct Cli {
    /// CSV files to convert (only the first one is used)
    files: Vec<PathBuf>,

    /// Which fields to wrap as ="..." formulas
    #[arg(long, value_enum, default_value_t = Policy::LeadingZero)]
    policy: Policy,

    /// Use a standards-conformant CSV decoder instead of the permissive one
    #[arg(long)]
    strict: bool,

    /// Terminate output lines with LF instead of CRLF
    #[arg(long)]
    lf: bool,

    /// Input field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Section marker (first field) whose split column is divided in two
    #[arg(long, requires = "split_column")]
    split_section: Option<String>,

    /// Name of the column to split inside the split section
    #[arg(long, requires = "split_section")]
    split_column: Option<String>,

    /// Section marker that ends the split section (repeatable)
    #[arg(long = "other-section")]
    other_sections: Vec<String>,

    /// Character at which split values are divided
    #[arg(long, default_value_t = ColumnSplit::DEFAULT_SEPARATOR)]
    split_separator: char,

    /// Replacement header names for the split column, as LEFT,RIGHT
    #[arg(long, value_delimiter = ',')]
    split_headers: Option<Vec<String>>,

    /// Print the result to stdout instead of copying it to the clipboard
    #[arg(long)]
    stdout: bool,

    /// Print a JSON summary of the conversion to stderr
    #[arg(long)]
    summary: bool,

    /// Exit immediately on error instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

impl Cli {
    fn build_converter(&self) -> Result<Converter, CsvPasteError> {
        if !self.delimiter.is_ascii() {
            return Err(CsvPasteError::Config(format!(
                "Invalid delimiter: {:?}",
                self.delimiter
            )));
        }

        let mut builder = ConverterBuilder::new()
            .with_escape_policy(self.policy.into())
            .with_delimiter(self.delimiter as u8);

        if self.strict {
            builder = builder.with_reader_mode(ReaderMode::Strict);
        }
        if self.lf {
            builder = builder.with_line_terminator(LineTerminator::Lf);
        }

        if let (Some(section), Some(column)) = (&self.split_section, &self.split_column) {
            let mut split = ColumnSplit::new(section.as_str(), column.as_str())
                .with_other_sections(self.other_sections.iter().cloned())
                .with_separator(self.split_separator);
            match self.split_headers.as_deref() {
                None => {}
                Some([left, right]) => {
                    split = split.with_replacement_headers(left.as_str(), right.as_str());
                }
                Some(_) => {
                    return Err(CsvPasteError::Config(
                        "--split-headers expects exactly two names: LEFT,RIGHT".to_string(),
                    ));
                }
            }
            builder = builder.with_column_split(split);
        }

        builder.build()
    }
}

fn run(cli: &Cli, path: &Path) -> Result<(), CsvPasteError> {
    info!(path = %path.display(), "reading input file");
    let converter = cli.build_converter()?;

    let file = std::fs::File::open(path)?;
    let summary = if cli.stdout {
        converter.convert_to_writer(file, io::stdout().lock())?
    } else {
        let (text, summary) = converter.convert_with_summary(file)?;
        // The clipboard is opened only once there is something to put on it
        let mut clipboard = SystemClipboard::new()?;
        clipboard.write_text(&text)?;
        info!(bytes = text.len(), "copied to clipboard");
        summary
    };

    if cli.summary {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| CsvPasteError::Serialization(e.to_string()))?;
        eprintln!("{}", json);
    }

    Ok(())
}

/// Blocks until Enter is pressed.
fn wait_for_enter() {
    print!("\nPress Enter to exit...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

fn main() -> ExitCode {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(path) = cli.files.first() else {
        error!("no CSV file was specified");
        eprintln!("Usage: drag and drop a CSV file onto this executable, or run `csvpaste <FILE>`.");
        if !cli.no_pause {
            wait_for_enter();
        }
        return ExitCode::FAILURE;
    };

    if cli.files.len() > 1 {
        info!(ignored = cli.files.len() - 1, "multiple files given; only the first is converted");
    }

    match run(&cli, path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "conversion failed");
            if !cli.no_pause {
                wait_for_enter();
            }
            ExitCode::FAILURE
        }
    }
}
