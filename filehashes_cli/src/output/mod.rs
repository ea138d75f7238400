mod formatters;

pub use formatters::{JsonLinesFormatter, TextFormatter};

use anyhow::Result;
use filehashes_core::Message;
use serde::{Deserialize, Serialize};

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse output format from string
    pub fn from_string(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" | "jsonl" | "json-lines" => Ok(Self::Json),
            _ => anyhow::bail!("Unknown output format: {}", s),
        }
    }
}

/// Where a formatted line goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Stdout(String),
    Stderr(String),
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Format one stream message; `None` if the format ignores it
    fn format_message(&self, message: &Message) -> Result<Option<Line>>;
}

/// Create a formatter based on output format
pub fn create_formatter(format: OutputFormat, use_color: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(use_color)),
        OutputFormat::Json => Box::new(JsonLinesFormatter::new()),
    }
}

/// Print a formatted line to its stream
pub fn emit(line: Line) {
    match line {
        Line::Stdout(text) => println!("{text}"),
        Line::Stderr(text) => eprintln!("{text}"),
    }
}
