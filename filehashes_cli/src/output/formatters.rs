use super::{Line, OutputFormatter};
use anyhow::Result;
use colored::*;
use filehashes_core::{Event, Message};
use std::fmt::Write;

/// `sha256sum --tag` style text output
///
/// One `ALG (file) = HEX` line per checksum on stdout; failures and stops
/// go to stderr. Progress is not shown.
pub struct TextFormatter {
    use_color: bool,
}

impl TextFormatter {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn colorize(&self, text: &str, color: fn(&str) -> ColoredString) -> String {
        if self.use_color {
            color(text).to_string()
        } else {
            text.to_string()
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format_message(&self, message: &Message) -> Result<Option<Line>> {
        let file = message
            .request
            .as_ref()
            .map(|request| request.file_path().display().to_string());

        let line = match (&message.event, file) {
            (Event::Done(checksums), Some(file)) => {
                let mut output = String::new();
                for (algorithm, checksum) in checksums {
                    if !output.is_empty() {
                        output.push('\n');
                    }
                    let name = self.colorize(&algorithm.as_str().to_uppercase(), |s| s.yellow());
                    let hex = self.colorize(&checksum.to_hex(), |s| s.cyan());
                    write!(output, "{name} ({file}) = {hex}")?;
                }
                Some(Line::Stdout(output))
            }
            (Event::Error(error), Some(file)) => Some(Line::Stderr(format!(
                "{} {file}: {error}",
                self.colorize("error:", |s| s.red())
            ))),
            (Event::Error(error), None) => Some(Line::Stderr(format!(
                "{} {error}",
                self.colorize("error:", |s| s.red())
            ))),
            (Event::Stopped(request), Some(file)) => {
                let at = request
                    .resume_state()
                    .map(|state| format!(" at {}%", state.progress))
                    .unwrap_or_default();
                Some(Line::Stderr(format!(
                    "{} {file}{at}",
                    self.colorize("stopped:", |s| s.yellow())
                )))
            }
            _ => None,
        };
        Ok(line)
    }
}

/// One JSON message per line on stdout, every event included
pub struct JsonLinesFormatter;

impl JsonLinesFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonLinesFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonLinesFormatter {
    fn format_message(&self, message: &Message) -> Result<Option<Line>> {
        Ok(Some(Line::Stdout(serde_json::to_string(message)?)))
    }
}
