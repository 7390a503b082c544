use crate::analysis::ArchitectureReport;
use crate::io::writers::{JsonWriter, TerminalWriter};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Terminal,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "terminal" => Ok(Self::Terminal),
            other => Err(format!(
                "unknown output format '{}', expected 'terminal' or 'json'",
                other
            )),
        }
    }
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &ArchitectureReport) -> anyhow::Result<()>;
}

/// Writer for `format`, targeting `output` or stdout.
///
/// Terminal output written to a file carries no ANSI colors.
pub fn create_writer(
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                super::ensure_dir(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(std::io::stdout()),
    };

    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Terminal => {
            let colored = output.is_none();
            Box::new(TerminalWriter::new(sink).with_colors(colored))
        }
    })
}
