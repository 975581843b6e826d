//! Run settings resolved from configuration.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_BASE_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_OUTPUT: &str = "report.md";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Markdown,
    Json,
    Svg,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            "svg" => Ok(ReportFormat::Svg),
            other => Err(format!("unknown report format '{other}' (expected markdown, json or svg)")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Markdown => "markdown",
            ReportFormat::Json => "json",
            ReportFormat::Svg => "svg",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_capital: f64,
    /// Tried in order; the first source that loads wins.
    pub source_paths: Vec<PathBuf>,
    pub output: PathBuf,
    pub format: ReportFormat,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_capital: DEFAULT_BASE_CAPITAL,
            source_paths: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: ReportFormat::Markdown,
        }
    }
}
