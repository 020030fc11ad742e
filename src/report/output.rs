// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for exported session reports

use crate::report::formatter::ReportFormatter;
use crate::report::SessionReport;
use anyhow::Result;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutputFormat {
    Json,
    Yaml,
    Text,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            "txt" | "text" | "log" => Some(ReportOutputFormat::Text),
            _ => None,
        }
    }

    /// Format implied by a file name; JSON when the extension is unknown.
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
            .unwrap_or(ReportOutputFormat::Json)
    }

    pub fn serialize(&self, report: &SessionReport) -> Result<String> {
        match self {
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
            ReportOutputFormat::Text => Ok(ReportFormatter::new().plain_lines(report).join("\n")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ReportOutputFormat::for_path(Path::new("run.yml")),
            ReportOutputFormat::Yaml
        );
        assert_eq!(
            ReportOutputFormat::for_path(Path::new("run.log")),
            ReportOutputFormat::Text
        );
        assert_eq!(
            ReportOutputFormat::for_path(Path::new("run")),
            ReportOutputFormat::Json
        );
    }
}
