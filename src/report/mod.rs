// SPDX-License-Identifier: PMPL-1.0-or-later

//! Session reports for scripted detection runs

pub mod formatter;
pub mod output;

use crate::config::Endpoints;
use crate::i18n::Lang;
use crate::types::{EmbedState, FailureReason, FrameRect, ScriptedSignal, Transition};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Everything a simulation decided, in the order it happened.
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub created_at: String,
    pub config_source: String,
    pub language: Lang,
    pub endpoints: Endpoints,
    pub frame: Option<FrameRect>,
    pub signals: Vec<ScriptedSignal>,
    pub transitions: Vec<Transition>,
    pub final_state: EmbedState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<FailureReason>,
    pub elapsed_ms: u64,
    pub status_text: String,
}

/// Save report to file, picking the format from the extension
pub fn save_report<P: AsRef<Path>>(report: &SessionReport, path: P) -> Result<()> {
    let formatter = ReportFormatter::new();
    formatter.save(report, path)
}

/// Print report to console
pub fn print_report(report: &SessionReport) {
    let formatter = ReportFormatter::new();
    formatter.print(report);
}
