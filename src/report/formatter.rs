// SPDX-License-Identifier: PMPL-1.0-or-later

//! Session report formatting and output

use crate::report::output::ReportOutputFormat;
use crate::report::SessionReport;
use crate::types::{EmbedState, SignalKind, Transition};
use anyhow::{Context, Result};
use colored::*;
use std::fs;
use std::path::Path;

pub struct ReportFormatter;

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print(&self, report: &SessionReport) {
        println!("\n{}", "=== EMBED-SHELL SESSION ===".bold().cyan());
        println!();

        println!("{}", "SETUP".bold().yellow());
        println!("  Config: {}", report.config_source);
        println!(
            "  Language: {} ({})",
            report.language.display_name(),
            report.language
        );
        println!("  Embed URL: {}", report.endpoints.embed_url);
        println!("  Direct URL: {}", report.endpoints.direct_url);
        println!(
            "  Load timeout: {}ms, detection delay: {}ms",
            report.endpoints.load_timeout_ms, report.endpoints.detection_timeout_ms
        );
        match report.frame {
            Some(frame) => println!("  Frame box: {}x{}", frame.width, frame.height),
            None => println!("  Frame box: {}", "none".dimmed()),
        }
        println!();

        println!("{}", "SIGNALS".bold().yellow());
        if report.signals.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for signal in &report.signals {
            let label = match signal.kind {
                SignalKind::Load => "load".green(),
                SignalKind::Error => "error".red(),
            };
            println!("  {:>7}ms  {}", signal.at_ms, label);
        }
        println!();

        println!("{}", "TRANSITIONS".bold().yellow());
        if report.transitions.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for transition in &report.transitions {
            println!("  {}", self.transition_line(transition));
        }
        println!();

        let state = self.colored_state(report.final_state);
        match report.failure {
            Some(reason) => println!("{} {} ({})", "RESULT".bold(), state, reason),
            None => println!("{} {}", "RESULT".bold(), state),
        }
        println!("  Status label: {}", report.status_text);
        println!("  Clock stopped at {}ms", report.elapsed_ms);
        println!();
    }

    pub fn save<P: AsRef<Path>>(&self, report: &SessionReport, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = ReportOutputFormat::for_path(path);
        let content = format.serialize(report)?;
        fs::write(path, content).with_context(|| format!("writing report {}", path.display()))?;
        println!("Report saved to: {}", path.display());
        Ok(())
    }

    /// Uncoloured rendering for text exports.
    pub fn plain_lines(&self, report: &SessionReport) -> Vec<String> {
        let mut lines = vec![
            format!("created: {}", report.created_at),
            format!("config: {}", report.config_source),
            format!("language: {}", report.language),
            format!("embed_url: {}", report.endpoints.embed_url),
            format!("direct_url: {}", report.endpoints.direct_url),
        ];
        for signal in &report.signals {
            let kind = match signal.kind {
                SignalKind::Load => "load",
                SignalKind::Error => "error",
            };
            lines.push(format!("signal {}@{}ms", kind, signal.at_ms));
        }
        for transition in &report.transitions {
            lines.push(format!(
                "transition {}: {} -> {} at {}ms{}",
                transition.cycle,
                transition.from,
                transition.to,
                transition.at_ms,
                transition
                    .reason
                    .map(|reason| format!(" ({})", reason))
                    .unwrap_or_default()
            ));
        }
        lines.push(format!("final: {}", report.final_state));
        lines
    }

    fn transition_line(&self, transition: &Transition) -> String {
        let mut line = format!(
            "{:>7}ms  cycle {}  {} -> {}",
            transition.at_ms,
            transition.cycle,
            transition.from,
            self.colored_state(transition.to)
        );
        if let Some(reason) = transition.reason {
            line.push_str(&format!("  ({})", reason));
        }
        line
    }

    fn colored_state(&self, state: EmbedState) -> ColoredString {
        match state {
            EmbedState::Connecting => state.as_str().yellow(),
            EmbedState::Connected => state.as_str().green(),
            EmbedState::Failed => state.as_str().red(),
        }
    }
}
