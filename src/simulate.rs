// SPDX-License-Identifier: PMPL-1.0-or-later

//! Scripted detection runs.
//!
//! Feeds a list of `load@<time>` / `error@<time>` signals into a shell with a
//! fixed frame size and records what the controller decided.

use crate::config::AppConfig;
use crate::i18n::{Catalog, I18n, Lang};
use crate::report::SessionReport;
use crate::shell::{NoFullscreen, Shell};
use crate::storage::MemoryPreferences;
use crate::types::{FrameRect, ScriptedSignal, SignalKind};
use crate::view::StaticProbe;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

/// Configuration for a simulation run
pub struct SimulationConfig {
    /// Config file; the built-in config when `None`
    pub config_path: Option<PathBuf>,
    /// Directory with `en.json`/`zh.json`; the built-in tables when `None`
    pub locales_dir: Option<PathBuf>,
    pub lang: Lang,
    pub signals: Vec<ScriptedSignal>,
    /// Rendered frame size seen by the blocking heuristic
    pub frame: Option<FrameRect>,
    /// Stop the clock here instead of running every pending check
    pub until: Option<Duration>,
    /// Sleep through the delays instead of jumping the clock
    pub realtime: bool,
}

pub fn run(config: &SimulationConfig) -> Result<SessionReport> {
    let app_config = AppConfig::load_or_builtin(config.config_path.as_deref())?;
    let catalog = Catalog::load_or_builtin(config.locales_dir.as_deref())?;
    let prefs = MemoryPreferences::with(crate::storage::LANGUAGE_KEY, config.lang.code());
    let i18n = I18n::new(catalog, Box::new(prefs), None);
    let mut shell = Shell::new(
        app_config,
        i18n,
        StaticProbe(config.frame),
        Box::new(NoFullscreen),
    );

    let mut signals = config.signals.clone();
    signals.sort_by_key(|signal| signal.at_ms);
    let started = Instant::now();

    for signal in &signals {
        let at = Duration::from_millis(signal.at_ms);
        if config.until.is_some_and(|until| at > until) {
            break;
        }
        step_to(&mut shell, at, config.realtime, started);
        match signal.kind {
            SignalKind::Load => shell.frame_loaded(),
            SignalKind::Error => shell.frame_errored(),
        }
    }

    match config.until {
        Some(until) => step_to(&mut shell, until, config.realtime, started),
        None => {
            while let Some(deadline) = shell.next_deadline() {
                step_to(&mut shell, deadline, config.realtime, started);
            }
        }
    }

    Ok(SessionReport {
        created_at: Utc::now().to_rfc3339(),
        config_source: config
            .config_path
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "built-in".to_string()),
        language: config.lang,
        endpoints: shell.endpoints().clone(),
        frame: config.frame,
        signals,
        transitions: shell.transitions().to_vec(),
        final_state: shell.status().state(),
        failure: shell.status().failure(),
        elapsed_ms: shell.now().as_millis() as u64,
        status_text: shell.page().status_text,
    })
}

fn step_to<P: crate::view::FrameProbe + Clone>(
    shell: &mut Shell<P>,
    at: Duration,
    realtime: bool,
    started: Instant,
) {
    if realtime {
        let elapsed = started.elapsed();
        if at > elapsed {
            thread::sleep(at - elapsed);
        }
    }
    shell.advance_to(at);
}

/// Parse `load@1.5s`, `error@300ms`, `load@2` (seconds).
pub fn parse_signal(raw: &str) -> Result<ScriptedSignal> {
    let (kind, at) = raw
        .split_once('@')
        .ok_or_else(|| anyhow!("signal '{}' must look like load@<time> or error@<time>", raw))?;
    let kind = match kind.trim().to_ascii_lowercase().as_str() {
        "load" => SignalKind::Load,
        "error" => SignalKind::Error,
        other => return Err(anyhow!("unknown signal '{}'", other)),
    };
    let at = parse_duration(at)?;
    Ok(ScriptedSignal {
        kind,
        at_ms: at.as_millis() as u64,
    })
}

/// Parse `300ms`, `1.5s`, `2m`; bare numbers are seconds.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let trimmed = raw.trim().to_ascii_lowercase();
    if trimmed.is_empty() {
        return Err(anyhow!("duration cannot be empty"));
    }

    let (value_str, unit) = if let Some(value) = trimmed.strip_suffix("ms") {
        (value, "ms")
    } else if let Some(value) = trimmed.strip_suffix('s') {
        (value, "s")
    } else if let Some(value) = trimmed.strip_suffix('m') {
        (value, "m")
    } else {
        (trimmed.as_str(), "s")
    };

    let value: f64 = value_str
        .trim()
        .parse()
        .with_context(|| format!("invalid duration '{}'", raw))?;
    if value.is_sign_negative() || !value.is_finite() {
        return Err(anyhow!("duration must be a non-negative number: {}", raw));
    }

    let millis = match unit {
        "ms" => value,
        "m" => value * 60_000.0,
        _ => value * 1000.0,
    };
    Ok(Duration::from_millis(millis.round() as u64))
}
