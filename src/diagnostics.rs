// SPDX-License-Identifier: PMPL-1.0-or-later

use crate::config::{AppConfig, Endpoints};
use crate::i18n::{host_locale_tag, Catalog, Lang};
use crate::storage::{FilePreferences, PreferenceStore, LANGUAGE_KEY};
use crate::template::TemplateLocalizer;
use anyhow::{anyhow, Result};
use std::fs;
use std::path::Path;

pub struct DiagnosticsInput<'a> {
    pub config_path: Option<&'a Path>,
    pub locales_dir: Option<&'a Path>,
    pub template_path: Option<&'a Path>,
    pub prefs: &'a FilePreferences,
}

pub fn run_self_diagnostics(input: &DiagnosticsInput<'_>) -> Result<()> {
    println!("embed-shell self-diagnostics");

    let mut checks = vec![Diagnostic::ok(
        "version",
        format!("embed-shell {}", env!("CARGO_PKG_VERSION")),
    )];

    let config = match AppConfig::load_or_builtin(input.config_path) {
        Ok(config) => {
            let source = input
                .config_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "built-in".to_string());
            checks.push(Diagnostic::ok(
                "app config",
                format!(
                    "{} (timeout {}ms, detection {}ms)",
                    source, config.streamlit.load_timeout, config.streamlit.detection_timeout
                ),
            ));
            Some(config)
        }
        Err(err) => {
            checks.push(Diagnostic::error("app config", format!("{:#}", err)));
            None
        }
    };

    let catalog = match Catalog::load_or_builtin(input.locales_dir) {
        Ok(catalog) => {
            checks.push(check_catalog(&catalog));
            Some(catalog)
        }
        Err(err) => {
            checks.push(Diagnostic::error("locale tables", format!("{:#}", err)));
            None
        }
    };

    if let (Some(config), Some(catalog)) = (&config, &catalog) {
        for lang in Lang::all() {
            let endpoints = Endpoints::resolve(config, catalog, *lang);
            checks.push(Diagnostic::ok(
                "endpoints",
                format!("{}: {}", lang, endpoints.embed_url),
            ));
        }
    }

    if let (Some(path), Some(catalog)) = (input.template_path, &catalog) {
        checks.push(check_template(path, catalog));
    }

    checks.push(check_preferences(input.prefs));
    checks.push(match host_locale_tag() {
        Some(tag) => Diagnostic::ok("host locale", tag),
        None => Diagnostic::warning(
            "host locale",
            "LANG/LC_ALL not set (first run defaults to English)".to_string(),
        ),
    });

    println!();
    for entry in &checks {
        entry.print();
    }

    if checks
        .iter()
        .any(|entry| matches!(entry.level, Level::Error))
    {
        Err(anyhow!("self-diagnostics reported issues"))
    } else {
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Level {
    Ok,
    Warn,
    Error,
}

struct Diagnostic {
    label: &'static str,
    level: Level,
    detail: String,
}

impl Diagnostic {
    fn new(label: &'static str, level: Level, detail: String) -> Self {
        Self {
            label,
            level,
            detail,
        }
    }

    fn ok(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Ok, detail)
    }

    fn warning(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Warn, detail)
    }

    fn error(label: &'static str, detail: String) -> Self {
        Self::new(label, Level::Error, detail)
    }

    fn print(&self) {
        println!("  [{}] {:16} {}", self.level.tag(), self.label, self.detail);
    }
}

impl Level {
    fn tag(&self) -> &'static str {
        match self {
            Level::Ok => "OK",
            Level::Warn => "WARN",
            Level::Error => "ERR",
        }
    }
}

fn check_catalog(catalog: &Catalog) -> Diagnostic {
    let en = catalog.keys(Lang::En);
    let zh = catalog.keys(Lang::Zh);
    let missing_zh: Vec<&String> = en.iter().filter(|key| !zh.contains(key)).collect();
    let missing_en: Vec<&String> = zh.iter().filter(|key| !en.contains(key)).collect();
    if missing_zh.is_empty() && missing_en.is_empty() {
        Diagnostic::ok("locale tables", format!("{} keys in en and zh", en.len()))
    } else {
        Diagnostic::warning(
            "locale tables",
            format!(
                "missing in zh: {:?}; missing in en: {:?}",
                missing_zh, missing_en
            ),
        )
    }
}

fn check_template(path: &Path, catalog: &Catalog) -> Diagnostic {
    let html = match fs::read_to_string(path) {
        Ok(html) => html,
        Err(err) => {
            return Diagnostic::error("template", format!("{}: {}", path.display(), err));
        }
    };
    let localizer = match TemplateLocalizer::new() {
        Ok(localizer) => localizer,
        Err(err) => return Diagnostic::error("template", format!("{:#}", err)),
    };
    let keys = localizer.collect_keys(&html);
    let unknown: Vec<String> = keys
        .iter()
        .filter(|entry| {
            Lang::all()
                .iter()
                .any(|lang| catalog.lookup(*lang, &entry.key).is_none())
        })
        .map(|entry| entry.key.clone())
        .collect();
    if unknown.is_empty() {
        Diagnostic::ok(
            "template",
            format!("{} keys, all translated", keys.len()),
        )
    } else {
        Diagnostic::warning(
            "template",
            format!("untranslated keys: {}", unknown.join(", ")),
        )
    }
}

fn check_preferences(prefs: &FilePreferences) -> Diagnostic {
    match prefs.get(LANGUAGE_KEY) {
        Ok(Some(code)) if Lang::from_code(&code).is_some() => Diagnostic::ok(
            "preferences",
            format!("{} ({}={})", prefs.path().display(), LANGUAGE_KEY, code),
        ),
        Ok(Some(code)) => Diagnostic::warning(
            "preferences",
            format!("unsupported saved language '{}'", code),
        ),
        Ok(None) => Diagnostic::ok(
            "preferences",
            format!("{} (no language saved yet)", prefs.path().display()),
        ),
        Err(err) => Diagnostic::warning("preferences", format!("{:#}", err)),
    }
}
