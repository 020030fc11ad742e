// SPDX-License-Identifier: PMPL-1.0-or-later

//! Translation catalog for embed-shell.
//!
//! Each language is a nested JSON dictionary (`locales/en.json`,
//! `locales/zh.json`), embedded at compile time; a directory holding edited
//! copies of both files can stand in for them. Keys are dot-separated
//! paths into that tree: `"status.connected"` reads
//! `{"status": {"connected": ...}}`.
//!
//! A lookup that does not end on a string returns the key itself and logs a
//! warning. Missing translations are never an error.

use super::locale_tag::primary_subtag;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::warn;

const EN_TABLE: &str = include_str!("../../locales/en.json");
const ZH_TABLE: &str = include_str!("../../locales/zh.json");

/// Supported interface languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Zh,
}

impl Lang {
    /// ISO 639-1 two-letter code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
        }
    }

    /// Parse a language code or a full locale tag (`zh-CN`, `en_US.UTF-8`).
    pub fn from_code(code: &str) -> Option<Lang> {
        match primary_subtag(code)?.as_str() {
            "en" => Some(Lang::En),
            "zh" => Some(Lang::Zh),
            _ => None,
        }
    }

    /// All supported languages, in menu order.
    pub fn all() -> &'static [Lang] {
        &[Lang::En, Lang::Zh]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Zh => "中文",
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Lang::En => "🇺🇸",
            Lang::Zh => "🇨🇳",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    en: Value,
    zh: Value,
}

impl Catalog {
    /// Tables compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json_strs(EN_TABLE, ZH_TABLE)
    }

    pub fn from_json_strs(en: &str, zh: &str) -> Result<Self> {
        let en = serde_json::from_str(en).context("parsing en locale table")?;
        let zh = serde_json::from_str(zh).context("parsing zh locale table")?;
        Self::from_tables(en, zh)
    }

    /// Read `en.json` and `zh.json` from a directory.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let read = |lang: Lang| -> Result<String> {
            let path = dir.join(format!("{}.json", lang.code()));
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
        };
        Self::from_json_strs(&read(Lang::En)?, &read(Lang::Zh)?)
    }

    /// Tables from `dir` when given, otherwise the built-in ones.
    pub fn load_or_builtin(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Self::builtin(),
        }
    }

    pub fn from_tables(en: Value, zh: Value) -> Result<Self> {
        for (lang, table) in [(Lang::En, &en), (Lang::Zh, &zh)] {
            if !table.is_object() {
                return Err(anyhow!("{} locale table must be a JSON object", lang));
            }
        }
        Ok(Self { en, zh })
    }

    pub fn table(&self, lang: Lang) -> &Value {
        match lang {
            Lang::En => &self.en,
            Lang::Zh => &self.zh,
        }
    }

    /// Walk a dotted key. `None` unless the path ends on a string.
    pub fn lookup(&self, lang: Lang, key: &str) -> Option<&str> {
        let mut node = self.table(lang);
        for segment in key.split('.') {
            node = node.as_object()?.get(segment)?;
        }
        node.as_str()
    }

    /// Look up a key, echoing the key back when it is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use embed_shell::i18n::{Catalog, Lang};
    /// let catalog = Catalog::builtin().unwrap();
    /// assert_eq!(catalog.t(Lang::En, "status.connected"), "Connected");
    /// assert_eq!(catalog.t(Lang::Zh, "status.connected"), "已连接");
    /// assert_eq!(catalog.t(Lang::En, "does.not.exist"), "does.not.exist");
    /// ```
    pub fn t<'a>(&'a self, lang: Lang, key: &'a str) -> &'a str {
        match self.lookup(lang, key) {
            Some(value) => value,
            None => {
                warn!(key, lang = %lang, "translation key not found");
                key
            }
        }
    }

    /// Every leaf key of a table, dotted and sorted.
    pub fn keys(&self, lang: Lang) -> Vec<String> {
        let mut keys = Vec::new();
        collect_keys(self.table(lang), String::new(), &mut keys);
        keys
    }
}

fn collect_keys(node: &Value, prefix: String, out: &mut Vec<String>) {
    match node {
        Value::Object(map) => {
            for (segment, child) in map {
                let key = if prefix.is_empty() {
                    segment.clone()
                } else {
                    format!("{}.{}", prefix, segment)
                };
                collect_keys(child, key, out);
            }
        }
        Value::String(_) => out.push(prefix),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builtin_tables_parse() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.t(Lang::En, "app.title"), "CBDB Agentic RAG Chat");
        assert_eq!(catalog.t(Lang::Zh, "status.failed"), "连接失败");
    }

    #[test]
    fn unknown_key_returns_key() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.t(Lang::En, "does.not.exist"), "does.not.exist");
        assert_eq!(catalog.t(Lang::Zh, "status"), "status");
    }

    #[test]
    fn no_cross_language_fallback() {
        let catalog =
            Catalog::from_tables(json!({"only": {"en": "English only"}}), json!({})).unwrap();
        assert_eq!(catalog.t(Lang::En, "only.en"), "English only");
        assert_eq!(catalog.t(Lang::Zh, "only.en"), "only.en");
    }

    #[test]
    fn both_tables_have_the_same_keys() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.keys(Lang::En), catalog.keys(Lang::Zh));
    }

    #[test]
    fn lang_accepts_locale_tags() {
        assert_eq!(Lang::from_code("zh-CN"), Some(Lang::Zh));
        assert_eq!(Lang::from_code("en_US.UTF-8"), Some(Lang::En));
        assert_eq!(Lang::from_code("fr"), None);
        for lang in Lang::all() {
            assert_eq!(Lang::from_code(lang.code()), Some(*lang));
        }
    }

    #[test]
    fn directory_without_tables_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Catalog::load_or_builtin(Some(dir.path())).unwrap_err();
        assert!(format!("{:#}", err).contains("en.json"));
        assert!(Catalog::load_or_builtin(None).is_ok());
    }

    #[test]
    fn non_object_table_is_rejected() {
        assert!(Catalog::from_tables(json!([]), json!({})).is_err());
    }
}
