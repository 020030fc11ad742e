// SPDX-License-Identifier: PMPL-1.0-or-later

//! Static page localisation.
//!
//! Rewrites an HTML template the way the page does at runtime:
//!
//! * `data-i18n="key"` replaces the element's text (for a text `<input>`,
//!   its `placeholder`);
//! * `data-i18n-html="key"` replaces the element's inner HTML verbatim;
//! * `<title>` becomes `app.title`;
//! * `<html lang>` becomes the language code.
//!
//! Tagged elements are expected to be leaves: the first matching close tag
//! ends the replaced region.

use crate::i18n::{Catalog, Lang};
use anyhow::{Context, Result};
use regex::{Captures, Regex};

pub struct TemplateLocalizer {
    open_tag: Regex,
    i18n_attr: Regex,
    type_attr: Regex,
    placeholder_attr: Regex,
    title: Regex,
    html_tag: Regex,
    lang_attr: Regex,
}

/// A key referenced by a template, and whether it is raw HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateKey {
    pub key: String,
    pub html: bool,
}

impl TemplateLocalizer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            open_tag: Regex::new(r"<([a-zA-Z][a-zA-Z0-9-]*)((?:\s[^>]*?)?)(/?)>")
                .context("compiling open tag pattern")?,
            i18n_attr: Regex::new(r#"\sdata-i18n(-html)?\s*=\s*"([^"]*)""#)
                .context("compiling data-i18n pattern")?,
            type_attr: Regex::new(r#"\stype\s*=\s*"([^"]*)""#).context("compiling type pattern")?,
            placeholder_attr: Regex::new(r#"\splaceholder\s*=\s*"[^"]*""#)
                .context("compiling placeholder pattern")?,
            title: Regex::new(r"(?is)(<title\b[^>]*>).*?(</title>)")
                .context("compiling title pattern")?,
            html_tag: Regex::new(r"(?i)<html\b[^>]*>").context("compiling html pattern")?,
            lang_attr: Regex::new(r#"\slang\s*=\s*"[^"]*""#).context("compiling lang pattern")?,
        })
    }

    pub fn localize(&self, html: &str, catalog: &Catalog, lang: Lang) -> String {
        let body = self.replace_tagged(html, catalog, lang);
        let titled = self.title.replace(&body, |caps: &Captures| {
            format!(
                "{}{}{}",
                &caps[1],
                escape_text(catalog.t(lang, "app.title")),
                &caps[2]
            )
        });
        self.html_tag
            .replace(&titled, |caps: &Captures| self.set_lang(&caps[0], lang))
            .into_owned()
    }

    /// Every `data-i18n` / `data-i18n-html` key, in document order.
    pub fn collect_keys(&self, html: &str) -> Vec<TemplateKey> {
        self.open_tag
            .captures_iter(html)
            .filter_map(|caps| {
                let attrs = caps.get(2)?.as_str();
                let attr = self.i18n_attr.captures(attrs)?;
                Some(TemplateKey {
                    key: attr[2].to_string(),
                    html: attr.get(1).is_some(),
                })
            })
            .collect()
    }

    fn replace_tagged(&self, html: &str, catalog: &Catalog, lang: Lang) -> String {
        let mut out = String::with_capacity(html.len());
        let mut cursor = 0;

        for caps in self.open_tag.captures_iter(html) {
            let Some(whole) = caps.get(0) else { continue };
            if whole.start() < cursor {
                continue;
            }
            let attrs = caps.get(2).map_or("", |m| m.as_str());
            let Some(attr) = self.i18n_attr.captures(attrs) else {
                continue;
            };
            let tag = caps[1].to_ascii_lowercase();
            let raw_html = attr.get(1).is_some();
            let translation = catalog.t(lang, &attr[2]);

            out.push_str(&html[cursor..whole.start()]);

            if !raw_html && tag == "input" && self.is_text_input(attrs) {
                out.push_str(&self.with_placeholder(whole.as_str(), attrs, translation));
                cursor = whole.end();
                continue;
            }

            let self_closing = !caps[3].is_empty();
            let close = format!("</{}", &caps[1]);
            let close_at = if self_closing {
                None
            } else {
                find_ignore_case(&html[whole.end()..], &close).map(|offset| whole.end() + offset)
            };

            out.push_str(whole.as_str());
            match close_at {
                Some(close_at) => {
                    if raw_html {
                        out.push_str(translation);
                    } else {
                        out.push_str(&escape_text(translation));
                    }
                    cursor = close_at;
                }
                None => cursor = whole.end(),
            }
        }

        out.push_str(&html[cursor..]);
        out
    }

    fn is_text_input(&self, attrs: &str) -> bool {
        match self.type_attr.captures(attrs) {
            Some(caps) => caps[1].eq_ignore_ascii_case("text"),
            // inputs default to text
            None => true,
        }
    }

    fn with_placeholder(&self, tag: &str, attrs: &str, translation: &str) -> String {
        let placeholder = format!(" placeholder=\"{}\"", escape_attr(translation));
        if self.placeholder_attr.is_match(attrs) {
            self.placeholder_attr
                .replace(tag, placeholder.as_str())
                .into_owned()
        } else {
            insert_before_close(tag, &placeholder)
        }
    }

    fn set_lang(&self, tag: &str, lang: Lang) -> String {
        let attr = format!(" lang=\"{}\"", lang.code());
        if self.lang_attr.is_match(tag) {
            self.lang_attr.replace(tag, attr.as_str()).into_owned()
        } else {
            insert_before_close(tag, &attr)
        }
    }
}

fn insert_before_close(tag: &str, attr: &str) -> String {
    let end = if tag.ends_with("/>") {
        tag.len() - 2
    } else {
        tag.len() - 1
    };
    let head = tag[..end].trim_end();
    format!("{}{}{}", head, attr, &tag[end..])
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.to_ascii_lowercase();
    haystack.to_ascii_lowercase().find(&needle)
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// One-shot helper around [`TemplateLocalizer`].
pub fn localize_html(html: &str, catalog: &Catalog, lang: Lang) -> Result<String> {
    Ok(TemplateLocalizer::new()?.localize(html, catalog, lang))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!doctype html>
<html lang="en" class="h-full">
<head><title>placeholder</title></head>
<body>
  <h1 class="text-xl" data-i18n="app.title">CBDB</h1>
  <span data-i18n="status.connecting">Connecting</span>
  <input type="text" data-i18n="search.placeholder" placeholder="Search">
  <input data-i18n="search.placeholder">
  <p data-i18n-html="info.body">about</p>
  <button data-i18n="missing.key">x</button>
</body>
</html>"#;

    fn localize(lang: Lang) -> String {
        let catalog = Catalog::builtin().unwrap();
        localize_html(PAGE, &catalog, lang).unwrap()
    }

    #[test]
    fn replaces_text_and_title() {
        let out = localize(Lang::Zh);
        assert!(out.contains(r#"<h1 class="text-xl" data-i18n="app.title">CBDB 智能检索问答</h1>"#));
        assert!(out.contains("<title>CBDB 智能检索问答</title>"));
        assert!(out.contains(r#"<span data-i18n="status.connecting">连接中...</span>"#));
    }

    #[test]
    fn sets_html_lang() {
        let out = localize(Lang::Zh);
        assert!(out.contains(r#"<html lang="zh" class="h-full">"#));
    }

    #[test]
    fn text_inputs_get_placeholders() {
        let out = localize(Lang::En);
        assert!(out.contains(
            r#"<input type="text" data-i18n="search.placeholder" placeholder="Search the database...">"#
        ));
        assert!(out.contains(
            r#"<input data-i18n="search.placeholder" placeholder="Search the database...">"#
        ));
    }

    #[test]
    fn html_keys_are_not_escaped() {
        let out = localize(Lang::En);
        assert!(out.contains("<strong>China Biographical Database</strong>"));
    }

    #[test]
    fn missing_keys_echo_the_key() {
        let out = localize(Lang::En);
        assert!(out.contains(r#"<button data-i18n="missing.key">missing.key</button>"#));
    }

    #[test]
    fn collects_keys_in_order() {
        let localizer = TemplateLocalizer::new().unwrap();
        let keys = localizer.collect_keys(PAGE);
        let names: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "app.title",
                "status.connecting",
                "search.placeholder",
                "search.placeholder",
                "info.body",
                "missing.key"
            ]
        );
        assert!(keys[4].html);
        assert!(!keys[0].html);
    }

    #[test]
    fn adds_lang_when_absent() {
        assert_eq!(insert_before_close("<html>", " lang=\"en\""), "<html lang=\"en\">");
    }
}
