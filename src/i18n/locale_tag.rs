// SPDX-License-Identifier: PMPL-1.0-or-later

//! Locale tag helpers.
//!
//! Browsers report BCP 47 tags (`zh-CN`), POSIX environments report
//! `zh_CN.UTF-8`. Only the primary language subtag matters here.

use super::catalog::Lang;

/// Lowercased primary subtag, or `None` if the tag has no alphabetic prefix.
///
/// # Examples
/// ```
/// use embed_shell::i18n::primary_subtag;
/// assert_eq!(primary_subtag("zh-Hant-TW").as_deref(), Some("zh"));
/// assert_eq!(primary_subtag("en_GB.UTF-8").as_deref(), Some("en"));
/// assert_eq!(primary_subtag("C"), None);
/// ```
pub fn primary_subtag(tag: &str) -> Option<String> {
    let primary = tag
        .trim()
        .split(|c: char| c == '-' || c == '_' || c == '.' || c == '@')
        .next()?;
    if (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(primary.to_ascii_lowercase())
    } else {
        None
    }
}

/// Pick the interface language for a host locale tag.
///
/// Chinese and English variants map to themselves; any other tag, or none,
/// gets `fallback`.
pub fn detect_language(tag: Option<&str>, fallback: Lang) -> Lang {
    match tag.and_then(primary_subtag).as_deref() {
        Some("zh") => Lang::Zh,
        Some("en") => Lang::En,
        _ => fallback,
    }
}

/// Locale tag of the current process, from the usual POSIX variables.
pub fn host_locale_tag() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chinese_variants_detected() {
        assert_eq!(detect_language(Some("zh"), Lang::En), Lang::Zh);
        assert_eq!(detect_language(Some("zh-TW"), Lang::En), Lang::Zh);
        assert_eq!(detect_language(Some("ZH_cn.UTF-8"), Lang::En), Lang::Zh);
    }

    #[test]
    fn english_tag_overrides_fallback() {
        assert_eq!(detect_language(Some("en_GB.UTF-8"), Lang::Zh), Lang::En);
    }

    #[test]
    fn unsupported_or_missing_tag_uses_fallback() {
        assert_eq!(detect_language(Some("fr-FR"), Lang::En), Lang::En);
        assert_eq!(detect_language(Some("fr-FR"), Lang::Zh), Lang::Zh);
        assert_eq!(detect_language(Some("POSIX"), Lang::Zh), Lang::Zh);
        assert_eq!(detect_language(None, Lang::Zh), Lang::Zh);
    }
}
