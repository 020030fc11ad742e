// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language selection service.
//!
//! Holds the current language and the catalog, persists the selection
//! through a [`PreferenceStore`], and tells subscribers when it changes.
//! Passed explicitly to whatever needs translations; there is no global
//! instance.

use super::catalog::{Catalog, Lang};
use super::locale_tag::detect_language;
use crate::storage::{PreferenceStore, LANGUAGE_KEY};
use std::rc::Rc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageChanged {
    pub language: Lang,
}

type Listener = Box<dyn FnMut(&LanguageChanged)>;

pub struct I18n {
    catalog: Rc<Catalog>,
    current: Lang,
    prefs: Box<dyn PreferenceStore>,
    listeners: Vec<Listener>,
}

impl I18n {
    /// The saved preference wins; otherwise the host locale decides.
    pub fn new(
        catalog: Catalog,
        prefs: Box<dyn PreferenceStore>,
        host_tag: Option<&str>,
    ) -> Self {
        Self::with_fallback(catalog, prefs, host_tag, Lang::default())
    }

    /// Like [`I18n::new`], with `fallback` used when neither a saved choice
    /// nor a supported host locale is available.
    pub fn with_fallback(
        catalog: Catalog,
        prefs: Box<dyn PreferenceStore>,
        host_tag: Option<&str>,
        fallback: Lang,
    ) -> Self {
        let saved = match prefs.get(LANGUAGE_KEY) {
            Ok(value) => value.and_then(|code| Lang::from_code(&code)),
            Err(err) => {
                warn!("ignoring unreadable language preference: {:#}", err);
                None
            }
        };
        let current = saved.unwrap_or_else(|| detect_language(host_tag, fallback));
        debug!(language = %current, from_preference = saved.is_some(), "language selected");
        Self {
            catalog: Rc::new(catalog),
            current,
            prefs,
            listeners: Vec::new(),
        }
    }

    pub fn current(&self) -> Lang {
        self.current
    }

    pub fn available(&self) -> &'static [Lang] {
        Lang::all()
    }

    pub fn catalog(&self) -> Rc<Catalog> {
        Rc::clone(&self.catalog)
    }

    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog.t(self.current, key)
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&LanguageChanged) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Switch language, persist it, and notify subscribers.
    ///
    /// A failed write is logged; the switch still takes effect.
    pub fn set_language(&mut self, lang: Lang) -> bool {
        self.current = lang;
        if let Err(err) = self.prefs.set(LANGUAGE_KEY, lang.code()) {
            warn!("could not persist language preference: {:#}", err);
        }
        info!(language = %lang, "language switched");
        let event = LanguageChanged { language: lang };
        for listener in &mut self.listeners {
            listener(&event);
        }
        true
    }

    /// Like [`I18n::set_language`], for raw codes. Unknown codes change nothing.
    pub fn set_language_code(&mut self, code: &str) -> bool {
        match Lang::from_code(code) {
            Some(lang) => self.set_language(lang),
            None => {
                warn!(code, "unsupported language code");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryPreferences;
    use std::cell::RefCell;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn saved_preference_beats_host_locale() {
        let prefs = MemoryPreferences::with(LANGUAGE_KEY, "zh");
        let i18n = I18n::new(catalog(), Box::new(prefs), Some("en-US"));
        assert_eq!(i18n.current(), Lang::Zh);
    }

    #[test]
    fn host_locale_used_without_preference() {
        let i18n = I18n::new(catalog(), Box::new(MemoryPreferences::new()), Some("zh-CN"));
        assert_eq!(i18n.current(), Lang::Zh);
        assert_eq!(i18n.t("status.connecting"), "连接中...");
    }

    #[test]
    fn garbage_preference_falls_back_to_detection() {
        let prefs = MemoryPreferences::with(LANGUAGE_KEY, "klingon");
        let i18n = I18n::new(catalog(), Box::new(prefs), None);
        assert_eq!(i18n.current(), Lang::En);
    }

    #[test]
    fn configured_fallback_covers_unsupported_host_locale() {
        let i18n = I18n::with_fallback(
            catalog(),
            Box::new(MemoryPreferences::new()),
            Some("fr-FR"),
            Lang::Zh,
        );
        assert_eq!(i18n.current(), Lang::Zh);

        let prefs = MemoryPreferences::with(LANGUAGE_KEY, "en");
        let i18n = I18n::with_fallback(catalog(), Box::new(prefs), Some("fr-FR"), Lang::Zh);
        assert_eq!(i18n.current(), Lang::En);
    }

    #[test]
    fn set_language_notifies_subscribers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut i18n = I18n::new(catalog(), Box::new(MemoryPreferences::new()), None);
        i18n.subscribe(move |event| sink.borrow_mut().push(event.language));

        assert!(i18n.set_language(Lang::Zh));
        assert!(!i18n.set_language_code("xx"));
        assert!(i18n.set_language_code("en"));
        assert_eq!(*seen.borrow(), vec![Lang::Zh, Lang::En]);
    }
}
