// SPDX-License-Identifier: PMPL-1.0-or-later

//! Internationalisation module for embed-shell.
//!
//! ## Supported languages
//!
//! | Code | Language | Native name |
//! |------|----------|-------------|
//! | en   | English  | English     |
//! | zh   | Chinese  | 中文         |
//!
//! ## Design
//!
//! Translation keys use dotted paths into nested tables:
//! `"status.connected"`, `"fallback.title"`. A missing key returns the key
//! string itself (fail-open, never panics) and leaves a `warn` line in the
//! log. There is no fallback between languages.
//!
//! The selected language lives in an [`I18n`] service that callers pass
//! around explicitly.

mod catalog;
mod locale_tag;
mod service;

pub use catalog::{Catalog, Lang};
pub use locale_tag::{detect_language, host_locale_tag, primary_subtag};
pub use service::{I18n, LanguageChanged};
