// SPDX-License-Identifier: PMPL-1.0-or-later

//! embed-shell: the logic behind a page that embeds a third-party web
//! application in a frame.
//!
//! The interesting part is the embed-status controller. It races four
//! detectors (load confirmation after a settle delay, the error event, a
//! timeout guard, and a zero-size blocking heuristic) and shows exactly one
//! outcome per cycle: the embedded app, or fallback content with a direct
//! link.
//!
//! PIECES:
//! 1. **Controller** (`controller`, `status`, `timeline`): the tri-state
//!    machine and its virtual-clock timers.
//! 2. **i18n** (`i18n`, `storage`, `template`): English/Chinese tables,
//!    the persisted language choice, and static page localisation.
//! 3. **Shell** (`shell`, `view`, `config`): endpoints, page model,
//!    shortcuts, refresh and fullscreen.

pub mod config;
pub mod controller;
pub mod diagnostics;
pub mod i18n;
pub mod report;
pub mod shell;
pub mod simulate;
pub mod status;
pub mod storage;
pub mod template;
pub mod timeline;
pub mod tui;
pub mod types;
pub mod view;
