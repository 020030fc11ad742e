// SPDX-License-Identifier: PMPL-1.0-or-later

//! Application shell: wires the controller, the i18n service, the config and
//! the page together, and maps user input onto them.

mod fullscreen;
mod keys;

pub use fullscreen::{FlagFullscreen, FullscreenHost, NoFullscreen};
pub use keys::{shortcut_for, Action, FocusTarget, Key, KeyInput};

use crate::config::{AppConfig, Endpoints};
use crate::controller::EmbedController;
use crate::i18n::{Catalog, I18n, Lang, LanguageChanged};
use crate::status::EmbedStatus;
use crate::types::Transition;
use crate::view::{Element, EmbedView, FrameProbe, PageModel, SharedPage};
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a click landed, as far as menu dismissal cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Navigation,
    LanguageToggle,
    LanguageMenu,
    ModalBackdrop,
    ModalContent,
    Elsewhere,
}

/// How a refresh was carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// The frame had loaded, so only the detection cycle restarted.
    Reset,
    /// Nothing had loaded; the whole shell was rebuilt.
    Reload,
}

pub struct Shell<P: FrameProbe + Clone> {
    config: AppConfig,
    i18n: I18n,
    endpoints: Endpoints,
    page: SharedPage,
    controller: EmbedController<SharedPage, P>,
    probe: P,
    fullscreen: Box<dyn FullscreenHost>,
    reloads: u32,
}

impl<P: FrameProbe + Clone> Shell<P> {
    pub fn new(
        config: AppConfig,
        mut i18n: I18n,
        probe: P,
        fullscreen: Box<dyn FullscreenHost>,
    ) -> Self {
        let page = SharedPage::new();
        let listener_page = page.clone();
        let catalog = i18n.catalog();
        i18n.subscribe(move |event: &LanguageChanged| {
            apply_language(&listener_page, &catalog, event.language);
        });

        let endpoints = Endpoints::resolve(&config, &i18n.catalog(), i18n.current());
        let controller =
            EmbedController::new(config.detection_settings(), page.clone(), probe.clone());
        let mut shell = Self {
            config,
            i18n,
            endpoints,
            page,
            controller,
            probe,
            fullscreen,
            reloads: 0,
        };
        shell.initialize();
        shell
    }

    fn initialize(&mut self) {
        let lang = self.i18n.current();
        apply_language(&self.page, &self.i18n.catalog(), lang);
        let embed_url = self.endpoints.embed_url.clone();
        let direct_url = self.endpoints.direct_url.clone();
        self.page.update(|page| {
            page.point_frame(&embed_url);
            page.set_direct_links(&direct_url);
        });
        self.sync_status_text();
        info!(
            direct = %self.endpoints.direct_url,
            embed = %self.endpoints.embed_url,
            language = %lang,
            "shell initialised"
        );
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn status(&self) -> &EmbedStatus {
        self.controller.status()
    }

    pub fn transitions(&self) -> &[Transition] {
        self.controller.transitions()
    }

    pub fn page(&self) -> PageModel {
        self.page.snapshot()
    }

    pub fn now(&self) -> Duration {
        self.controller.now()
    }

    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.controller.next_deadline()
    }

    /// Number of full reloads since construction.
    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_fullscreen()
    }

    pub fn launch_url(&self) -> &str {
        &self.endpoints.direct_url
    }

    // ─── Host signals ───────────────────────────────────────────────

    pub fn frame_loaded(&mut self) {
        self.controller.report_load_event();
    }

    pub fn frame_errored(&mut self) {
        self.controller.report_error_event();
        self.sync_status_text();
    }

    pub fn advance(&mut self, elapsed: Duration) {
        self.controller.advance(elapsed);
        self.sync_status_text();
    }

    pub fn advance_to(&mut self, at: Duration) {
        self.controller.advance_to(at);
        self.sync_status_text();
    }

    pub fn run_until_settled(&mut self) {
        self.controller.run_until_settled();
        self.sync_status_text();
    }

    // ─── User actions ───────────────────────────────────────────────

    /// Switch language without touching the detection cycle.
    pub fn switch_language(&mut self, lang: Lang) {
        self.i18n.set_language(lang);
        self.page
            .update(|page| page.set_visible(Element::LanguageMenu, false));
        self.endpoints = Endpoints::resolve(&self.config, &self.i18n.catalog(), lang);
        let embed_url = self.endpoints.embed_url.clone();
        let direct_url = self.endpoints.direct_url.clone();
        self.page.update(|page| {
            page.point_frame(&embed_url);
            page.set_direct_links(&direct_url);
        });
        self.sync_status_text();
    }

    /// Restart detection if the frame had loaded, otherwise rebuild.
    pub fn refresh(&mut self) -> RefreshKind {
        if self.controller.status().is_loaded() {
            self.endpoints =
                Endpoints::resolve(&self.config, &self.i18n.catalog(), self.i18n.current());
            self.controller.reset(&self.endpoints.embed_url);
            self.sync_status_text();
            RefreshKind::Reset
        } else {
            self.reload();
            RefreshKind::Reload
        }
    }

    /// Rebuild the page and the controller from scratch.
    pub fn reload(&mut self) {
        self.reloads += 1;
        info!(reloads = self.reloads, "reloading shell");
        self.page.update(|page| *page = PageModel::new());
        self.endpoints =
            Endpoints::resolve(&self.config, &self.i18n.catalog(), self.i18n.current());
        // hosts keep driving the clock with absolute times
        self.controller = EmbedController::starting_at(
            self.controller.now(),
            self.config.detection_settings(),
            self.page.clone(),
            self.probe.clone(),
        );
        self.initialize();
    }

    pub fn toggle_language_menu(&mut self) {
        self.page.update(|page| page.toggle(Element::LanguageMenu));
    }

    pub fn toggle_mobile_menu(&mut self) {
        self.page.update(|page| page.toggle(Element::MobileMenu));
    }

    pub fn show_info(&mut self) {
        self.page
            .update(|page| page.set_visible(Element::InfoModal, true));
    }

    pub fn hide_info(&mut self) {
        self.page
            .update(|page| page.set_visible(Element::InfoModal, false));
    }

    pub fn hide_status_bar(&mut self) {
        self.page
            .update(|page| page.set_visible(Element::StatusBar, false));
    }

    /// Fullscreen when the host allows it, otherwise hide the navigation bar.
    pub fn toggle_fullscreen(&mut self) {
        if self.fullscreen.is_fullscreen() {
            if let Err(err) = self.fullscreen.exit() {
                warn!("error leaving fullscreen: {:#}", err);
            }
            return;
        }
        if let Err(err) = self.fullscreen.request() {
            warn!("error attempting to enable fullscreen: {:#}", err);
            self.page.update(|page| page.toggle(Element::Navigation));
        }
    }

    pub fn click(&mut self, target: ClickTarget) {
        self.page.update(|page| {
            if target != ClickTarget::Navigation && page.mobile_menu {
                page.set_visible(Element::MobileMenu, false);
            }
            if !matches!(
                target,
                ClickTarget::LanguageToggle | ClickTarget::LanguageMenu
            ) {
                page.set_visible(Element::LanguageMenu, false);
            }
            if target == ClickTarget::ModalBackdrop {
                page.set_visible(Element::InfoModal, false);
            }
        });
    }

    /// Run the shortcut bound to `input`, if any.
    ///
    /// `Action::Launch` is returned for the host to open
    /// [`Shell::launch_url`] in a new window; every other action is applied
    /// here.
    pub fn handle_key(&mut self, input: &KeyInput) -> Option<Action> {
        let action = shortcut_for(input)?;
        debug!(?action, "shortcut");
        match action {
            Action::Launch => {}
            Action::Refresh => {
                self.refresh();
            }
            Action::ShowInfo => self.show_info(),
            Action::CloseOverlays => {
                self.hide_info();
                self.page.update(|page| {
                    page.set_visible(Element::MobileMenu, false);
                    page.set_visible(Element::LanguageMenu, false);
                });
            }
            Action::ToggleFullscreen => self.toggle_fullscreen(),
            Action::SwitchLanguage(lang) => self.switch_language(lang),
        }
        Some(action)
    }

    fn sync_status_text(&self) {
        let catalog = self.i18n.catalog();
        let lang = self.i18n.current();
        self.page.update(|page| {
            page.status_text = catalog.t(lang, page.indicator.label_key).to_string();
        });
    }
}

/// Language-dependent page chrome: titles, `lang`, flag, status label.
fn apply_language(page: &SharedPage, catalog: &Rc<Catalog>, lang: Lang) {
    let title = catalog.t(lang, "app.title");
    page.update(|page| {
        page.document_title = title.to_string();
        page.frame_title = format!("{} Application", title);
        page.document_lang = lang.code().to_string();
        page.current_flag = lang.flag().to_string();
        page.status_text = catalog.t(lang, page.indicator.label_key).to_string();
    });
}
