// SPDX-License-Identifier: PMPL-1.0-or-later

//! View binding for the embed shell.
//!
//! The controller only talks to [`EmbedView`] and [`FrameProbe`]; the
//! headless [`PageModel`] implements both so the state machine can be driven
//! and inspected without a rendering environment.

use crate::types::{EmbedState, FrameRect};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Visual side effects of the embed status.
pub trait EmbedView {
    fn show_loading(&mut self);
    fn hide_loading(&mut self);
    fn show_frame(&mut self);
    fn hide_frame(&mut self);
    fn show_fallback(&mut self);
    fn hide_fallback(&mut self);
    fn set_status(&mut self, state: EmbedState);
    fn reveal_status_bar(&mut self);
    fn point_frame(&mut self, url: &str);
}

/// Reads the frame's rendered box. `None` means nothing was laid out.
pub trait FrameProbe {
    fn rendered_size(&self) -> Option<FrameRect>;
}

/// Fixed-size probe, handy for simulations.
#[derive(Debug, Clone, Copy)]
pub struct StaticProbe(pub Option<FrameRect>);

impl FrameProbe for StaticProbe {
    fn rendered_size(&self) -> Option<FrameRect> {
        self.0
    }
}

impl<P: FrameProbe + ?Sized> FrameProbe for Rc<P> {
    fn rendered_size(&self) -> Option<FrameRect> {
        (**self).rendered_size()
    }
}

/// Colour and label of the connection dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusIndicator {
    pub state: EmbedState,
    pub dot_classes: Vec<&'static str>,
    pub label_key: &'static str,
}

impl StatusIndicator {
    pub fn for_state(state: EmbedState) -> Self {
        let mut dot_classes = vec!["w-2", "h-2", "rounded-full"];
        match state {
            EmbedState::Connecting => dot_classes.extend(["bg-yellow-400", "animate-pulse"]),
            EmbedState::Connected => dot_classes.extend(["bg-green-400", "animate-pulse"]),
            EmbedState::Failed => dot_classes.push("bg-red-400"),
        }
        Self {
            state,
            dot_classes,
            label_key: state.i18n_key(),
        }
    }

    pub fn is_pulsing(&self) -> bool {
        self.dot_classes.contains(&"animate-pulse")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Element {
    Loading,
    FrameWrapper,
    Fallback,
    StatusBar,
    Navigation,
    MobileMenu,
    LanguageMenu,
    InfoModal,
}

/// Headless page: visibility of each region plus the bits of text and
/// addresses the shell keeps in sync.
#[derive(Debug, Clone, Serialize)]
pub struct PageModel {
    pub loading: bool,
    pub frame_wrapper: bool,
    pub fallback: bool,
    pub status_bar: bool,
    pub navigation: bool,
    pub mobile_menu: bool,
    pub language_menu: bool,
    pub info_modal: bool,
    pub indicator: StatusIndicator,
    pub status_text: String,
    pub frame_src: Option<String>,
    pub frame_title: String,
    pub direct_links: Vec<String>,
    pub document_title: String,
    pub document_lang: String,
    pub current_flag: String,
    /// Count of fallback reveals, used to check at-most-once display.
    pub fallback_reveals: u32,
    /// Count of visibility or indicator changes.
    pub changes: u32,
}

impl Default for PageModel {
    fn default() -> Self {
        Self {
            loading: true,
            frame_wrapper: true,
            fallback: false,
            status_bar: false,
            navigation: true,
            mobile_menu: false,
            language_menu: false,
            info_modal: false,
            indicator: StatusIndicator::for_state(EmbedState::Connecting),
            status_text: String::new(),
            frame_src: None,
            frame_title: String::new(),
            direct_links: vec![String::new(); 2],
            document_title: String::new(),
            document_lang: String::new(),
            current_flag: String::new(),
            fallback_reveals: 0,
            changes: 0,
        }
    }
}

impl PageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self, element: Element) -> bool {
        match element {
            Element::Loading => self.loading,
            Element::FrameWrapper => self.frame_wrapper,
            Element::Fallback => self.fallback,
            Element::StatusBar => self.status_bar,
            Element::Navigation => self.navigation,
            Element::MobileMenu => self.mobile_menu,
            Element::LanguageMenu => self.language_menu,
            Element::InfoModal => self.info_modal,
        }
    }

    pub fn set_visible(&mut self, element: Element, visible: bool) {
        let slot = match element {
            Element::Loading => &mut self.loading,
            Element::FrameWrapper => &mut self.frame_wrapper,
            Element::Fallback => &mut self.fallback,
            Element::StatusBar => &mut self.status_bar,
            Element::Navigation => &mut self.navigation,
            Element::MobileMenu => &mut self.mobile_menu,
            Element::LanguageMenu => &mut self.language_menu,
            Element::InfoModal => &mut self.info_modal,
        };
        if *slot != visible {
            *slot = visible;
            self.changes += 1;
        }
    }

    pub fn toggle(&mut self, element: Element) {
        let visible = self.is_visible(element);
        self.set_visible(element, !visible);
    }

    pub fn set_direct_links(&mut self, url: &str) {
        for link in &mut self.direct_links {
            link.clear();
            link.push_str(url);
        }
    }
}

impl EmbedView for PageModel {
    fn show_loading(&mut self) {
        self.set_visible(Element::Loading, true);
    }

    fn hide_loading(&mut self) {
        self.set_visible(Element::Loading, false);
    }

    fn show_frame(&mut self) {
        self.set_visible(Element::FrameWrapper, true);
    }

    fn hide_frame(&mut self) {
        self.set_visible(Element::FrameWrapper, false);
    }

    fn show_fallback(&mut self) {
        if !self.fallback {
            self.fallback_reveals += 1;
        }
        self.set_visible(Element::Fallback, true);
    }

    fn hide_fallback(&mut self) {
        self.set_visible(Element::Fallback, false);
    }

    fn set_status(&mut self, state: EmbedState) {
        if self.indicator.state != state {
            self.changes += 1;
        }
        self.indicator = StatusIndicator::for_state(state);
    }

    fn reveal_status_bar(&mut self) {
        self.set_visible(Element::StatusBar, true);
    }

    fn point_frame(&mut self, url: &str) {
        self.frame_src = Some(url.to_string());
    }
}

/// Page shared between the controller (writer) and the shell (reader).
#[derive(Debug, Clone, Default)]
pub struct SharedPage(Rc<RefCell<PageModel>>);

impl SharedPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageModel {
        self.0.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&PageModel) -> R) -> R {
        f(&self.0.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut PageModel) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }
}

impl EmbedView for SharedPage {
    fn show_loading(&mut self) {
        self.0.borrow_mut().show_loading();
    }

    fn hide_loading(&mut self) {
        self.0.borrow_mut().hide_loading();
    }

    fn show_frame(&mut self) {
        self.0.borrow_mut().show_frame();
    }

    fn hide_frame(&mut self) {
        self.0.borrow_mut().hide_frame();
    }

    fn show_fallback(&mut self) {
        self.0.borrow_mut().show_fallback();
    }

    fn hide_fallback(&mut self) {
        self.0.borrow_mut().hide_fallback();
    }

    fn set_status(&mut self, state: EmbedState) {
        self.0.borrow_mut().set_status(state);
    }

    fn reveal_status_bar(&mut self) {
        self.0.borrow_mut().reveal_status_bar();
    }

    fn point_frame(&mut self, url: &str) {
        self.0.borrow_mut().point_frame(url);
    }
}
