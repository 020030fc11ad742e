// SPDX-License-Identifier: PMPL-1.0-or-later

//! Terminal front-end for the shell.
//!
//! Renders the headless page and feeds key presses through the same shortcut
//! table the web page uses. The detection clock follows wall time. `1` and
//! `2` stand in for the frame's load and error events.

use crate::i18n::Lang;
use crate::shell::{Action, ClickTarget, FlagFullscreen, FocusTarget, Key, KeyInput, Shell};
use crate::types::EmbedState;
use crate::view::{FrameProbe, PageModel};
use anyhow::Result;
use colored::*;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};
use std::time::{Duration, Instant};

pub struct ShellTui;

impl ShellTui {
    pub fn run<P: FrameProbe + Clone>(shell: &mut Shell<P>) -> Result<()> {
        terminal::enable_raw_mode()?;
        let result = Self::run_inner(shell);
        terminal::disable_raw_mode()?;
        result
    }

    /// Fullscreen host for the terminal: always granted, hides the header.
    pub fn fullscreen_host() -> Box<FlagFullscreen> {
        Box::new(FlagFullscreen::default())
    }

    fn run_inner<P: FrameProbe + Clone>(shell: &mut Shell<P>) -> Result<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        let started = Instant::now();
        let mut notice = String::new();

        loop {
            shell.advance_to(started.elapsed());
            Self::render(&mut stdout, shell, &notice)?;

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let Event::Key(KeyEvent {
                code, modifiers, ..
            }) = event::read()?
            else {
                continue;
            };

            let ctrl = modifiers.contains(KeyModifiers::CONTROL);
            match code {
                KeyCode::Char('q') if !ctrl => break,
                KeyCode::Char('c') if ctrl => break,
                KeyCode::Char('1') => {
                    shell.frame_loaded();
                    notice = "frame load event".to_string();
                }
                KeyCode::Char('2') => {
                    shell.frame_errored();
                    notice = "frame error event".to_string();
                }
                KeyCode::Char('m') => shell.toggle_language_menu(),
                KeyCode::Char('n') => shell.toggle_mobile_menu(),
                KeyCode::Char('h') => shell.hide_status_bar(),
                KeyCode::Char('x') => shell.click(ClickTarget::Elsewhere),
                _ => {
                    let Some(key) = map_key(code) else { continue };
                    let input = KeyInput {
                        key,
                        ctrl,
                        meta: modifiers.contains(KeyModifiers::SUPER),
                        target: FocusTarget::Page,
                    };
                    if let Some(action) = shell.handle_key(&input) {
                        notice = match action {
                            Action::Launch => {
                                format!("open {} in a browser", shell.launch_url())
                            }
                            other => format!("{:?}", other),
                        };
                    }
                }
            }
        }

        Ok(())
    }

    fn render<P: FrameProbe + Clone>(
        stdout: &mut impl Write,
        shell: &Shell<P>,
        notice: &str,
    ) -> Result<()> {
        let page = shell.page();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        if page.navigation && !shell.is_fullscreen() {
            writeln!(
                stdout,
                "{}  {} {}\r",
                page.document_title.bold().cyan(),
                page.current_flag,
                Self::status_badge(&page)
            )?;
            writeln!(stdout, "\r")?;
        }

        if page.language_menu {
            for lang in Lang::all() {
                writeln!(stdout, "  {} {}\r", lang.flag(), lang.display_name())?;
            }
            writeln!(stdout, "\r")?;
        }
        if page.mobile_menu {
            writeln!(stdout, "  {}\r", "[menu] launch · refresh · about".dimmed())?;
        }

        let catalog = shell.i18n().catalog();
        let lang = shell.i18n().current();
        if page.loading {
            writeln!(stdout, "  {}\r", catalog.t(lang, "loading.title").yellow())?;
            writeln!(stdout, "  {}\r", catalog.t(lang, "loading.message").dimmed())?;
        } else if page.fallback {
            writeln!(stdout, "  {}\r", catalog.t(lang, "fallback.title").red().bold())?;
            writeln!(stdout, "  {}\r", catalog.t(lang, "fallback.message"))?;
            if let Some(link) = page.direct_links.first() {
                writeln!(stdout, "  {} {}\r", catalog.t(lang, "fallback.action"), link.underline())?;
            }
        } else if page.frame_wrapper {
            let src = page.frame_src.as_deref().unwrap_or("");
            writeln!(stdout, "  [{}] {}\r", page.frame_title, src.underline())?;
        }

        if page.status_bar {
            writeln!(stdout, "\r")?;
            writeln!(stdout, "  {}\r", catalog.t(lang, "statusBar.message").green())?;
        }
        if page.info_modal {
            writeln!(stdout, "\r")?;
            writeln!(stdout, "  {}\r", catalog.t(lang, "info.title").bold())?;
            writeln!(stdout, "  {}\r", catalog.t(lang, "info.body"))?;
        }

        writeln!(stdout, "\r")?;
        writeln!(
            stdout,
            "  {}ms  {}\r",
            shell.now().as_millis(),
            notice.dimmed()
        )?;
        writeln!(
            stdout,
            "{}\r",
            "Keys: [1] load [2] error [L]aunch [R]efresh [I]nfo [E]n [C]n [F11] [Esc] [m]enu [q]uit"
                .dimmed()
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn status_badge(page: &PageModel) -> ColoredString {
        let label = format!("● {}", page.status_text);
        match page.indicator.state {
            EmbedState::Connecting => label.yellow(),
            EmbedState::Connected => label.green(),
            EmbedState::Failed => label.red(),
        }
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::F(n) => Some(Key::F(n)),
        _ => None,
    }
}
