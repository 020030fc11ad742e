// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fullscreen hosts.

use anyhow::{anyhow, Result};

pub trait FullscreenHost {
    fn is_fullscreen(&self) -> bool;
    fn request(&mut self) -> Result<()>;
    fn exit(&mut self) -> Result<()>;
}

/// Host without a fullscreen API. Every request fails, which sends the
/// shell down the pseudo-fullscreen path (hiding the navigation bar).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFullscreen;

impl FullscreenHost for NoFullscreen {
    fn is_fullscreen(&self) -> bool {
        false
    }

    fn request(&mut self) -> Result<()> {
        Err(anyhow!("fullscreen is not available on this host"))
    }

    fn exit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Host that always grants fullscreen and just remembers the flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagFullscreen {
    active: bool,
}

impl FullscreenHost for FlagFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.active
    }

    fn request(&mut self) -> Result<()> {
        self.active = true;
        Ok(())
    }

    fn exit(&mut self) -> Result<()> {
        self.active = false;
        Ok(())
    }
}
