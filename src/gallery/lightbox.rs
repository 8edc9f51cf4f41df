use std::time::Duration;

use crate::config::ZoomConfig;

use super::navigator::{LoadRequest, Navigator};
use super::zoom::ZoomState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxControl {
    Close,
    Previous,
    Next,
    Info,
    Action,
}

impl LightboxControl {
    pub fn label(self) -> &'static str {
        match self {
            Self::Close => "Close",
            Self::Previous => "Prev",
            Self::Next => "Next",
            Self::Info => "Info",
            Self::Action => "Action",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeOutcome {
    ExitedZoom,
    CollapsedInfo,
    Closed,
    Ignored,
}

/// Full-screen viewer with its own navigation context.
#[derive(Debug, Clone)]
pub struct Lightbox {
    navigator: Navigator,
    zoom: ZoomState,
    open: bool,
    info_expanded: bool,
    focus: usize,
    action_available: bool,
}

impl Lightbox {
    pub fn new(fade: Duration, zoom: ZoomConfig) -> Self {
        Self {
            navigator: Navigator::new(fade, false),
            zoom: ZoomState::new(zoom),
            open: false,
            info_expanded: false,
            focus: 0,
            action_available: false,
        }
    }

    pub fn open(&mut self, items: Vec<usize>, index: usize) -> Option<LoadRequest> {
        self.open = true;
        self.info_expanded = false;
        self.focus = 0;
        self.zoom.exit();
        self.navigator.open(items, index)
    }

    pub fn close(&mut self) {
        self.open = false;
        self.info_expanded = false;
        self.zoom.exit();
        self.focus = 0;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Esc unwinds zoom first, then the info panel, then the lightbox itself.
    pub fn escape(&mut self) -> EscapeOutcome {
        if !self.open {
            return EscapeOutcome::Ignored;
        }
        if self.zoom.exit() {
            return EscapeOutcome::ExitedZoom;
        }
        if self.info_expanded {
            self.info_expanded = false;
            return EscapeOutcome::CollapsedInfo;
        }
        self.close();
        EscapeOutcome::Closed
    }

    pub fn toggle_info(&mut self) -> bool {
        self.info_expanded = !self.info_expanded;
        self.info_expanded
    }

    pub fn info_expanded(&self) -> bool {
        self.info_expanded
    }

    /// Updates whether the current work has an interactive action.
    pub fn set_action_available(&mut self, available: bool) {
        self.action_available = available;
        self.focus = self.focus.min(self.controls().len() - 1);
    }

    pub fn controls(&self) -> Vec<LightboxControl> {
        let mut controls = vec![
            LightboxControl::Close,
            LightboxControl::Previous,
            LightboxControl::Next,
            LightboxControl::Info,
        ];
        if self.action_available {
            controls.push(LightboxControl::Action);
        }
        controls
    }

    pub fn focus_next(&mut self) -> LightboxControl {
        let len = self.controls().len();
        self.focus = (self.focus + 1) % len;
        self.focused()
    }

    pub fn focus_previous(&mut self) -> LightboxControl {
        let len = self.controls().len();
        self.focus = (self.focus + len - 1) % len;
        self.focused()
    }

    pub fn focused(&self) -> LightboxControl {
        let controls = self.controls();
        controls[self.focus.min(controls.len() - 1)]
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    pub fn zoom(&self) -> &ZoomState {
        &self.zoom
    }

    pub fn zoom_mut(&mut self) -> &mut ZoomState {
        &mut self.zoom
    }

    /// Swipes are disabled while zoomed; the pointer pans instead.
    pub fn accepts_swipe(&self) -> bool {
        self.open && !self.zoom.is_active()
    }
}
