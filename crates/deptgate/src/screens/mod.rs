#![forbid(unsafe_code)]

//! The two screens and the trait the app router drives them through.

pub mod detail;
pub mod identity_capture;

use deptgate_core::event::Event;
use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_runtime::Cmd;

use crate::app::AppMsg;

/// A single keybinding hint shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpEntry {
    /// Key label (e.g. "Tab", "Ctrl+C").
    pub key: &'static str,
    pub action: &'static str,
}

impl HelpEntry {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// A mounted screen.
///
/// Screens are built fresh on every navigation; whatever they need from the
/// outside is handed to their `mount` constructor.
pub trait Screen {
    /// Handle a terminal event, returning any follow-up command.
    fn update(&mut self, event: &Event) -> Cmd<AppMsg>;

    /// Render the screen into the given area.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Footer hints. An empty list hides the footer.
    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![]
    }
}

/// Footer text for a set of hints: `Tab next · Esc quit`.
pub fn help_line(entries: &[HelpEntry]) -> String {
    entries
        .iter()
        .map(|e| format!("{} {}", e.key, e.action))
        .collect::<Vec<_>>()
        .join(" · ")
}
