#![forbid(unsafe_code)]

//! Named styles shared by the screens.

use deptgate_render::style::{Color, Style};

pub fn title() -> Style {
    Style::new().fg(Color::Cyan).bold()
}

pub fn heading() -> Style {
    Style::new().fg(Color::White).bold()
}

pub fn label() -> Style {
    Style::new().fg(Color::Gray)
}

pub fn muted() -> Style {
    Style::new().fg(Color::DarkGray)
}

pub fn error_style() -> Style {
    Style::new().fg(Color::Red).bold()
}

pub fn success() -> Style {
    Style::new().fg(Color::Green)
}

pub fn header() -> Style {
    Style::new().fg(Color::Yellow).bold().underline()
}

pub fn status() -> Style {
    Style::new().fg(Color::Gray)
}

/// Marks the widget that owns keyboard input.
pub fn focused() -> Style {
    Style::new().fg(Color::Cyan)
}

pub fn border(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Cyan)
    } else {
        Style::new().fg(Color::DarkGray)
    }
}

pub fn cursor_row() -> Style {
    Style::new().reverse()
}

pub fn button(focused: bool) -> Style {
    if focused {
        Style::new().fg(Color::Black).bg(Color::Cyan).bold()
    } else {
        Style::new().fg(Color::Cyan).bold()
    }
}

pub fn input() -> Style {
    Style::new().fg(Color::White)
}

pub fn placeholder() -> Style {
    Style::new().fg(Color::DarkGray).dim()
}
