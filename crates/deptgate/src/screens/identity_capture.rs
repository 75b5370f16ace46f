#![forbid(unsafe_code)]

//! Identity form: name, phone number, and email.
//!
//! Submitting writes the record and only then asks for the detail screen.
//! Empty fields block the submit and are marked instead.

use std::sync::Arc;

use deptgate_core::event::{Event, KeyCode};
use deptgate_core::geometry::Rect;
use deptgate_render::frame::Frame;
use deptgate_runtime::Cmd;
use deptgate_widgets::Widget;
use deptgate_widgets::block::Block;
use deptgate_widgets::input::TextInput;
use deptgate_widgets::paragraph::{Line, Paragraph};

use super::{HelpEntry, Screen};
use crate::app::AppMsg;
use crate::domain::{IdentityError, IdentityField, IdentityRecord};
use crate::identity_store::IdentityStore;
use crate::navigation::{NavigationAdvisory, Route, Transition};
use crate::theme;

pub const TITLE: &str = "Enter your details";
const SUBMIT_LABEL: &str = "[ Submit ]";
const FORM_WIDTH: u16 = 60;
const MAX_FIELD_LEN: usize = 256;

/// Which control owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(IdentityField),
    Submit,
}

impl FormFocus {
    fn next(self) -> Self {
        match self {
            FormFocus::Field(IdentityField::Email) => FormFocus::Submit,
            FormFocus::Field(f) => FormFocus::Field(f.next()),
            FormFocus::Submit => FormFocus::Field(IdentityField::Name),
        }
    }

    fn prev(self) -> Self {
        match self {
            FormFocus::Field(IdentityField::Name) => FormFocus::Submit,
            FormFocus::Field(f) => FormFocus::Field(f.prev()),
            FormFocus::Submit => FormFocus::Field(IdentityField::Email),
        }
    }
}

/// Outcome of the last submit that did not navigate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
    Incomplete,
    SaveFailed(String),
}

pub struct IdentityCaptureScreen {
    store: Arc<dyn IdentityStore>,
    inputs: [TextInput; 3],
    focus: FormFocus,
    advisory: Option<NavigationAdvisory>,
    missing: Vec<IdentityField>,
    status: Option<FormStatus>,
}

impl IdentityCaptureScreen {
    /// Build the form, prefilled from whatever record the store holds now.
    pub fn mount(store: Arc<dyn IdentityStore>, advisory: Option<NavigationAdvisory>) -> Self {
        let existing = store.get();
        let inputs = IdentityField::ALL.map(|field| {
            let value = existing.as_ref().map_or("", |r| r.field(field));
            TextInput::new()
                .with_value(value)
                .with_placeholder(field.label())
                .with_max_length(MAX_FIELD_LEN)
                .with_style(theme::input())
                .with_placeholder_style(theme::placeholder())
        });
        let mut screen = Self {
            store,
            inputs,
            focus: FormFocus::Field(IdentityField::Name),
            advisory,
            missing: Vec::new(),
            status: None,
        };
        screen.sync_focus();
        screen
    }

    pub fn value(&self, field: IdentityField) -> &str {
        self.inputs[field.index()].value()
    }

    pub fn set_value(&mut self, field: IdentityField, value: impl Into<String>) {
        self.inputs[field.index()].set_value(value);
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    pub fn advisory(&self) -> Option<&NavigationAdvisory> {
        self.advisory.as_ref()
    }

    /// Fields the last submit found empty.
    pub fn missing(&self) -> &[IdentityField] {
        &self.missing
    }

    pub fn status(&self) -> Option<&FormStatus> {
        self.status.as_ref()
    }

    /// Validate, write, and navigate forward.
    ///
    /// Nothing is written unless every field is filled, and the navigation
    /// is only issued once the write has succeeded.
    pub fn submit(&mut self) -> Cmd<AppMsg> {
        let record = match IdentityRecord::new(
            self.value(IdentityField::Name),
            self.value(IdentityField::Phone),
            self.value(IdentityField::Email),
        ) {
            Ok(record) => record,
            Err(IdentityError::EmptyField(first)) => {
                self.missing = IdentityField::ALL
                    .into_iter()
                    .filter(|f| self.value(*f).is_empty())
                    .collect();
                tracing::debug!(missing = ?self.missing, "identity submit blocked");
                self.status = Some(FormStatus::Incomplete);
                self.focus = FormFocus::Field(first);
                self.sync_focus();
                return Cmd::none();
            }
        };
        self.missing.clear();

        match self.store.set(&record) {
            Ok(()) => {
                self.status = None;
                Cmd::msg(AppMsg::Navigate(Transition::to(Route::Detail)))
            }
            Err(err) => {
                tracing::warn!(store = self.store.name(), error = %err, "identity write failed");
                self.status = Some(FormStatus::SaveFailed(err.to_string()));
                Cmd::none()
            }
        }
    }

    fn move_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        for field in IdentityField::ALL {
            self.inputs[field.index()].set_focused(self.focus == FormFocus::Field(field));
        }
    }

    fn edit_focused(&mut self, event: &Event) {
        let FormFocus::Field(field) = self.focus else {
            return;
        };
        if self.inputs[field.index()].handle_event(event) && !self.value(field).is_empty() {
            self.missing.retain(|f| *f != field);
        }
    }

    fn status_line(&self) -> Option<Line> {
        match &self.status {
            Some(FormStatus::Incomplete) => Some(Line::styled(
                "Fields marked * are required.",
                theme::error_style(),
            )),
            Some(FormStatus::SaveFailed(reason)) => Some(Line::styled(
                format!("Your details could not be saved: {reason}"),
                theme::error_style(),
            )),
            None => None,
        }
    }
}

impl Screen for IdentityCaptureScreen {
    fn update(&mut self, event: &Event) -> Cmd<AppMsg> {
        // The advisory belongs to the arrival only; any input drops it.
        if let Event::Paste(_) = event {
            self.advisory = None;
            self.edit_focused(event);
            return Cmd::none();
        }
        let Some(key) = event.as_key_press() else {
            return Cmd::none();
        };
        self.advisory = None;

        match key.code {
            KeyCode::Escape => Cmd::quit(),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab if key.shift() => {
                self.move_focus(self.focus.prev());
                Cmd::none()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(self.focus.prev());
                Cmd::none()
            }
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(self.focus.next());
                Cmd::none()
            }
            _ => {
                self.edit_focused(event);
                Cmd::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if area.is_empty() {
            return;
        }
        let area = Rect::new(area.x, area.y, area.width.min(FORM_WIDTH), area.height);

        let (title, mut rest) = area.split_top(2);
        Paragraph::new(vec![Line::styled(TITLE, theme::title())]).render(title, frame);

        if let Some(advisory) = &self.advisory {
            let para = Paragraph::new(vec![Line::styled(
                advisory.message.as_str(),
                theme::error_style(),
            )])
            .wrap(true);
            let rows = para.height(rest.width) as u16 + 1;
            let (top, below) = rest.split_top(rows);
            para.render(top, frame);
            rest = below;
        }

        for field in IdentityField::ALL {
            let missing = self.missing.contains(&field);
            let (label_row, below) = rest.split_top(1);
            let label = if missing {
                Line::styled(format!("{} *", field.label()), theme::error_style())
            } else {
                Line::styled(field.label(), theme::label())
            };
            Paragraph::new(vec![label]).render(label_row, frame);

            let (box_area, below) = below.split_top(3);
            let focused = self.focus == FormFocus::Field(field);
            let border = if missing {
                theme::error_style()
            } else {
                theme::border(focused)
            };
            let block = Block::bordered().border_style(border);
            block.render(box_area, frame);
            self.inputs[field.index()].render(block.inner(box_area), frame);
            rest = below;
        }

        let (button_row, below) = rest.split_top(2);
        let button = Line::styled(SUBMIT_LABEL, theme::button(self.focus == FormFocus::Submit));
        Paragraph::new(vec![button]).render(button_row, frame);

        if let Some(line) = self.status_line() {
            Paragraph::new(vec![line]).wrap(true).render(below, frame);
        }
    }

    fn keybindings(&self) -> Vec<HelpEntry> {
        vec![
            HelpEntry::new("Tab/↓", "next"),
            HelpEntry::new("Shift+Tab/↑", "previous"),
            HelpEntry::new("Enter", "submit"),
            HelpEntry::new("Esc", "quit"),
        ]
    }
}
