//! Password reset page.

use super::{button_line, error_line, field_lines, notice_line};
use crate::tui::app::{App, Page};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub const FOCUS_EMAIL: usize = 0;
pub const FOCUS_SUBMIT: usize = 1;
const RING: usize = 2;

/// Draft state of the password reset form.
pub struct PasswordResetPage {
    pub email: String,
    pub focus: usize,
    pub status: Option<String>,
    pub error: Option<String>,
}

impl PasswordResetPage {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            focus: FOCUS_EMAIL,
            status: None,
            error: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % RING;
    }

    pub fn focus_prev(&mut self) {
        self.focus = if self.focus == 0 { RING - 1 } else { self.focus - 1 };
    }

    pub fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            FOCUS_EMAIL => Some(&mut self.email),
            _ => None,
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Page::PasswordReset(page) = &app.page else {
        return;
    };
    let theme = &app.theme;

    let mut lines: Vec<Line<'static>> = vec![
        Line::from(Span::styled(
            "  Enter the email linked to your account to receive a reset link",
            Style::default().fg(theme.text_secondary),
        )),
        Line::from(""),
    ];

    lines.extend(field_lines(
        "Email",
        &page.email,
        page.focus == FOCUS_EMAIL,
        false,
        theme,
    ));
    lines.push(Line::from(""));
    lines.push(button_line(
        "Send reset link",
        page.focus == FOCUS_SUBMIT,
        theme,
    ));
    lines.push(Line::from(""));

    if let Some(line) = error_line(page.error.as_deref(), theme) {
        lines.push(line);
    }
    if let Some(line) = notice_line(page.status.as_deref(), theme) {
        lines.push(line);
    }

    lines.push(Line::from(Span::styled(
        "  Tab: next field · Enter: activate · Esc: back to login",
        Style::default().fg(theme.text_muted),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
