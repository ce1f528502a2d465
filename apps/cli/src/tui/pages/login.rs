//! Login page.

use super::{button_line, error_line, field_lines};
use crate::tui::app::{App, Page};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Focus ring positions.
pub const FOCUS_USERNAME: usize = 0;
pub const FOCUS_PASSWORD: usize = 1;
pub const FOCUS_SUBMIT: usize = 2;
pub const FOCUS_GOOGLE: usize = 3;
pub const FOCUS_REGISTER: usize = 4;
pub const FOCUS_FIND_ID: usize = 5;
pub const FOCUS_PASSWORD_RESET: usize = 6;
const RING: usize = 7;

/// Draft state of the login form.
pub struct LoginPage {
    pub username: String,
    pub password: String,
    pub focus: usize,
    /// Errors local to this page (consent flow); credential errors live in
    /// the auth controller's flag set.
    pub error: Option<String>,
    pub busy: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: FOCUS_USERNAME,
            error: None,
            busy: false,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % RING;
    }

    pub fn focus_prev(&mut self) {
        self.focus = if self.focus == 0 { RING - 1 } else { self.focus - 1 };
    }

    /// The text field currently focused, if any.
    pub fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            FOCUS_USERNAME => Some(&mut self.username),
            FOCUS_PASSWORD => Some(&mut self.password),
            _ => None,
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Page::Login(page) = &app.page else {
        return;
    };
    let theme = &app.theme;

    let mut lines: Vec<Line<'static>> = vec![Line::from("")];
    lines.extend(field_lines(
        "Identifier",
        &page.username,
        page.focus == FOCUS_USERNAME,
        false,
        theme,
    ));
    lines.push(Line::from(""));
    lines.extend(field_lines(
        "Password",
        &page.password,
        page.focus == FOCUS_PASSWORD,
        true,
        theme,
    ));
    lines.push(Line::from(""));

    let submit_label = if app.auth.loading() {
        format!("{} Logging in...", app.spinner_char())
    } else {
        "Login".to_string()
    };
    lines.push(button_line(&submit_label, page.focus == FOCUS_SUBMIT, theme));

    let google_label = if page.busy {
        format!("{} Waiting for Google...", app.spinner_char())
    } else {
        "Sign in with Google".to_string()
    };
    lines.push(button_line(&google_label, page.focus == FOCUS_GOOGLE, theme));
    lines.push(Line::from(""));

    // Credential errors from the controller, consent errors from the page
    if let Some(line) = error_line(app.auth.error(), theme) {
        lines.push(line);
    }
    if let Some(line) = error_line(page.error.as_deref(), theme) {
        lines.push(line);
    }

    lines.push(Line::from(""));
    lines.push(button_line("Register", page.focus == FOCUS_REGISTER, theme));
    lines.push(button_line("Find ID", page.focus == FOCUS_FIND_ID, theme));
    lines.push(button_line(
        "Password Reset",
        page.focus == FOCUS_PASSWORD_RESET,
        theme,
    ));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Tab: next field · Enter: activate · Esc: back",
        Style::default().fg(theme.text_muted),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
