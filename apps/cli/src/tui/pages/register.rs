//! Registration page with the email verification sub-flow.

use super::{button_line, error_line, field_lines, notice_line};
use crate::tui::app::{App, Page};
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use session_engine::{EmailVerification, VerifyState};

/// Focus ring positions.
pub const FOCUS_USER_ID: usize = 0;
pub const FOCUS_CHECK_ID: usize = 1;
pub const FOCUS_NAME: usize = 2;
pub const FOCUS_PASSWORD: usize = 3;
pub const FOCUS_CONFIRM: usize = 4;
pub const FOCUS_EMAIL: usize = 5;
pub const FOCUS_REQUEST_CODE: usize = 6;
pub const FOCUS_CODE: usize = 7;
pub const FOCUS_VERIFY_CODE: usize = 8;
pub const FOCUS_PHONE: usize = 9;
pub const FOCUS_SUBMIT: usize = 10;
const RING: usize = 11;

/// Draft state of the registration form.
pub struct RegisterPage {
    pub user_id: String,
    pub name: String,
    pub password: String,
    pub confirm: String,
    pub email: String,
    pub code: String,
    pub phone: String,
    pub focus: usize,

    /// Outcome of the local availability check, once run.
    pub availability: Option<bool>,
    /// Email verification sub-flow; the token lives and dies with this page.
    pub verification: EmailVerification,

    pub error: Option<String>,
    pub notice: Option<String>,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self {
            user_id: String::new(),
            name: String::new(),
            password: String::new(),
            confirm: String::new(),
            email: String::new(),
            code: String::new(),
            phone: String::new(),
            focus: FOCUS_USER_ID,
            availability: None,
            verification: EmailVerification::new(),
            error: None,
            notice: None,
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
            FOCUS_USER_ID => Some(&mut self.user_id),
            FOCUS_NAME => Some(&mut self.name),
            FOCUS_PASSWORD => Some(&mut self.password),
            FOCUS_CONFIRM => Some(&mut self.confirm),
            FOCUS_EMAIL => Some(&mut self.email),
            FOCUS_CODE => Some(&mut self.code),
            FOCUS_PHONE => Some(&mut self.phone),
            _ => None,
        }
    }

    /// Editing the identifier invalidates a previous availability answer.
    pub fn reset_availability(&mut self) {
        self.availability = None;
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Page::Register(page) = &app.page else {
        return;
    };
    let theme = &app.theme;

    let mut lines: Vec<Line<'static>> = Vec::new();

    lines.extend(field_lines(
        "Identifier (letters and digits, min 3)",
        &page.user_id,
        page.focus == FOCUS_USER_ID,
        false,
        theme,
    ));

    let check_label = match page.availability {
        Some(true) => "Check availability: available".to_string(),
        Some(false) => "Check availability: unavailable".to_string(),
        None => "Check availability".to_string(),
    };
    lines.push(button_line(&check_label, page.focus == FOCUS_CHECK_ID, theme));
    lines.push(Line::from(""));

    lines.extend(field_lines(
        "Display name",
        &page.name,
        page.focus == FOCUS_NAME,
        false,
        theme,
    ));
    lines.extend(field_lines(
        "Password",
        &page.password,
        page.focus == FOCUS_PASSWORD,
        true,
        theme,
    ));
    lines.extend(field_lines(
        "Confirm password",
        &page.confirm,
        page.focus == FOCUS_CONFIRM,
        true,
        theme,
    ));
    lines.push(Line::from(""));

    lines.extend(field_lines(
        "Email",
        &page.email,
        page.focus == FOCUS_EMAIL,
        false,
        theme,
    ));

    let request_label = match page.verification.state() {
        VerifyState::Unsent => "Send verification code".to_string(),
        VerifyState::Sent { cooldown, .. } if *cooldown > 0 => {
            format!("Re-send code ({}s)", cooldown)
        }
        VerifyState::Sent { .. } => "Re-send code".to_string(),
        VerifyState::Verified { .. } => "Email verified".to_string(),
    };
    lines.push(button_line(
        &request_label,
        page.focus == FOCUS_REQUEST_CODE,
        theme,
    ));

    lines.extend(field_lines(
        "Verification code",
        &page.code,
        page.focus == FOCUS_CODE,
        false,
        theme,
    ));
    lines.push(button_line(
        "Verify code",
        page.focus == FOCUS_VERIFY_CODE,
        theme,
    ));
    lines.push(Line::from(""));

    lines.extend(field_lines(
        "Phone number (optional)",
        &page.phone,
        page.focus == FOCUS_PHONE,
        false,
        theme,
    ));
    lines.push(Line::from(""));

    lines.push(button_line("Register", page.focus == FOCUS_SUBMIT, theme));
    lines.push(Line::from(""));

    if let Some(line) = error_line(page.error.as_deref(), theme) {
        lines.push(line);
    }
    if let Some(line) = notice_line(page.notice.as_deref(), theme) {
        lines.push(line);
    }

    lines.push(Line::from(Span::styled(
        "  Tab: next field · Enter: activate · Esc: back to login",
        Style::default().fg(theme.text_muted),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
