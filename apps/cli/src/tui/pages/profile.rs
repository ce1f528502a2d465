//! Profile page: avatar upload and linked accounts.

use super::{button_line, error_line, field_lines, notice_line};
use crate::tui::app::{App, Page};
use account_client::CurrentUser;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

pub const FOCUS_AVATAR_PATH: usize = 0;
pub const FOCUS_UPLOAD: usize = 1;
pub const FOCUS_GOOGLE: usize = 2;
const RING: usize = 3;

/// State of the profile page.
pub struct ProfilePage {
    /// Profile loaded through the session cache.
    pub user: Option<CurrentUser>,
    pub loading: bool,
    pub focus: usize,
    /// Path of the image to upload as avatar.
    pub avatar_path: String,
    pub busy: bool,
    pub error: Option<String>,
    pub notice: Option<String>,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self {
            user: None,
            loading: false,
            focus: FOCUS_AVATAR_PATH,
            avatar_path: String::new(),
            busy: false,
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

    pub fn focused_field(&mut self) -> Option<&mut String> {
        match self.focus {
            FOCUS_AVATAR_PATH => Some(&mut self.avatar_path),
            _ => None,
        }
    }

    pub fn google_linked(&self) -> bool {
        self.user.as_ref().map(|u| u.google_linked).unwrap_or(false)
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Page::Profile(page) = &app.page else {
        return;
    };
    let theme = &app.theme;

    let mut lines: Vec<Line<'static>> = Vec::new();

    if page.loading {
        lines.push(Line::from(Span::styled(
            format!("  {} loading profile...", app.spinner_char()),
            Style::default().fg(theme.text_muted),
        )));
        frame.render_widget(Paragraph::new(lines), area);
        return;
    }

    match &page.user {
        Some(user) => {
            lines.push(Line::from(vec![
                Span::styled("  User   ", Style::default().fg(theme.text_secondary)),
                Span::styled(user.username.clone(), Style::default().fg(theme.text)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Email  ", Style::default().fg(theme.text_secondary)),
                Span::styled(user.email.clone(), Style::default().fg(theme.text)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Avatar ", Style::default().fg(theme.text_secondary)),
                Span::styled(
                    user.avatar_url.clone().unwrap_or_else(|| "(none)".into()),
                    Style::default().fg(theme.text_muted),
                ),
            ]));
            lines.push(Line::from(""));

            lines.extend(field_lines(
                "New avatar (path to image file)",
                &page.avatar_path,
                page.focus == FOCUS_AVATAR_PATH,
                false,
                theme,
            ));
            let upload_label = if page.busy {
                format!("{} Working...", app.spinner_char())
            } else {
                "Upload avatar".to_string()
            };
            lines.push(button_line(&upload_label, page.focus == FOCUS_UPLOAD, theme));
            lines.push(Line::from(""));

            let google_label = if page.google_linked() {
                "Google: linked (unlink)"
            } else {
                "Google: not linked (link now)"
            };
            lines.push(button_line(google_label, page.focus == FOCUS_GOOGLE, theme));
            lines.push(Line::from(""));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "  Could not load your profile.",
                Style::default().fg(theme.warning),
            )));
            lines.push(Line::from(""));
        }
    }

    if let Some(line) = error_line(page.error.as_deref(), theme) {
        lines.push(line);
    }
    if let Some(line) = notice_line(page.notice.as_deref(), theme) {
        lines.push(line);
    }

    lines.push(Line::from(Span::styled(
        "  Tab: next field · Enter: activate · Esc: back",
        Style::default().fg(theme.text_muted),
    )));

    frame.render_widget(Paragraph::new(lines), area);
}
