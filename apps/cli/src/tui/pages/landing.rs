//! Landing page: session-aware entry screen.

use crate::tui::app::{App, Page};
use account_client::CurrentUser;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// State of the landing page. On mount the session is re-validated in the
/// background; until that resolves the persisted hint decides what to show.
pub struct LandingPage {
    /// Whether the re-validation is still in flight.
    pub checking: bool,
    /// The authoritative user, once known.
    pub user: Option<CurrentUser>,
}

impl LandingPage {
    pub fn new() -> Self {
        Self {
            checking: false,
            user: None,
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Page::Landing(page) = &app.page else {
        return;
    };
    let theme = &app.theme;

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(7),
            Constraint::Percentage(40),
        ])
        .split(area);

    let mut lines = vec![
        Line::from(Span::styled(
            "HiLi",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if page.checking {
        lines.push(Line::from(Span::styled(
            format!("{} checking session...", app.spinner_char()),
            Style::default().fg(theme.text_muted),
        )));
    } else if let Some(user) = &page.user {
        lines.push(Line::from(vec![
            Span::styled("Welcome back, ", Style::default().fg(theme.text_secondary)),
            Span::styled(
                user.username.clone(),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[p] Profile   [o] Logout   [q] Quit",
            Style::default().fg(theme.text_muted),
        )));
    } else if app.auth.is_logged_in() {
        // The hint says logged in but the check has not confirmed it yet
        lines.push(Line::from(Span::styled(
            "Restoring session...",
            Style::default().fg(theme.text_muted),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Manage your HiLi account",
            Style::default().fg(theme.text_secondary),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "[Enter] Login   [q] Quit",
            Style::default().fg(theme.text_muted),
        )));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, vertical[1]);
}
