//! Main render function and layout for the TUI.

use super::app::{App, Route};
use super::pages;
use super::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

/// Render the entire application.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let theme = &app.theme;

    // Clear and fill background with theme color
    Clear.render(area, frame.buffer_mut());
    Block::default()
        .style(Style::default().bg(theme.bg))
        .render(area, frame.buffer_mut());

    // Header, page body, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);

    let block = panel_block(app.route.title(), true, theme);
    let inner = block.inner(chunks[1]);
    frame.render_widget(block, chunks[1]);

    match app.route {
        Route::Landing => pages::landing::render(frame, inner, app),
        Route::Login => pages::login::render(frame, inner, app),
        Route::Register => pages::register::render(frame, inner, app),
        Route::FindId => pages::find_id::render(frame, inner, app),
        Route::PasswordReset => pages::password_reset::render(frame, inner, app),
        Route::Profile => pages::profile::render(frame, inner, app),
    }

    render_status_bar(frame, app, chunks[2]);
}

/// Render the header bar: brand, current path, auth state.
fn render_header(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let theme = &app.theme;

    let auth_text = if app.auth.is_logged_in() {
        app.session
            .cached_user()
            .map(|u| u.username)
            .unwrap_or_else(|| "logged in".to_string())
    } else {
        "not logged in".to_string()
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " HiLi ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.route.path(), Style::default().fg(theme.text_muted)),
        Span::styled("  ·  ", Style::default().fg(theme.border)),
        Span::styled(auth_text, Style::default().fg(theme.text_secondary)),
    ]))
    .style(Style::default().bg(theme.bg_panel));

    frame.render_widget(header, area);
}

/// Render the status bar at the bottom.
fn render_status_bar(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let theme = &app.theme;
    let status_text = if let Some(msg) = &app.status_message {
        msg.clone()
    } else {
        format!("{} | Esc: back | Ctrl+C: quit", app.route.title())
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(
            status_text,
            Style::default().fg(if app.status_message.is_some() {
                theme.warning
            } else {
                theme.text_muted
            }),
        ),
    ]))
    .style(Style::default().bg(theme.bg_panel));

    frame.render_widget(status, area);
}

/// Helper to create a styled block for panels.
pub fn panel_block<'a>(title: &str, is_active: bool, theme: &Theme) -> Block<'a> {
    let border_color = if is_active {
        theme.border_active
    } else {
        theme.border
    };

    let title_color = if is_active {
        theme.accent
    } else {
        theme.text_secondary
    };

    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(title_color))
        .style(Style::default().bg(theme.bg_panel))
}
