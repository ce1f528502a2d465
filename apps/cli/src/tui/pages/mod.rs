//! Page views, one per route.

pub mod find_id;
pub mod landing;
pub mod login;
pub mod password_reset;
pub mod profile;
pub mod register;

pub use find_id::FindIdPage;
pub use landing::LandingPage;
pub use login::LoginPage;
pub use password_reset::PasswordResetPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;

use crate::tui::theme::Theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

/// Render a labeled text field as two lines.
pub(crate) fn field_lines(
    label: &str,
    value: &str,
    focused: bool,
    masked: bool,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let shown = if masked {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };

    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default().fg(theme.text).bg(theme.bg_selection)
    } else {
        Style::default().fg(theme.text)
    };

    vec![
        Line::from(Span::styled(
            format!("  {}", label),
            Style::default().fg(theme.text_secondary),
        )),
        Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
            Span::styled(format!("{}_", shown), value_style),
        ]),
    ]
}

/// Render an action button line.
pub(crate) fn button_line(label: &str, focused: bool, theme: &Theme) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(theme.accent)),
        Span::styled(format!("[ {} ]", label), style),
    ])
}

/// Render an error line, if there is an error.
pub(crate) fn error_line(error: Option<&str>, theme: &Theme) -> Option<Line<'static>> {
    error.map(|message| {
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(theme.error),
        ))
    })
}

/// Render a notice line, if there is one.
pub(crate) fn notice_line(notice: Option<&str>, theme: &Theme) -> Option<Line<'static>> {
    notice.map(|message| {
        Line::from(Span::styled(
            format!("  {}", message),
            Style::default().fg(theme.success),
        ))
    })
}
