//! Theme system for the TUI.
//!
//! Provides both the HiLi brand theme and a terminal-adaptive theme that
//! respects the user's terminal color scheme.

use ratatui::style::Color;
use std::env;

/// Check if the terminal supports true color (24-bit RGB).
fn supports_true_color() -> bool {
    if let Ok(colorterm) = env::var("COLORTERM") {
        let ct = colorterm.to_lowercase();
        if ct == "truecolor" || ct == "24bit" {
            return true;
        }
    }

    // Also check TERM for some terminals that advertise it there
    if let Ok(term) = env::var("TERM") {
        let t = term.to_lowercase();
        if t.contains("truecolor") || t.contains("24bit") || t.contains("direct") {
            return true;
        }
    }

    false
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    /// HiLi brand theme (dark mode)
    #[default]
    Hili,
    /// Terminal-adaptive theme using ANSI colors
    Terminal,
}

/// Color palette for the TUI.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // Backgrounds
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_selection: Color,

    // Borders
    pub border: Color,
    pub border_active: Color,

    // Text
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Accent (brand color)
    pub accent: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Spinner/loading
    pub spinner: Color,
}

impl Theme {
    /// Create the HiLi brand theme (dark mode).
    /// Uses RGB colors when true color is supported, falling back to the
    /// 256-color palette otherwise.
    pub fn hili() -> Self {
        if supports_true_color() {
            Self::hili_rgb()
        } else {
            Self::hili_256()
        }
    }

    /// HiLi theme using true color (24-bit RGB).
    fn hili_rgb() -> Self {
        Self {
            // Backgrounds
            bg: Color::Rgb(0x0B, 0x12, 0x11),
            bg_panel: Color::Rgb(0x14, 0x20, 0x1E),
            bg_selection: Color::Rgb(0x1F, 0x33, 0x30),

            // Borders
            border: Color::Rgb(0x3A, 0x52, 0x4E),
            border_active: Color::Rgb(0x35, 0xC4, 0xA7), // brand teal

            // Text
            text: Color::Rgb(0xF2, 0xF7, 0xF6),
            text_secondary: Color::Rgb(0xC4, 0xD4, 0xD1),
            text_muted: Color::Rgb(0x84, 0x9B, 0x97),

            // Accent (brand teal)
            accent: Color::Rgb(0x35, 0xC4, 0xA7),

            // Semantic colors
            success: Color::Rgb(0x7D, 0xE8, 0xC8),
            warning: Color::Rgb(0xEE, 0xD2, 0x63),
            error: Color::Rgb(0xE8, 0x8E, 0x8E),
            info: Color::Rgb(0x8E, 0xB2, 0xEB),

            // Spinner
            spinner: Color::Rgb(0x35, 0xC4, 0xA7),
        }
    }

    /// HiLi theme using the 256-color palette.
    /// For terminals that don't support true color.
    fn hili_256() -> Self {
        Self {
            bg: Color::Indexed(233),
            bg_panel: Color::Indexed(235),
            bg_selection: Color::Indexed(238),

            border: Color::Indexed(241),
            border_active: Color::Indexed(43), // teal

            text: Color::Indexed(255),
            text_secondary: Color::Indexed(252),
            text_muted: Color::Indexed(245),

            accent: Color::Indexed(43),

            success: Color::Indexed(122),
            warning: Color::Indexed(220),
            error: Color::Indexed(210),
            info: Color::Indexed(111),

            spinner: Color::Indexed(43),
        }
    }

    /// Create a terminal-adaptive theme using ANSI colors.
    pub fn terminal() -> Self {
        Self {
            bg: Color::Reset,
            bg_panel: Color::Reset,
            bg_selection: Color::DarkGray,

            border: Color::DarkGray,
            border_active: Color::Cyan,

            text: Color::Reset,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            accent: Color::Cyan,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Blue,

            spinner: Color::Cyan,
        }
    }

    /// Get theme based on mode.
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Hili => Self::hili(),
            ThemeMode::Terminal => Self::terminal(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::hili()
    }
}
