//! Keyboard event handling for the TUI.

use super::app::{App, Page, Route};
use super::pages::{find_id, login, password_reset, profile, register};
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Handle input events. Returns true if the app should quit.
pub async fn handle_events(app: &mut App) -> Result<bool> {
    // Poll for events with a small timeout so rendering stays responsive
    if event::poll(Duration::from_millis(100))? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(false);
            }
            return Ok(handle_key_event(app, key).await);
        }
    }

    Ok(false)
}

/// Handle a key event. Returns true if the app should quit.
async fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match app.route {
        Route::Landing => handle_landing(app, key).await,
        Route::Login => handle_login(app, key).await,
        Route::Register => handle_register(app, key).await,
        Route::FindId => handle_find_id(app, key),
        Route::PasswordReset => handle_password_reset(app, key),
        Route::Profile => handle_profile(app, key).await,
    }
}

async fn handle_landing(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Enter => {
            if app.auth.is_logged_in() {
                app.navigate(Route::Profile);
            } else {
                app.navigate(Route::Login);
            }
        }
        KeyCode::Char('p') => {
            if app.auth.is_logged_in() {
                app.navigate(Route::Profile);
            }
        }
        KeyCode::Char('o') => {
            if app.auth.is_logged_in() {
                app.logout().await;
            }
        }
        _ => {}
    }

    false
}

async fn handle_login(app: &mut App, key: KeyEvent) -> bool {
    let focus = match &app.page {
        Page::Login(page) => page.focus,
        _ => return false,
    };

    match key.code {
        KeyCode::Esc => app.navigate(Route::Landing),
        KeyCode::Tab | KeyCode::Down => {
            if let Page::Login(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Page::Login(page) = &mut app.page {
                page.focus_prev();
            }
        }
        KeyCode::Enter => match focus {
            login::FOCUS_SUBMIT => app.submit_login().await,
            login::FOCUS_GOOGLE => app.start_google_sign_in(),
            login::FOCUS_REGISTER => app.navigate(Route::Register),
            login::FOCUS_FIND_ID => app.navigate(Route::FindId),
            login::FOCUS_PASSWORD_RESET => app.navigate(Route::PasswordReset),
            _ => {
                if let Page::Login(page) = &mut app.page {
                    page.focus_next();
                }
            }
        },
        KeyCode::Char(c) => {
            if let Page::Login(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if let Page::Login(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.pop();
                }
            }
        }
        _ => {}
    }

    false
}

async fn handle_register(app: &mut App, key: KeyEvent) -> bool {
    let focus = match &app.page {
        Page::Register(page) => page.focus,
        _ => return false,
    };

    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Tab | KeyCode::Down => {
            if let Page::Register(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Page::Register(page) = &mut app.page {
                page.focus_prev();
            }
        }
        KeyCode::Enter => match focus {
            register::FOCUS_CHECK_ID => app.check_availability(),
            register::FOCUS_REQUEST_CODE => app.request_email_code().await,
            register::FOCUS_VERIFY_CODE => app.verify_email_code().await,
            register::FOCUS_SUBMIT => app.submit_registration().await,
            _ => {
                if let Page::Register(page) = &mut app.page {
                    page.focus_next();
                }
            }
        },
        KeyCode::Char(c) => {
            if let Page::Register(page) = &mut app.page {
                let editing_user_id = page.focus == register::FOCUS_USER_ID;
                if let Some(field) = page.focused_field() {
                    field.push(c);
                }
                if editing_user_id {
                    page.reset_availability();
                }
            }
        }
        KeyCode::Backspace => {
            if let Page::Register(page) = &mut app.page {
                let editing_user_id = page.focus == register::FOCUS_USER_ID;
                if let Some(field) = page.focused_field() {
                    field.pop();
                }
                if editing_user_id {
                    page.reset_availability();
                }
            }
        }
        _ => {}
    }

    false
}

fn handle_find_id(app: &mut App, key: KeyEvent) -> bool {
    let focus = match &app.page {
        Page::FindId(page) => page.focus,
        _ => return false,
    };

    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Tab | KeyCode::Down => {
            if let Page::FindId(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Page::FindId(page) = &mut app.page {
                page.focus_prev();
            }
        }
        KeyCode::Enter => {
            if focus == find_id::FOCUS_SUBMIT {
                app.submit_find_id();
            } else if let Page::FindId(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::Char(c) => {
            if let Page::FindId(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if let Page::FindId(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.pop();
                }
            }
        }
        _ => {}
    }

    false
}

fn handle_password_reset(app: &mut App, key: KeyEvent) -> bool {
    let focus = match &app.page {
        Page::PasswordReset(page) => page.focus,
        _ => return false,
    };

    match key.code {
        KeyCode::Esc => app.navigate(Route::Login),
        KeyCode::Tab | KeyCode::Down => {
            if let Page::PasswordReset(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Page::PasswordReset(page) = &mut app.page {
                page.focus_prev();
            }
        }
        KeyCode::Enter => {
            if focus == password_reset::FOCUS_SUBMIT {
                app.submit_password_reset();
            } else if let Page::PasswordReset(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::Char(c) => {
            if let Page::PasswordReset(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if let Page::PasswordReset(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.pop();
                }
            }
        }
        _ => {}
    }

    false
}

async fn handle_profile(app: &mut App, key: KeyEvent) -> bool {
    let focus = match &app.page {
        Page::Profile(page) => page.focus,
        _ => return false,
    };

    match key.code {
        KeyCode::Esc => app.navigate(Route::Landing),
        KeyCode::Tab | KeyCode::Down => {
            if let Page::Profile(page) = &mut app.page {
                page.focus_next();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Page::Profile(page) = &mut app.page {
                page.focus_prev();
            }
        }
        KeyCode::Enter => match focus {
            profile::FOCUS_UPLOAD => app.upload_avatar().await,
            profile::FOCUS_GOOGLE => app.toggle_google_link().await,
            _ => {
                if let Page::Profile(page) = &mut app.page {
                    page.focus_next();
                }
            }
        },
        KeyCode::Char(c) => {
            if let Page::Profile(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.push(c);
                }
            }
        }
        KeyCode::Backspace => {
            if let Page::Profile(page) = &mut app.page {
                if let Some(field) = page.focused_field() {
                    field.pop();
                }
            }
        }
        _ => {}
    }

    false
}
