use crate::app::{App, Focus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tasklist::controller::{AuthMode, Effect, View};

/// Handle a key event. Returns the remote call it triggered, if any; the
/// caller runs it and feeds the outcome back to the controller.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('c') if ctrl => {
            app.should_quit = true;
            return None;
        }
        _ => {}
    }

    // Any other key acknowledges the message in the status bar.
    app.controller.dismiss_alert();

    match app.view() {
        View::Auth => handle_auth_key(app, key, ctrl),
        View::Tasks => handle_tasks_key(app, key, ctrl),
    }
}

fn handle_auth_key(app: &mut App, key: KeyEvent, ctrl: bool) -> Option<Effect> {
    let controller = &mut app.controller;
    match key.code {
        KeyCode::Char('s') if ctrl => {
            let to_signup = controller.auth_mode() == AuthMode::Login;
            controller.toggle_auth_mode(to_signup);
            None
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            controller.auth_form_mut().cycle_focus();
            None
        }
        KeyCode::Enter => controller.submit_auth(),
        KeyCode::Backspace => {
            controller.auth_form_mut().focused_mut().pop();
            None
        }
        KeyCode::Char(c) if !ctrl => {
            controller.auth_form_mut().focused_mut().push(c);
            None
        }
        _ => None,
    }
}

fn handle_tasks_key(app: &mut App, key: KeyEvent, ctrl: bool) -> Option<Effect> {
    match key.code {
        KeyCode::Char('l') if ctrl => {
            app.logout();
            return None;
        }
        KeyCode::Char('r') if ctrl => return app.controller.refresh(),
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return None;
        }
        _ => {}
    }

    let controller = &mut app.controller;
    match app.focus {
        Focus::Input => match key.code {
            KeyCode::Enter => controller.submit_new_task(),
            KeyCode::Backspace => {
                controller.draft_mut().pop();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                controller.draft_mut().push(c);
                None
            }
            _ => None,
        },
        Focus::List => match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                controller.tasks_mut().select_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                controller.tasks_mut().select_next();
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let task_id = controller.tasks().selected()?.task_id.clone();
                controller.toggle_task(&task_id)
            }
            KeyCode::Delete | KeyCode::Char('d') => {
                let task_id = controller.tasks().selected()?.task_id.clone();
                controller.delete_task(&task_id)
            }
            _ => None,
        },
    }
}
