use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, CreateScreen, Route, Screen};
use crate::form::Field;

/// Result of handling a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Navigate(Route),
    Reload,
    Submit,
    OpenEditor,
    Continue,
}

/// Handle a key press. Returns an action indicating what the event loop should do.
pub fn handle_key(app: &mut App, key: KeyEvent) -> KeyAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if app.show_help {
        app.toggle_help();
        return KeyAction::Continue;
    }

    match &mut app.screen {
        Screen::List(list) => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('j') | KeyCode::Down => {
                list.move_down();
                KeyAction::Continue
            }
            KeyCode::Char('k') | KeyCode::Up => {
                list.move_up();
                KeyAction::Continue
            }
            KeyCode::Enter => match list.selected() {
                Some(task) => KeyAction::Navigate(Route::Details(task.id.clone())),
                None => KeyAction::Continue,
            },
            KeyCode::Char('c') | KeyCode::Char('a') => KeyAction::Navigate(Route::Create),
            KeyCode::Char('r') => KeyAction::Reload,
            KeyCode::Char('?') => {
                app.show_help = true;
                KeyAction::Continue
            }
            _ => KeyAction::Continue,
        },
        Screen::Details(_) => match key.code {
            KeyCode::Char('q') => KeyAction::Quit,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                KeyAction::Navigate(Route::List)
            }
            KeyCode::Char('r') => KeyAction::Reload,
            KeyCode::Char('?') => {
                app.show_help = true;
                KeyAction::Continue
            }
            _ => KeyAction::Continue,
        },
        Screen::Create(form) => handle_create(form, key),
    }
}

fn handle_create(screen: &mut CreateScreen, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => return KeyAction::Navigate(Route::List),
        KeyCode::Enter => return KeyAction::Submit,
        KeyCode::Tab | KeyCode::Down => screen.next_field(),
        KeyCode::BackTab | KeyCode::Up => screen.prev_field(),
        KeyCode::Left => screen.cycle(false),
        KeyCode::Right => screen.cycle(true),
        KeyCode::Backspace => screen.backspace(),
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => match c {
            'e' if screen.focused == Field::Description && !screen.submitting => {
                return KeyAction::OpenEditor;
            }
            'u' => screen.clear_field(),
            _ => {}
        },
        KeyCode::Char(c) => screen.insert_char(c),
        _ => {}
    }
    KeyAction::Continue
}
