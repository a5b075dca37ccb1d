// event handling

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui::app::{App, Mode, Popup};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    Submit,
    CopyOutput,
    ExportCards,
}

pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_event(app: &mut App, event: Event) -> Action {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        _ => Action::None,
    }
}

fn handle_key(app: &mut App, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if app.popup == Popup::Themes {
        return handle_theme_popup(app, key);
    }

    match app.mode {
        Mode::Normal => handle_normal_key(app, key),
        Mode::Insert => handle_insert_key(app, key),
    }
}

fn handle_theme_popup(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_popup(),
        KeyCode::Char('j') | KeyCode::Down => app.theme_scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.theme_scroll_up(),
        KeyCode::Enter => app.select_theme(),
        _ => {}
    }
    Action::None
}

fn handle_normal_key(app: &mut App, key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => return Action::Quit,

        KeyCode::Char('i') => app.enter_insert(),
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.move_cursor_end();
            app.enter_insert();
        }
        KeyCode::Char('I') => {
            app.move_cursor_start();
            app.enter_insert();
        }

        KeyCode::Tab => app.cycle_panel(),
        KeyCode::Char('f') => app.toggle_fullscreen(),
        KeyCode::Char('t') => app.open_theme_popup(),

        KeyCode::Char('y') => return Action::CopyOutput,
        KeyCode::Char('x') => return Action::ExportCards,

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),

        KeyCode::Enter => {
            app.submit();
            return Action::Submit;
        }

        _ => {}
    }
    Action::None
}

fn handle_insert_key(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('a') => app.move_cursor_start(),
            KeyCode::Char('e') => app.move_cursor_end(),
            KeyCode::Char('u') => app.clear_prompt(),
            KeyCode::Char('p') => app.history_up(),
            KeyCode::Char('n') => app.history_down(),
            _ => {}
        }
        return Action::None;
    }

    match key.code {
        KeyCode::Esc => app.exit_insert(),

        // the form stays in insert mode so several submits can overlap
        KeyCode::Enter => {
            app.submit();
            return Action::Submit;
        }

        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.delete_char(),
        KeyCode::Delete => app.delete_char_forward(),

        KeyCode::Left => app.move_cursor_left(),
        KeyCode::Right => app.move_cursor_right(),
        KeyCode::Home => app.move_cursor_start(),
        KeyCode::End => app.move_cursor_end(),

        KeyCode::Up => app.history_up(),
        KeyCode::Down => app.history_down(),

        _ => {}
    }
    Action::None
}
