// app state for the tui

use std::path::{Path, PathBuf};

use crate::Error;
use crate::core::{Diagnostics, Element, FormHandler, LogEntry, LogLevel, cards, markup};
use crate::tui::theme::{Theme, ThemeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Query,
    Output,
    Logs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Popup {
    None,
    Themes,
}

pub struct App {
    pub mode: Mode,
    pub panel: Panel,
    pub popup: Popup,
    pub fullscreen: bool,
    pub theme_kind: ThemeKind,
    pub theme: Theme,

    pub endpoint: String,

    // page handles, shared with spawned submissions
    form: Element,
    input: Element,
    output: Element,
    diagnostics: Diagnostics,

    // text being edited, mirrored into the input element
    pub prompt: String,
    pub prompt_cursor: usize,

    pub submitted: usize,
    pub tick: usize,

    // scroll
    pub output_scroll: usize,
    pub log_scroll: usize,
    pub theme_scroll: usize,

    // history
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl App {
    pub fn new(handler: &FormHandler, theme_kind: ThemeKind) -> Self {
        let app = Self {
            mode: Mode::Insert,
            panel: Panel::Query,
            popup: Popup::None,
            fullscreen: false,
            theme_kind,
            theme: Theme::from_kind(theme_kind),
            endpoint: handler.client().endpoint().to_string(),
            form: handler.form().clone(),
            input: handler.input().clone(),
            output: handler.output().clone(),
            diagnostics: handler.diagnostics().clone(),
            prompt: handler.input().value(),
            prompt_cursor: handler.input().value().chars().count(),
            submitted: 0,
            tick: 0,
            output_scroll: 0,
            log_scroll: 0,
            theme_scroll: theme_kind.index(),
            history: Vec::new(),
            history_index: None,
        };

        app.log(LogLevel::Info, format!("endpoint {}", app.endpoint));
        app
    }

    pub fn log(&self, level: LogLevel, message: String) {
        self.diagnostics.log(level, message);
    }

    pub fn logs(&self) -> Vec<LogEntry> {
        self.diagnostics.entries()
    }

    pub fn is_loading(&self) -> bool {
        self.form.has_class(crate::core::LOADING_CLASS)
    }

    pub fn output_markup(&self) -> String {
        self.output.inner_html()
    }

    pub fn set_theme(&mut self, kind: ThemeKind) {
        self.theme_kind = kind;
        self.theme = Theme::from_kind(kind);
        self.theme_scroll = kind.index();
    }

    pub fn open_theme_popup(&mut self) {
        self.popup = Popup::Themes;
        self.theme_scroll = self.theme_kind.index();
    }

    pub fn close_popup(&mut self) {
        self.popup = Popup::None;
    }

    pub fn theme_scroll_up(&mut self) {
        if self.theme_scroll > 0 {
            self.theme_scroll -= 1;
            self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        }
    }

    pub fn theme_scroll_down(&mut self) {
        if self.theme_scroll < ThemeKind::ALL.len() - 1 {
            self.theme_scroll += 1;
            self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        }
    }

    pub fn select_theme(&mut self) {
        self.set_theme(ThemeKind::ALL[self.theme_scroll]);
        self.close_popup();
    }

    pub fn cycle_panel(&mut self) {
        self.panel = match self.panel {
            Panel::Query => Panel::Output,
            Panel::Output => Panel::Logs,
            Panel::Logs => Panel::Query,
        };
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn enter_insert(&mut self) {
        self.mode = Mode::Insert;
        self.panel = Panel::Query;
    }

    pub fn exit_insert(&mut self) {
        self.mode = Mode::Normal;
    }

    // prompt editing, cursor counts chars not bytes
    fn byte_index(&self) -> usize {
        self.prompt
            .char_indices()
            .nth(self.prompt_cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.prompt.len())
    }

    fn prompt_len(&self) -> usize {
        self.prompt.chars().count()
    }

    fn sync_input(&self) {
        self.input.set_value(self.prompt.clone());
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.prompt.insert(at, c);
        self.prompt_cursor += 1;
        self.sync_input();
    }

    pub fn delete_char(&mut self) {
        if self.prompt_cursor > 0 {
            self.prompt_cursor -= 1;
            let at = self.byte_index();
            self.prompt.remove(at);
            self.sync_input();
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.prompt_cursor < self.prompt_len() {
            let at = self.byte_index();
            self.prompt.remove(at);
            self.sync_input();
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.prompt_cursor = self.prompt_cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.prompt_cursor < self.prompt_len() {
            self.prompt_cursor += 1;
        }
    }

    pub fn move_cursor_start(&mut self) {
        self.prompt_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.prompt_cursor = self.prompt_len();
    }

    pub fn clear_prompt(&mut self) {
        self.prompt.clear();
        self.prompt_cursor = 0;
        self.sync_input();
    }

    fn load_prompt(&mut self, text: String) {
        self.prompt = text;
        self.prompt_cursor = self.prompt_len();
        self.sync_input();
    }

    // history navigation
    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        match self.history_index {
            None => {
                self.history_index = Some(self.history.len() - 1);
            }
            Some(i) if i > 0 => {
                self.history_index = Some(i - 1);
            }
            _ => {}
        }
        if let Some(i) = self.history_index {
            self.load_prompt(self.history[i].clone());
        }
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i < self.history.len() - 1 => {
                self.history_index = Some(i + 1);
                self.load_prompt(self.history[i + 1].clone());
            }
            Some(_) => {
                self.history_index = None;
                self.clear_prompt();
            }
            None => {}
        }
    }

    /// Record a submit. The input keeps its text, like a form field does,
    /// and empty text is submitted as-is.
    pub fn submit(&mut self) {
        if !self.prompt.is_empty() && self.history.last() != Some(&self.prompt) {
            self.history.push(self.prompt.clone());
        }
        self.history_index = None;
        self.submitted += 1;
        self.output_scroll = 0;
        self.log(
            LogLevel::Info,
            format!("submitted #{}: {}", self.submitted, preview(&self.prompt)),
        );
    }

    pub fn copy_output(&self) -> Option<String> {
        let markup = self.output_markup();
        if markup.is_empty() { None } else { Some(markup) }
    }

    /// Save the cards in the current output under `dir`, `None` when there are none.
    pub fn export_cards(&self, dir: &Path, tag: &str) -> Result<Option<PathBuf>, Error> {
        let text = markup::plain_text(&self.output_markup());
        let found = cards::parse(&text);
        if found.is_empty() {
            return Ok(None);
        }
        let csv = cards::to_csv(&found, tag)?;
        cards::save(dir, &csv).map(Some)
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn scroll_up(&mut self) {
        match self.panel {
            Panel::Output => self.output_scroll = self.output_scroll.saturating_sub(1),
            Panel::Logs => self.log_scroll = self.log_scroll.saturating_sub(1),
            Panel::Query => {}
        }
    }

    pub fn scroll_down(&mut self) {
        match self.panel {
            Panel::Output => self.output_scroll += 1,
            Panel::Logs => self.log_scroll += 1,
            Panel::Query => {}
        }
    }
}

fn preview(text: &str) -> String {
    let first = text.lines().next().unwrap_or("");
    if first.chars().count() > 40 {
        format!("{}...", first.chars().take(37).collect::<String>())
    } else if first.is_empty() {
        "(empty)".to_string()
    } else {
        first.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Client, DEFAULT_ENDPOINT, Document};

    fn app() -> (App, FormHandler) {
        let handler = FormHandler::bind(
            &Document::form_page(),
            Client::new(DEFAULT_ENDPOINT).unwrap(),
            Diagnostics::new(),
        )
        .unwrap();
        (App::new(&handler, ThemeKind::Dark), handler)
    }

    #[test]
    fn typing_updates_the_input_element() {
        let (mut app, handler) = app();
        for c in "héllo".chars() {
            app.insert_char(c);
        }
        app.move_cursor_left();
        app.delete_char();
        assert_eq!(app.prompt, "hélo");
        assert_eq!(handler.input().value(), "hélo");
    }

    #[test]
    fn submit_keeps_text_and_history() {
        let (mut app, handler) = app();
        app.insert_char('x');
        app.submit();
        app.submit();
        assert_eq!(app.prompt, "x");
        assert_eq!(handler.input().value(), "x");
        assert_eq!(app.history, vec!["x".to_string()]);
        assert_eq!(app.submitted, 2);
    }

    #[test]
    fn history_walks_back_and_forth() {
        let (mut app, _) = app();
        app.history = vec!["one".into(), "two".into()];
        app.history_up();
        assert_eq!(app.prompt, "two");
        app.history_up();
        assert_eq!(app.prompt, "one");
        app.history_down();
        assert_eq!(app.prompt, "two");
        app.history_down();
        assert!(app.prompt.is_empty());
    }

    #[test]
    fn export_reads_cards_from_output() {
        let (app, handler) = app();
        let tmp = tempfile::tempdir().unwrap();
        assert!(app.export_cards(tmp.path(), "t").unwrap().is_none());

        handler
            .output()
            .set_inner_html("<p>Q: <b>2+2</b>? A: 4;</p><p>Q: 3+3? A: 6</p>");
        let path = app.export_cards(tmp.path(), "math").unwrap().unwrap();
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "2+2?,4,math\n3+3?,6,math\n"
        );
    }

    #[test]
    fn loading_follows_the_form_class() {
        let (app, handler) = app();
        assert!(!app.is_loading());
        handler.form().add_class(crate::core::LOADING_CLASS);
        assert!(app.is_loading());
    }
}
