// terminal ui - hosts the question form

mod app;
mod event;
mod theme;
mod ui;

pub use app::App;
pub use theme::{ThemeKind, detect_theme};

use crossterm::{
    cursor::SetCursorStyle,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, stdout};
use std::path::Path;
use std::time::Duration;

use crate::core::{FormHandler, LogLevel, SubmitEvent, cards};
use crate::Error;
use app::Mode;
use event::{Action, handle_event, poll_event};

fn copy_to_clipboard(text: &str) -> bool {
    use std::io::Write;
    use std::process::{Command, Stdio};

    let candidates: [(&str, &[&str]); 3] = [
        ("pbcopy", &[]),
        ("xclip", &["-selection", "clipboard"]),
        ("xsel", &["--clipboard", "--input"]),
    ];

    for (program, args) in candidates {
        if let Ok(mut child) = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .spawn()
            && let Some(stdin) = child.stdin.as_mut()
            && stdin.write_all(text.as_bytes()).is_ok()
        {
            drop(child.stdin.take());
            return child.wait().map(|s| s.success()).unwrap_or(false);
        }
    }

    false
}

fn terminal_err(e: io::Error) -> Error {
    Error::Terminal(e.to_string())
}

pub async fn run(handler: FormHandler, theme: ThemeKind) -> Result<(), Error> {
    enable_raw_mode().map_err(terminal_err)?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(terminal_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(terminal_err)?;

    let result = run_app(&mut terminal, handler, theme).await;

    // restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        SetCursorStyle::DefaultUserShape,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handler: FormHandler,
    theme: ThemeKind,
) -> Result<(), Error> {
    let mut app = App::new(&handler, theme);
    let mut last_mode = None;

    loop {
        if last_mode != Some(app.mode) {
            let cursor_style = match app.mode {
                Mode::Insert => SetCursorStyle::BlinkingBar,
                Mode::Normal => SetCursorStyle::BlinkingBlock,
            };
            execute!(terminal.backend_mut(), cursor_style).ok();
            last_mode = Some(app.mode);
        }

        terminal
            .draw(|frame| ui::render(frame, &mut app))
            .map_err(terminal_err)?;

        // short poll so in-flight submissions show up without a keypress
        let Some(event) = poll_event(Duration::from_millis(100)).map_err(terminal_err)? else {
            app.on_tick();
            continue;
        };

        match handle_event(&mut app, event) {
            Action::Quit => break,
            Action::Submit => {
                // not awaited: overlapping submits race and the last to settle wins
                let handler = handler.clone();
                tokio::spawn(async move {
                    handler.submit(&mut SubmitEvent::new()).await;
                });
            }
            Action::CopyOutput => match app.copy_output() {
                Some(markup) if copy_to_clipboard(&markup) => {
                    app.log(LogLevel::Ok, "output copied to clipboard".to_string())
                }
                Some(_) => app.log(LogLevel::Warn, "clipboard not available".to_string()),
                None => app.log(LogLevel::Warn, "no output to copy".to_string()),
            },
            Action::ExportCards => match app.export_cards(Path::new(cards::OUTPUT_DIR), "") {
                Ok(Some(path)) => app.log(LogLevel::Ok, format!("exported to {}", path.display())),
                Ok(None) => app.log(LogLevel::Warn, "no cards in output".to_string()),
                Err(e) => app.log(LogLevel::Error, format!("export failed: {e}")),
            },
            Action::None => {}
        }
    }

    Ok(())
}
