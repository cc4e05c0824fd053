//! Terminal user interface
//!
//! Two screens, each returning its result instead of storing it:
//! - a picker over ranked matches
//! - a prompt that collects placeholder values next to the command's document

pub mod app;
pub mod msg; // TEA message types (what happened)
pub mod state; // Pure state transformations (functional core)
pub mod ui;
pub mod update; // TEA update functions (state transitions)

use std::collections::HashMap;
use std::io;

use crossterm::{
    event::{read, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing::debug;

use crate::command::Command;
use crate::error::Result;
use crate::search::Ranked;

use app::{key_msg, Outcome, PickerApp, PromptApp};
use msg::{Mode, Msg};

/// Let the user choose one of `ranked`; `None` when cancelled
pub fn pick(ranked: &[Ranked]) -> Result<Option<usize>> {
    let mut app = PickerApp::new(ranked);
    with_terminal(|terminal| {
        let size = terminal.size()?;
        app.handle(Msg::Resize(size.width, size.height));
        loop {
            terminal.draw(|f| ui::draw_picker(f, &app))?;
            let msg = match read()? {
                Event::Key(key) => key_msg(key, Mode::Picker),
                Event::Resize(width, height) => Msg::Resize(width, height),
                _ => continue,
            };
            match app.handle(msg) {
                Outcome::Continue => {}
                Outcome::Cancelled => return Ok(None),
                Outcome::Finished(index) => return Ok(Some(index)),
            }
        }
    })
}

/// Collect a value for every placeholder of `command`; `None` when cancelled
///
/// A command without placeholders resolves without touching the terminal.
pub fn resolve(command: &Command) -> Result<Option<HashMap<String, String>>> {
    let mut app = PromptApp::new(command, load_document(command));
    if app.is_done() {
        return Ok(Some(app.resolver.values().clone()));
    }

    with_terminal(|terminal| {
        let size = terminal.size()?;
        app.handle(Msg::Resize(size.width, size.height));
        loop {
            terminal.draw(|f| ui::draw_prompt(f, &app))?;
            let msg = match read()? {
                Event::Key(key) => key_msg(key, Mode::Prompt),
                Event::Resize(width, height) => Msg::Resize(width, height),
                _ => continue,
            };
            match app.handle(msg) {
                Outcome::Continue => {}
                Outcome::Cancelled => return Ok(None),
                Outcome::Finished(()) => return Ok(Some(app.resolver.values().clone())),
            }
        }
    })
}

/// The rendered markdown of a command, falling back to its script
fn load_document(command: &Command) -> String {
    match std::fs::read_to_string(&command.markdown_file) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %command.markdown_file.display(), error = %e, "markdown not readable, showing script");
            command.content.clone()
        }
    }
}

fn with_terminal<T>(
    run: impl FnOnce(&mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<T>,
) -> Result<T> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(e.into());
    }
    let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            return Err(e.into());
        }
    };

    // Run the screen, ensuring cleanup happens even on error
    let result = run(&mut terminal);

    // Restore terminal - this MUST run even if the screen fails
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    result.map_err(Into::into)
}
