//! # Terminal Frontend
//!
//! Owns the real terminal for the dispatch loop. Each call to
//! [`Frontend::navigate`] enters raw mode and the alternate screen, runs the
//! navigator until it quits, and restores the terminal before returning, so
//! handlers always print to a normal terminal.

use crate::dispatch::{Acknowledgement, Frontend};
use crate::menu::Screen;
use crate::ui::event::{next_message, CrosstermEventReader, EventReader, POLL_TIMEOUT};
use crate::ui::navigator::{Navigator, Selection};
use crate::ui::render::{list_rows, render};
use crate::ui::theme::Theme;
use anyhow::{Context, Result};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::{self, Write};
use tokio::sync::mpsc::unbounded_channel;

const ACKNOWLEDGE_PROMPT: &str = "Press any key to continue, q to quit";

/// Drive a navigator over `root` until it quits and return its selection.
pub fn run_navigator<B>(
    terminal: &mut Terminal<B>,
    root: Screen,
    theme: &Theme,
    reader: &mut dyn EventReader,
) -> Result<Selection>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let (tx, mut rx) = unbounded_channel();
    let mut nav = Navigator::new(root, tx);
    let size = terminal.size().context("Failed to read terminal size")?;
    nav.set_viewport_height(list_rows(size.height));

    loop {
        terminal
            .draw(|f| render(f, &nav, theme))
            .context("Failed to draw terminal UI")?;
        if nav.is_quitting() {
            break;
        }
        if let Some(message) = next_message(reader, &mut rx, POLL_TIMEOUT)? {
            nav.handle(message);
        }
    }

    Ok(nav.into_selection())
}

/// [`Frontend`] backed by the process terminal.
pub struct TerminalFrontend {
    theme: &'static Theme,
}

impl TerminalFrontend {
    pub fn new(theme: &'static Theme) -> Self {
        Self { theme }
    }
}

impl Frontend for TerminalFrontend {
    fn navigate(&mut self, root: Screen) -> Result<Selection> {
        enable_raw_mode().context("Failed to enable raw mode for terminal")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to setup terminal");
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = match Terminal::new(backend) {
            Ok(terminal) => terminal,
            Err(e) => {
                let _ = restore_terminal();
                return Err(e).context("Failed to create terminal");
            }
        };

        let mut reader = CrosstermEventReader;
        let run_result = run_navigator(&mut terminal, root, self.theme, &mut reader);

        // Restore terminal (always runs, even if the navigator failed)
        let cleanup_result = cleanup_terminal(&mut terminal);

        let selection = run_result?;
        cleanup_result?;
        Ok(selection)
    }

    fn clear_screen(&mut self) -> Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))
            .context("Failed to clear screen")
    }

    fn acknowledge(&mut self) -> Acknowledgement {
        print!("\n{} ", ACKNOWLEDGE_PROMPT);
        let _ = io::stdout().flush();

        let answer = match read_raw_key() {
            Ok(code) => acknowledgement_for_key(code),
            Err(e) => {
                log::warn!("Raw keystroke unavailable, reading a line: {:#}", e);
                let mut line = String::new();
                match io::stdin().read_line(&mut line) {
                    Ok(_) => acknowledgement_for_line(&line),
                    Err(e) => {
                        log::error!("Failed to read acknowledgment: {}", e);
                        Acknowledgement::Continue
                    }
                }
            }
        };
        println!();
        answer
    }
}

fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Best-effort restore used when the terminal was only partly set up, and
/// from the panic hook.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(io::stdout(), LeaveAlternateScreen).context("Failed to restore terminal")?;
    Ok(())
}

fn read_raw_key() -> Result<KeyCode> {
    enable_raw_mode().context("Failed to enable raw mode for terminal")?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(key.code),
            Ok(_) => continue,
            Err(e) => break Err(e).context("Failed to read keyboard event"),
        }
    };
    let _ = disable_raw_mode();
    result
}

fn acknowledgement_for_key(code: KeyCode) -> Acknowledgement {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Acknowledgement::Quit,
        _ => Acknowledgement::Continue,
    }
}

fn acknowledgement_for_line(line: &str) -> Acknowledgement {
    if line.trim_start().starts_with(['q', 'Q']) {
        Acknowledgement::Quit
    } else {
        Acknowledgement::Continue
    }
}
