//! # Event Pump
//!
//! Turns terminal input and finished submenu loads into [`NavMessage`]s.
//!
//! Finished loads are drained before every input poll, so a result that is
//! already waiting is handled before the next keystroke. When the poll times
//! out without input a [`NavMessage::Tick`] is produced to animate the
//! loading spinner.

use crate::ui::navigator::NavMessage;
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// How long one input poll waits before producing a tick.
pub const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Source of terminal events (allows dependency injection for testing)
pub trait EventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>>;
}

/// Production event reader that uses crossterm's event polling + read
pub struct CrosstermEventReader;

impl EventReader for CrosstermEventReader {
    fn read_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if event::poll(timeout).context("Failed to poll for events")? {
            Ok(Some(
                event::read().context("Failed to read keyboard event")?,
            ))
        } else {
            Ok(None)
        }
    }
}

/// Next message for the navigator.
///
/// Key releases and repeats, mouse and focus events are skipped without
/// producing anything, so the caller simply asks again.
pub fn next_message(
    reader: &mut dyn EventReader,
    loads: &mut UnboundedReceiver<NavMessage>,
    timeout: Duration,
) -> Result<Option<NavMessage>> {
    if let Ok(message) = loads.try_recv() {
        return Ok(Some(message));
    }

    let message = match reader.read_event(timeout)? {
        None => Some(NavMessage::Tick),
        Some(Event::Key(key)) if key.kind == KeyEventKind::Press => Some(NavMessage::Key(key)),
        Some(Event::Resize(width, height)) => Some(NavMessage::Resize { width, height }),
        Some(_) => None,
    };
    Ok(message)
}
