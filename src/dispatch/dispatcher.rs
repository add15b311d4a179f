use crate::dispatch::registry::CommandRegistry;
use crate::history::HistoryTracker;
use crate::menu::{Item, Screen};
use crate::ui::navigator::Selection;
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// What the user answered to the "press any key" pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgement {
    Continue,
    Quit,
}

/// Terminal-facing side of the dispatch loop.
///
/// `navigate` must return only after the interactive renderer has released
/// the terminal: handlers and deferred actions print to the real terminal.
pub trait Frontend {
    fn navigate(&mut self, root: Screen) -> Result<Selection>;
    fn clear_screen(&mut self) -> Result<()>;
    fn acknowledge(&mut self) -> Acknowledgement;
}

/// Source of the top-level category menus, rebuilt at the start of every cycle.
pub type MenuSource = Box<dyn Fn() -> Vec<Item>>;

/// Whether the loop should run another cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Dispatcher<'a> {
    registry: &'a CommandRegistry,
    menus: MenuSource,
    history: Option<Arc<Mutex<HistoryTracker>>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a CommandRegistry, menus: MenuSource) -> Self {
        Self {
            registry,
            menus,
            history: None,
        }
    }

    pub fn with_history(mut self, history: Arc<Mutex<HistoryTracker>>) -> Self {
        self.history = Some(history);
        self
    }

    /// Run navigation cycles until the user quits.
    pub fn run(&self, frontend: &mut dyn Frontend) -> Result<()> {
        loop {
            let root = Screen::root((self.menus)());
            let selection = frontend.navigate(root)?;
            if self.dispatch(selection, frontend)? == Flow::Quit {
                log::info!("Dispatch loop finished");
                return Ok(());
            }
        }
    }

    /// Route one navigator outcome: registry handler first, then the pending
    /// deferred action, each optionally followed by an acknowledgment pause.
    pub fn dispatch(&self, mut selection: Selection, frontend: &mut dyn Frontend) -> Result<Flow> {
        if selection.quit_without_selection {
            return Ok(Flow::Quit);
        }
        frontend.clear_screen()?;

        let mut pause = false;
        let mut dispatched = false;
        match self
            .registry
            .resolve(&selection.category, &selection.label)
        {
            Some(handler) => {
                log::info!(
                    "Dispatching '{}' in '{}' with {} args",
                    selection.label,
                    selection.category,
                    selection.args.len()
                );
                dispatched = true;
                match handler(&selection.label, &selection.args) {
                    Ok(wait) => pause = wait,
                    Err(e) => {
                        log::error!("Command '{}' failed: {:#}", selection.label, e);
                        eprintln!("Error: {:#}", e);
                        pause = true;
                    }
                }
            }
            None => {
                log::warn!(
                    "No handler registered for '{}' (selected '{}')",
                    selection.category,
                    selection.label
                );
            }
        }

        if let Some(pending) = selection.take_pending() {
            log::info!("Running deferred action '{}'", pending.label);
            dispatched = true;
            if let Err(e) = pending.run() {
                log::error!("Deferred action failed: {:#}", e);
                eprintln!("Error: {:#}", e);
                pause = true;
            }
        }

        if dispatched {
            self.record(&selection);
        }

        if pause && frontend.acknowledge() == Acknowledgement::Quit {
            return Ok(Flow::Quit);
        }
        Ok(Flow::Continue)
    }

    fn record(&self, selection: &Selection) {
        let Some(history) = &self.history else {
            return;
        };
        match history.lock() {
            Ok(mut tracker) => {
                if let Err(e) = tracker.record(&selection.category, &selection.label) {
                    log::warn!("Failed to record history: {:#}", e);
                }
            }
            Err(_) => log::warn!(
                "History store is poisoned, not recording '{}'",
                selection.label
            ),
        }
    }
}
