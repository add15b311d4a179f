//! # Navigator
//!
//! The menu navigation state machine. It owns the screen stack and the current
//! [`Mode`], consumes one [`NavMessage`] at a time, and ends in
//! [`Mode::Quitting`], after which [`Navigator::into_selection`] hands the
//! outcome to the dispatcher.
//!
//! ## Modes
//!
//! ```text
//!              activate Detail              back / cancel / q
//!   Browsing ------------------> ShowingDetail -----------------> Browsing
//!      |  activate DynamicSubMenu            Loaded
//!      +-------------------------> Loading ---------> Browsing (screen pushed)
//!      |  activate Prompt / MultiPrompt      last confirm
//!      +-------------------------> Collecting ------> Quitting
//!      |                               | cancel
//!      |                               +-----------> Browsing
//!      |  activate Dispatch / Action, or quit
//!      +-------------------------> Quitting
//! ```
//!
//! Only one dynamic load can be in flight: loads start from `Browsing`, and
//! `Loading` rejects every key except quit until its result arrives.

use crate::menu::{
    child_breadcrumb, produce_detail, produce_items, ActionFn, Item, ItemKind, ItemsProducer,
    ParamActionFn, Prompt, Screen,
};
use crate::ui::render::list_rows;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use regex::Regex;
use std::sync::OnceLock;
use tokio::sync::mpsc::UnboundedSender;

static PASSWORD_LABEL: OnceLock<Regex> = OnceLock::new();

/// Whether input typed for `label` should be masked on screen.
pub fn is_password_label(label: &str) -> bool {
    PASSWORD_LABEL
        .get_or_init(|| Regex::new(r"(?i)password").expect("valid password label pattern"))
        .is_match(label)
}

/// Everything the navigator reacts to, processed one at a time.
#[derive(Debug)]
pub enum NavMessage {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Emitted when no input arrived within the poll timeout; drives the spinner.
    Tick,
    /// Result of a dynamic submenu producer started by the item titled `origin`.
    Loaded { origin: String, items: Vec<Item> },
}

/// Input being collected for a prompt item.
#[derive(Clone)]
pub struct PromptSession {
    pub title: String,
    labels: Vec<String>,
    action: Option<ParamActionFn>,
    step: usize,
    args: Vec<String>,
    pub input: String,
}

impl PromptSession {
    fn new(title: &str, prompt: &Prompt) -> Self {
        Self {
            title: title.to_string(),
            labels: prompt.labels().to_vec(),
            action: prompt.action().cloned(),
            step: 0,
            args: Vec::new(),
            input: String::new(),
        }
    }

    /// Label of the value currently being typed.
    pub fn label(&self) -> &str {
        self.labels.get(self.step).map_or("", String::as_str)
    }

    pub fn masked(&self) -> bool {
        is_password_label(self.label())
    }

    /// One-based position of the current step and the number of steps.
    pub fn progress(&self) -> (usize, usize) {
        (self.step + 1, self.labels.len())
    }

    pub fn collected(&self) -> &[String] {
        &self.args
    }

    /// Text to draw for the current input, masked for password labels.
    pub fn display_input(&self) -> String {
        if self.masked() {
            "*".repeat(self.input.chars().count())
        } else {
            self.input.clone()
        }
    }
}

/// Read-only text shown for a detail item.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub heading: String,
    pub body: String,
    pub scroll: u16,
}

pub enum Mode {
    Browsing,
    Collecting(PromptSession),
    ShowingDetail(DetailView),
    Loading { origin: String },
    Quitting,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Browsing => "browsing",
            Mode::Collecting(_) => "collecting",
            Mode::ShowingDetail(_) => "showing-detail",
            Mode::Loading { .. } => "loading",
            Mode::Quitting => "quitting",
        }
    }
}

/// Closure waiting to run once the interactive renderer released the terminal.
#[derive(Clone)]
pub enum Deferred {
    Plain(ActionFn),
    WithArgs(ParamActionFn),
}

/// A deferred action together with the selection that queued it.
#[derive(Clone)]
pub struct PendingAction {
    pub label: String,
    pub category: String,
    pub args: Vec<String>,
    deferred: Deferred,
}

impl PendingAction {
    /// Run the deferred closure. Consumes the action, so it runs at most once.
    pub fn run(self) -> anyhow::Result<()> {
        match self.deferred {
            Deferred::Plain(action) => action(),
            Deferred::WithArgs(action) => action(&self.args),
        }
    }
}

/// What the navigator yields once it is quitting.
#[derive(Default)]
pub struct Selection {
    pub label: String,
    pub category: String,
    pub args: Vec<String>,
    pub quit_without_selection: bool,
    pending: Option<PendingAction>,
}

impl Selection {
    fn quit() -> Self {
        Self {
            quit_without_selection: true,
            ..Self::default()
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the deferred action, leaving `None` behind.
    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}

pub struct Navigator {
    stack: Vec<Screen>,
    mode: Mode,
    /// Whether typed characters edit the filter of the current screen.
    pub filtering: bool,
    selection: Selection,
    loader: UnboundedSender<NavMessage>,
    viewport_height: usize,
    pub spinner_frame: usize,
}

impl Navigator {
    /// Start browsing at `root`. Dynamic submenu results are posted to `loader`.
    pub fn new(root: Screen, loader: UnboundedSender<NavMessage>) -> Self {
        Self {
            stack: vec![root],
            mode: Mode::Browsing,
            filtering: false,
            selection: Selection::quit(),
            loader,
            viewport_height: 1,
            spinner_frame: 0,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_quitting(&self) -> bool {
        matches!(self.mode, Mode::Quitting)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn current(&self) -> &Screen {
        // The stack starts with the root screen and `back` never pops it.
        &self.stack[self.stack.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Screen {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    pub fn breadcrumb(&self) -> &str {
        &self.current().title
    }

    /// Hand the outcome to the dispatcher.
    pub fn into_selection(self) -> Selection {
        self.selection
    }

    fn set_mode(&mut self, mode: Mode) {
        log::debug!("Navigator: {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
    }

    pub fn handle(&mut self, message: NavMessage) {
        match message {
            NavMessage::Key(key) => self.handle_key(key),
            NavMessage::Resize { height, .. } => self.set_viewport_height(list_rows(height)),
            NavMessage::Tick => self.spinner_frame = self.spinner_frame.wrapping_add(1),
            NavMessage::Loaded { origin, items } => self.finish_load(origin, items),
        }
    }

    /// Rows available to list items on every screen.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        let height = self.viewport_height;
        for screen in &mut self.stack {
            screen.set_height(height);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl_c =
            key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c');
        if ctrl_c {
            self.quit();
            return;
        }

        match self.mode {
            Mode::Browsing if self.filtering => self.handle_filter_key(key),
            Mode::Browsing => self.handle_browse_key(key),
            Mode::Collecting(_) => self.handle_collect_key(key),
            Mode::ShowingDetail(_) => self.handle_detail_key(key),
            Mode::Loading { .. } => {
                if matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q')) {
                    self.quit();
                }
            }
            Mode::Quitting => {}
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('h') => self.back(),
            KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => self.activate(),
            KeyCode::Down | KeyCode::Char('j') => self.current_mut().next(),
            KeyCode::Up | KeyCode::Char('k') => self.current_mut().previous(),
            KeyCode::PageDown => self.current_mut().page_down(),
            KeyCode::PageUp => self.current_mut().page_up(),
            KeyCode::Home | KeyCode::Char('g') => self.current_mut().first(),
            KeyCode::End | KeyCode::Char('G') => self.current_mut().last(),
            KeyCode::Char('/') => self.filtering = true,
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.filtering = false;
                self.current_mut().set_filter("");
            }
            KeyCode::Enter => self.activate(),
            KeyCode::Down => self.current_mut().next(),
            KeyCode::Up => self.current_mut().previous(),
            KeyCode::Backspace => self.current_mut().filter_pop(),
            KeyCode::Char(c) => self.current_mut().filter_push(c),
            _ => {}
        }
    }

    fn handle_collect_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.confirm_input(),
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Backspace => {
                if let Mode::Collecting(session) = &mut self.mode {
                    session.input.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Mode::Collecting(session) = &mut self.mode {
                    session.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc
            | KeyCode::Backspace
            | KeyCode::Left
            | KeyCode::Char('h')
            | KeyCode::Char('q')
            | KeyCode::Char('Q') => self.set_mode(Mode::Browsing),
            KeyCode::Down | KeyCode::Char('j') => {
                if let Mode::ShowingDetail(view) = &mut self.mode {
                    view.scroll = view.scroll.saturating_add(1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Mode::ShowingDetail(view) = &mut self.mode {
                    view.scroll = view.scroll.saturating_sub(1);
                }
            }
            _ => {}
        }
    }

    /// Quit without a selection. Always honored, whatever the mode.
    pub fn quit(&mut self) {
        self.selection = Selection::quit();
        self.set_mode(Mode::Quitting);
    }

    /// Pop the current screen. The root screen is never popped.
    pub fn back(&mut self) {
        if !matches!(self.mode, Mode::Browsing) {
            return;
        }
        if self.stack.len() > 1 {
            self.stack.pop();
            self.filtering = false;
        }
    }

    /// Activate the selected item of the current screen.
    pub fn activate(&mut self) {
        if !matches!(self.mode, Mode::Browsing) {
            return;
        }
        let Some(item) = self.current().selected_item().cloned() else {
            return;
        };
        let breadcrumb = self.breadcrumb().to_string();
        log::debug!(
            "Activating {} item '{}' in '{}'",
            item.kind().name(),
            item.title,
            breadcrumb
        );

        match item.kind() {
            ItemKind::Detail(producer) => {
                let (heading, body) = produce_detail(producer);
                self.set_mode(Mode::ShowingDetail(DetailView {
                    heading,
                    body,
                    scroll: 0,
                }));
            }
            ItemKind::DynamicSubMenu(producer) => {
                self.start_load(&item.title, producer);
            }
            ItemKind::SubMenu(items) => {
                let title = child_breadcrumb(&breadcrumb, &item.title);
                self.push_screen(Screen::new(title, items.clone()));
            }
            ItemKind::Prompt(prompt) | ItemKind::MultiPrompt(prompt) => {
                self.set_mode(Mode::Collecting(PromptSession::new(&item.title, prompt)));
            }
            ItemKind::Dispatch => {
                self.choose(item.title.clone(), breadcrumb, Vec::new(), None);
            }
            ItemKind::Action(action) => {
                let deferred = Deferred::Plain(action.clone());
                self.choose(item.title.clone(), breadcrumb, Vec::new(), Some(deferred));
            }
            ItemKind::Info => {}
        }
    }

    fn start_load(&mut self, origin: &str, producer: &ItemsProducer) {
        if !matches!(self.mode, Mode::Browsing) {
            log::warn!("Ignoring load of '{}' while {}", origin, self.mode.name());
            return;
        }
        log::info!("Loading submenu '{}'", origin);
        self.set_mode(Mode::Loading {
            origin: origin.to_string(),
        });

        let producer = producer.clone();
        let loader = self.loader.clone();
        let load_origin = origin.to_string();
        let load = move || {
            let items = produce_items(&producer);
            let loaded = NavMessage::Loaded {
                origin: load_origin,
                items,
            };
            if loader.send(loaded).is_err() {
                log::debug!("Navigator closed before submenu finished loading");
            }
        };

        // Outside a Tokio runtime the producer gets its own thread.
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn_blocking(load);
            return;
        }
        log::debug!("No async runtime, loading '{}' on a plain thread", origin);
        let spawned = std::thread::Builder::new()
            .name("opsdeck-loader".to_string())
            .spawn(load);
        if let Err(e) = spawned {
            let err = anyhow::Error::from(e).context("Failed to start submenu loader");
            log::error!("{:#}", err);
            let failed = NavMessage::Loaded {
                origin: origin.to_string(),
                items: vec![Item::error(&err)],
            };
            if self.loader.send(failed).is_err() {
                log::debug!("Navigator channel closed");
            }
        }
    }

    fn finish_load(&mut self, origin: String, items: Vec<Item>) {
        match &self.mode {
            Mode::Loading { origin: expected } if *expected == origin => {
                log::info!("Loaded {} items for '{}'", items.len(), origin);
                let title = child_breadcrumb(self.breadcrumb(), &origin);
                self.set_mode(Mode::Browsing);
                self.push_screen(Screen::new(title, items));
            }
            _ => {
                log::warn!(
                    "Dropping submenu result for '{}' while {}",
                    origin,
                    self.mode.name()
                );
            }
        }
    }

    fn push_screen(&mut self, mut screen: Screen) {
        screen.set_height(self.viewport_height);
        self.filtering = false;
        self.stack.push(screen);
    }

    fn confirm_input(&mut self) {
        let Mode::Collecting(session) = &mut self.mode else {
            return;
        };
        let value = std::mem::take(&mut session.input);
        session.args.push(value);
        session.step += 1;
        if session.step < session.labels.len() {
            return;
        }

        let title = session.title.clone();
        let args = std::mem::take(&mut session.args);
        let deferred = session.action.clone().map(Deferred::WithArgs);
        let breadcrumb = self.breadcrumb().to_string();
        self.choose(title, breadcrumb, args, deferred);
    }

    fn cancel_input(&mut self) {
        if matches!(self.mode, Mode::Collecting(_)) {
            self.set_mode(Mode::Browsing);
        }
    }

    fn choose(
        &mut self,
        label: String,
        category: String,
        args: Vec<String>,
        deferred: Option<Deferred>,
    ) {
        log::info!("Selected '{}' in '{}'", label, category);
        let pending = deferred.map(|deferred| PendingAction {
            label: label.clone(),
            category: category.clone(),
            args: args.clone(),
            deferred,
        });
        self.selection = Selection {
            label,
            category,
            args,
            quit_without_selection: false,
            pending,
        };
        self.set_mode(Mode::Quitting);
    }

    /// Screen titles from root to top.
    pub fn breadcrumbs(&self) -> Vec<&str> {
        self.stack.iter().map(|s| s.title.as_str()).collect()
    }
}
