//! # UI Module
//!
//! Terminal user interface for OpsDeck.
//!
//! ## Components
//!
//! - [`Navigator`] - menu state machine (screen stack, prompts, details, loads)
//! - [`mod@render`] - drawing functions for the navigator
//! - [`mod@event`] - event pump turning terminal input into navigator messages
//! - [`TerminalFrontend`] - the dispatcher's view of the real terminal
//! - [`Theme`] - built-in color themes
//!
//! ## Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │  OpsDeck › Vault › Secrets                      │
//! ├─────────────────────────────────────────────────┤
//! │ ▶ Engines        KV engines                     │
//! │ • Status                                        │
//! │ ✎ Login                                         │
//! │                                                 │
//! │           ┌───── Prompt / Detail ─────┐         │
//! │           └───────────────────────────┘         │
//! ├─────────────────────────────────────────────────┤
//! │ [↑↓/jk] Navigate  [Enter/l] Select  [Q] Quit    │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod event;
pub mod navigator;
pub mod render;
pub mod terminal;
pub mod theme;

pub use navigator::{Mode, NavMessage, Navigator, PendingAction, Selection};
pub use render::render;
pub use terminal::{run_navigator, TerminalFrontend};
pub use theme::Theme;
