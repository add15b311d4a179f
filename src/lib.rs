//! OpsDeck - a terminal menu navigator for day-to-day operations commands
//!
//! This library provides the menu model, the navigation state machine, the
//! category-based command registry and the dispatch loop that ties them to a
//! terminal, plus the configuration-driven catalog of menus.

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod history;
pub mod menu;
pub mod ui;
