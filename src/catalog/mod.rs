//! # Catalog
//!
//! Turns the configured menu tree into navigator items plus the command
//! registry that acts on them.
//!
//! Each entry gets a category equal to its breadcrumb, the same string the
//! navigator reports when something is chosen there:
//!
//! | Kind | Item | Registry |
//! |------|------|----------|
//! | `menu` | `SubMenu` | - |
//! | `action` | `Dispatch` | runs `command` at the entry path |
//! | `prompt` | `Prompt` / `MultiPrompt` | runs `command` with the answers |
//! | `detail` | `Detail` | - |
//! | `dynamic` | `DynamicSubMenu` | runs `each` at the entry path |
//! | `info` | `Info` | - |

pub mod builtin;
pub mod shell;

use crate::config::{EntryBody, MenuEntry};
use crate::dispatch::CommandRegistry;
use crate::menu::{child_breadcrumb, Item, ItemKind, ROOT_TITLE};
use std::fmt::Write as _;

/// Root items and their handlers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<Item>,
    pub registry: CommandRegistry,
}

impl Catalog {
    pub fn from_entries(entries: &[MenuEntry]) -> Self {
        let mut registry = CommandRegistry::new();
        let items = build_items(entries, ROOT_TITLE, &mut registry);
        log::debug!(
            "Built {} root items and {} handlers from config",
            items.len(),
            registry.len()
        );
        Self { items, registry }
    }

    /// Append another catalog's root items and merge its handlers over ours.
    pub fn extend(&mut self, other: Catalog) {
        self.items.extend(other.items);
        self.registry.combine(other.registry);
    }
}

fn build_items(entries: &[MenuEntry], parent: &str, registry: &mut CommandRegistry) -> Vec<Item> {
    entries
        .iter()
        .filter_map(|entry| build_item(entry, parent, registry))
        .collect()
}

fn build_item(entry: &MenuEntry, parent: &str, registry: &mut CommandRegistry) -> Option<Item> {
    let path = child_breadcrumb(parent, &entry.title);
    let title = entry.title.clone();
    let description = entry.description.clone();

    let item = match &entry.body {
        EntryBody::Menu { items } => {
            Item::submenu(title, description, build_items(items, &path, registry))
        }
        EntryBody::Action { command, pause } => {
            register_command(registry, &path, command.clone(), *pause);
            Item::dispatch(title, description)
        }
        EntryBody::Prompt {
            prompts,
            command,
            pause,
        } => {
            register_command(registry, &path, command.clone(), *pause);
            if let [label] = prompts.as_slice() {
                Item::prompt(title, description, label.clone())
            } else {
                Item::multi_prompt(title, description, prompts.clone(), None)?
            }
        }
        EntryBody::Detail { command } => {
            let command = command.clone();
            let heading = entry.title.clone();
            Item::detail(title, description, move || {
                let body = shell::capture(&command)?;
                Ok((heading.clone(), body))
            })
        }
        EntryBody::Dynamic {
            command,
            each,
            pause,
        } => {
            let command = command.clone();
            let selectable = each.is_some();
            if let Some(each) = each {
                register_command(registry, &path, each.clone(), *pause);
            }
            Item::dynamic(title, description, move || {
                let output = shell::capture(&command)?;
                Ok(shell::output_lines(&output)
                    .into_iter()
                    .map(|line| {
                        if selectable {
                            Item::dispatch(line, "")
                        } else {
                            Item::info(line, "")
                        }
                    })
                    .collect())
            })
        }
        EntryBody::Info => Item::info(title, description),
    };
    Some(item)
}

/// Handler running `command` on the terminal. Prompt answers become `$1..$n`;
/// plain selections pass the chosen label as `$1`.
fn register_command(registry: &mut CommandRegistry, path: &str, command: String, pause: bool) {
    registry.register(
        move |label, args| {
            let code = if args.is_empty() {
                shell::run_interactive(&command, &[label.to_string()])?
            } else {
                shell::run_interactive(&command, args)?
            };
            if code != 0 {
                println!("\nCommand exited with status {}", code);
                return Ok(true);
            }
            Ok(pause)
        },
        &[path],
    );
}

/// Indented outline of `items`, one line per item, for `--debug`.
pub fn describe(items: &[Item]) -> String {
    let mut out = String::new();
    describe_into(&mut out, items, 0);
    out
}

fn describe_into(out: &mut String, items: &[Item], depth: usize) {
    for item in items {
        let _ = writeln!(
            out,
            "{}{} [{}]",
            "  ".repeat(depth),
            item.title,
            item.kind().name()
        );
        match item.kind() {
            ItemKind::SubMenu(children) => describe_into(out, children, depth + 1),
            ItemKind::Prompt(prompt) | ItemKind::MultiPrompt(prompt) => {
                let _ = writeln!(
                    out,
                    "{}asks: {}",
                    "  ".repeat(depth + 1),
                    prompt.labels().join(", ")
                );
            }
            _ => {}
        }
    }
}
