//! Built-in `Tools` menu, appended after the configured menus.

use super::{shell, Catalog};
use crate::dispatch::CommandRegistry;
use crate::history::{format_recent, HistoryTracker, MAX_RECENT_COMMANDS};
use crate::menu::Item;
use std::sync::{Arc, Mutex};

pub const TOOLS_TITLE: &str = "Tools";
pub const ENVIRONMENT_TITLE: &str = "Environment";
pub const RUN_SHELL_TITLE: &str = "Run Shell Command";

/// Longest environment value shown as an item description.
const MAX_DESCRIPTION_LEN: usize = 60;

/// The `Tools` root item and its handlers.
pub fn tools(history: Option<Arc<Mutex<HistoryTracker>>>) -> Catalog {
    let items = vec![Item::submenu(
        TOOLS_TITLE,
        "Built-in utilities",
        vec![
            recent_commands(history.clone()),
            clear_history(history),
            environment(),
            Item::prompt_with_action(
                RUN_SHELL_TITLE,
                "Run a command through sh -c",
                "Command",
                |args| {
                    let command = args.first().map(String::as_str).unwrap_or_default();
                    let code = shell::run_interactive(command, &[])?;
                    println!("\nExited with status {}", code);
                    Ok(())
                },
            ),
            Item::info(
                "About",
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            ),
        ],
    )];

    Catalog {
        items,
        registry: registry(),
    }
}

fn registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(
        |label, _| {
            match std::env::var(label) {
                Ok(value) => println!("{}={}", label, value),
                Err(_) => println!("{} is not set", label),
            }
            Ok(true)
        },
        &[TOOLS_TITLE, ENVIRONMENT_TITLE],
    );
    // The command itself runs as the deferred action; this keeps its output
    // on screen until acknowledged.
    registry.register(|_, _| Ok(true), &[TOOLS_TITLE, RUN_SHELL_TITLE]);
    registry
}

fn recent_commands(history: Option<Arc<Mutex<HistoryTracker>>>) -> Item {
    Item::detail("Recent Commands", "Most used commands", move || {
        let body = match &history {
            Some(history) => {
                let tracker = history
                    .lock()
                    .map_err(|_| anyhow::anyhow!("History store is poisoned"))?;
                format_recent(&tracker.frequent(MAX_RECENT_COMMANDS))
            }
            None => "History is disabled in the configuration.".to_string(),
        };
        Ok(("Recent Commands".to_string(), body))
    })
}

fn clear_history(history: Option<Arc<Mutex<HistoryTracker>>>) -> Item {
    Item::action("Clear History", "Forget recorded commands", move || {
        let Some(history) = &history else {
            return Ok(());
        };
        let mut tracker = history
            .lock()
            .map_err(|_| anyhow::anyhow!("History store is poisoned"))?;
        tracker.clear()?;
        log::info!("History cleared");
        Ok(())
    })
}

fn environment() -> Item {
    Item::dynamic(ENVIRONMENT_TITLE, "Environment variables", || {
        let mut vars: Vec<(String, String)> = std::env::vars().collect();
        vars.sort();
        Ok(vars
            .into_iter()
            .map(|(name, value)| Item::dispatch(name, truncate(&value, MAX_DESCRIPTION_LEN)))
            .collect())
    })
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let head: String = value.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{ItemKind, ROOT_TITLE};
    use tempfile::TempDir;

    fn tools_items(catalog: &Catalog) -> &[Item] {
        match catalog.items[0].kind() {
            ItemKind::SubMenu(items) => items,
            _ => panic!("expected Tools submenu"),
        }
    }

    #[test]
    fn test_tools_layout() {
        let catalog = tools(None);
        assert_eq!(catalog.items.len(), 1);
        assert_eq!(catalog.items[0].title, TOOLS_TITLE);

        let kinds: Vec<&str> = tools_items(&catalog)
            .iter()
            .map(|i| i.kind().name())
            .collect();
        assert_eq!(kinds, ["detail", "action", "dynamic", "prompt", "info"]);
    }

    #[test]
    fn test_environment_handler_resolves_for_dynamic_items() {
        let catalog = tools(None);
        let handler = catalog
            .registry
            .resolve("Tools/Environment", "PATH")
            .expect("environment handler");
        assert!(handler("PATH", &[]).expect("handler"));
        assert!(catalog.registry.resolve(ROOT_TITLE, "Tools").is_none());
    }

    #[test]
    fn test_environment_lists_variables() {
        let catalog = tools(None);
        let ItemKind::DynamicSubMenu(producer) = tools_items(&catalog)[2].kind() else {
            panic!("expected dynamic submenu");
        };
        let items = producer().expect("produce");
        let names: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_recent_commands_and_clear() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let tracker = HistoryTracker::with_storage_dir(temp_dir.path()).expect("open");
        let history = Arc::new(Mutex::new(tracker));
        history
            .lock()
            .expect("lock")
            .record("VPN", "Connect")
            .expect("record");

        let catalog = tools(Some(history.clone()));
        let items = tools_items(&catalog);

        let ItemKind::Detail(producer) = items[0].kind() else {
            panic!("expected detail");
        };
        let (heading, body) = producer().expect("produce");
        assert_eq!(heading, "Recent Commands");
        assert!(body.contains("VPN/Connect"));

        let ItemKind::Action(action) = items[1].kind() else {
            panic!("expected action");
        };
        action().expect("clear");
        assert!(history.lock().expect("lock").is_empty());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }
}
