//! # Configuration
//!
//! User configuration stored in `~/.config/opsdeck/config.json`.
//!
//! Besides the theme and log level, the file declares the menu tree. Every
//! entry has a `title`, an optional `description` and a `kind`:
//!
//! ```json
//! {
//!   "theme": "Nord",
//!   "menus": [
//!     { "title": "Vault", "kind": "menu", "items": [
//!       { "title": "Status", "kind": "action", "command": "vault status" },
//!       { "title": "Login", "kind": "prompt", "prompts": ["Username", "Password"],
//!         "command": "vault login -method=userpass username=\"$1\" password=\"$2\"" },
//!       { "title": "Secrets", "kind": "dynamic", "command": "vault kv list -format=yaml secret/",
//!         "each": "vault kv get \"secret/$1\"" }
//!     ]}
//!   ]
//! }
//! ```
//!
//! The `directories` crate resolves the platform config directory.

use crate::catalog::builtin::TOOLS_TITLE;
use crate::menu::{ROOT_TITLE, SEPARATOR};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted user configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of a built-in theme.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Record dispatches in the history store.
    #[serde(default = "default_true")]
    pub history: bool,

    #[serde(default)]
    pub menus: Vec<MenuEntry>,
}

/// One node of the configured menu tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuEntry {
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(flatten)]
    pub body: EntryBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryBody {
    /// Nested entries.
    Menu { items: Vec<MenuEntry> },
    /// Run `command` when selected.
    Action {
        command: String,
        #[serde(default = "default_true")]
        pause: bool,
    },
    /// Ask for `prompts`, then run `command` with the answers as `$1..$n`.
    Prompt {
        prompts: Vec<String>,
        command: String,
        #[serde(default = "default_true")]
        pause: bool,
    },
    /// Show the output of `command`.
    Detail { command: String },
    /// One item per output line of `command`; `each` runs with the chosen line as `$1`.
    Dynamic {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        each: Option<String>,
        #[serde(default = "default_true")]
        pause: bool,
    },
    Info,
}

impl EntryBody {
    pub fn kind_name(&self) -> &'static str {
        match self {
            EntryBody::Menu { .. } => "menu",
            EntryBody::Action { .. } => "action",
            EntryBody::Prompt { .. } => "prompt",
            EntryBody::Detail { .. } => "detail",
            EntryBody::Dynamic { .. } => "dynamic",
            EntryBody::Info => "info",
        }
    }
}

fn default_theme_name() -> String {
    "Catppuccin Mocha".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            log_level: default_log_level(),
            history: true,
            menus: Vec::new(),
        }
    }
}

impl Config {
    /// Load from the default location.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific path. Returns `Config::default()` if
    /// the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save the configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Return the path to the default config file.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "opsdeck")
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("config.json"))
    }

    /// Reject entries the menu builder cannot turn into items.
    pub fn validate(&self) -> Result<()> {
        validate_entries(&self.menus, "")
    }
}

/// Titles are selection keys and become registry categories, so they must be
/// unique among siblings and free of the breadcrumb separator.
fn validate_entries(entries: &[MenuEntry], parent: &str) -> Result<()> {
    let location = if parent.is_empty() { "root" } else { parent };
    let mut seen = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let title = entry.title.as_str();
        if title.trim().is_empty() {
            anyhow::bail!("Entry #{} under '{}' has an empty title", index + 1, location);
        }
        if title.contains(SEPARATOR) {
            anyhow::bail!(
                "Entry '{}' under '{}' must not contain '{}'",
                title,
                location,
                SEPARATOR
            );
        }
        if title == ROOT_TITLE || (parent.is_empty() && title == TOOLS_TITLE) {
            anyhow::bail!("Entry title '{}' under '{}' is reserved", title, location);
        }
        if !seen.insert(title) {
            anyhow::bail!("Duplicate entry '{}' under '{}'", title, location);
        }
        let path = if parent.is_empty() {
            title.to_string()
        } else {
            format!("{}{}{}", parent, SEPARATOR, title)
        };
        match &entry.body {
            EntryBody::Menu { items } => validate_entries(items, &path)?,
            EntryBody::Action { command, .. }
            | EntryBody::Detail { command }
            | EntryBody::Dynamic { command, .. } => require_command(command, &path)?,
            EntryBody::Prompt {
                prompts, command, ..
            } => {
                if prompts.is_empty() {
                    anyhow::bail!("Prompt entry '{}' has no prompts", path);
                }
                require_command(command, &path)?;
            }
            EntryBody::Info => {}
        }
    }
    Ok(())
}

fn require_command(command: &str, path: &str) -> Result<()> {
    if command.trim().is_empty() {
        anyhow::bail!("Entry '{}' has an empty command", path);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "Catppuccin Mocha");
        assert_eq!(config.log_level, "info");
        assert!(config.history);
        assert!(config.menus.is_empty());
    }

    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config.theme, "Catppuccin Mocha");
        assert!(config.history);
    }

    #[test]
    fn test_deserialize_menu_kinds() {
        let json = r#"{
            "menus": [
                { "title": "Vault", "kind": "menu", "items": [
                    { "title": "Status", "kind": "action", "command": "vault status" },
                    { "title": "Login", "kind": "prompt", "prompts": ["Username", "Password"],
                      "command": "vault login", "pause": false },
                    { "title": "Version", "kind": "detail", "command": "vault version" },
                    { "title": "Secrets", "kind": "dynamic", "command": "ls", "each": "cat \"$1\"" },
                    { "title": "Docs", "description": "https://vaultproject.io", "kind": "info" }
                ]}
            ]
        }"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        config.validate().expect("valid");

        let EntryBody::Menu { items } = &config.menus[0].body else {
            panic!("expected menu");
        };
        let kinds: Vec<_> = items.iter().map(|e| e.body.kind_name()).collect();
        assert_eq!(kinds, ["action", "prompt", "detail", "dynamic", "info"]);
        assert!(matches!(items[0].body, EntryBody::Action { pause: true, .. }));
        assert!(matches!(items[1].body, EntryBody::Prompt { pause: false, .. }));
        assert_eq!(items[4].description, "https://vaultproject.io");
    }

    #[test]
    fn test_deny_unknown_fields() {
        let json = r#"{"theme": "Nord", "unknown_field": true}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err(), "should reject unknown fields");
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"menus": [{ "title": "X", "kind": "widget" }]}"#;
        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_empty_title() {
        let json = r#"{"menus": [{ "title": "Ops", "kind": "menu", "items": [
            { "title": " ", "kind": "info" }
        ]}]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        let err = config.validate().expect_err("empty title");
        assert!(err.to_string().contains("under 'Ops'"));
    }

    #[test]
    fn test_validate_rejects_empty_prompts_and_commands() {
        let json = r#"{"menus": [{ "title": "P", "kind": "prompt", "prompts": [], "command": "echo" }]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        assert!(config.validate().is_err());

        let json = r#"{"menus": [{ "title": "A", "kind": "action", "command": "" }]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_sibling_titles() {
        let json = r#"{"menus": [
            { "title": "Deploy", "kind": "action", "command": "echo staging" },
            { "title": "Deploy", "kind": "action", "command": "echo prod" }
        ]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        let err = config.validate().expect_err("duplicate title");
        assert!(err.to_string().contains("Duplicate entry 'Deploy' under 'root'"));

        let json = r#"{"menus": [{ "title": "Ops", "kind": "menu", "items": [
            { "title": "Deploy", "kind": "info" },
            { "title": "Deploy", "kind": "info" }
        ]}]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        let err = config.validate().expect_err("duplicate nested title");
        assert!(err.to_string().contains("under 'Ops'"));
    }

    #[test]
    fn test_validate_allows_same_title_in_different_menus() {
        let json = r#"{"menus": [
            { "title": "Status", "kind": "action", "command": "true" },
            { "title": "Vault", "kind": "menu", "items": [
                { "title": "Status", "kind": "action", "command": "vault status" },
                { "title": "Tools", "kind": "info" }
            ]}
        ]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        config.validate().expect("valid");
    }

    #[test]
    fn test_validate_rejects_reserved_titles() {
        let json = r#"{"menus": [{ "title": "Tools", "kind": "info" }]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        let err = config.validate().expect_err("tools is reserved at root");
        assert!(err.to_string().contains("reserved"));

        let json = r#"{"menus": [
            { "title": "OpsDeck", "kind": "menu", "items": [
                { "title": "Status", "kind": "action", "command": "true" }
            ]},
            { "title": "Status", "kind": "action", "command": "true" }
        ]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        assert!(config.validate().is_err());

        let json = r#"{"menus": [{ "title": "Ops", "kind": "menu", "items": [
            { "title": "OpsDeck", "kind": "info" }
        ]}]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_separator_in_title() {
        let json = r#"{"menus": [{ "title": "Vault/Status", "kind": "action", "command": "true" }]}"#;
        let config: Config = serde_json::from_str(json).expect("deserialize");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_to_load_from_roundtrip() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("subdir").join("config.json");

        let config = Config {
            theme: "Dracula".to_string(),
            menus: vec![MenuEntry {
                title: "About".to_string(),
                description: String::new(),
                body: EntryBody::Info,
            }],
            ..Config::default()
        };

        config.save_to(&config_path).expect("save_to");
        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded.theme, "Dracula");
        assert_eq!(loaded.menus.len(), 1);
        assert_eq!(loaded.menus[0].title, "About");
    }

    #[test]
    fn test_load_from_missing_file_returns_default() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("does_not_exist.json");

        let loaded = Config::load_from(&config_path).expect("load_from");
        assert_eq!(loaded.theme, "Catppuccin Mocha");
    }

    #[test]
    fn test_load_from_invalid_file_errors() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let config_path = temp_dir.path().join("config.json");
        fs::write(&config_path, r#"{"menus": [{ "title": "", "kind": "info" }]}"#).expect("write");

        assert!(Config::load_from(&config_path).is_err());
    }
}
