//! # OpsDeck CLI Entry Point
//!
//! OpsDeck presents the operations commands declared in its configuration as
//! nested terminal menus and runs whatever is chosen on the real terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Use ~/.config/opsdeck/config.json
//! opsdeck
//!
//! # Use a specific config file and theme
//! opsdeck --config ./ops.json --theme Nord
//!
//! # Debug mode - print the menu tree and registered categories and exit
//! opsdeck --debug
//! ```
//!
//! ## Key Bindings
//!
//! - `j` / `k` / arrows - Move selection
//! - `Enter` / `l` / `Right` - Open or run the selected item
//! - `Esc` / `h` / `Left` / `Backspace` - Back to the previous screen
//! - `/` - Filter the current screen
//! - `g` / `G`, `PageUp` / `PageDown` - Jump
//! - `q` - Quit, `Ctrl+C` quits from anywhere

use opsdeck::catalog::{self, builtin, Catalog};
use opsdeck::config::Config;
use opsdeck::dispatch::{Dispatcher, MenuSource};
use opsdeck::history::HistoryTracker;
use opsdeck::ui::terminal::restore_terminal;
use opsdeck::ui::{TerminalFrontend, Theme};

use anyhow::{Context, Result};
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::{self, File};
use std::panic;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// OpsDeck - menus for the commands you run every day
#[derive(Parser, Debug)]
#[command(name = "opsdeck")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A terminal menu navigator for operations commands", long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Theme name, overriding the configuration
    #[arg(short, long, value_name = "NAME")]
    theme: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Print the menu tree and registered categories and exit
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up panic hook to ensure terminal is restored on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let result = run_application(args);

    // Restore panic hook
    let _ = panic::take_hook();

    result
}

fn run_application(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    init_logging(args.log_level.as_deref().unwrap_or(&config.log_level));
    log::info!("OpsDeck {} starting up", env!("CARGO_PKG_VERSION"));

    let theme = Theme::resolve(args.theme.as_deref().unwrap_or(&config.theme));

    // Initialize history tracking (gracefully handle errors)
    let history = if config.history {
        match HistoryTracker::new() {
            Ok(tracker) => Some(Arc::new(Mutex::new(tracker))),
            Err(e) => {
                eprintln!("Warning: Could not initialize history tracking: {}", e);
                log::warn!("History disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    let mut catalog = Catalog::from_entries(&config.menus);
    catalog.extend(builtin::tools(history.clone()));
    log::info!(
        "Loaded {} root menus and {} command categories",
        catalog.items.len(),
        catalog.registry.len()
    );

    if args.debug {
        print_debug(&catalog);
        return Ok(());
    }

    let Catalog { items, registry } = catalog;
    let menus: MenuSource = Box::new(move || items.clone());
    let mut dispatcher = Dispatcher::new(&registry, menus);
    if let Some(history) = history {
        dispatcher = dispatcher.with_history(history);
    }

    let mut frontend = TerminalFrontend::new(theme);
    dispatcher.run(&mut frontend)
}

/// Log to `<data dir>/opsdeck.log`; the terminal belongs to the UI.
fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or(LevelFilter::Info);

    if let Err(e) = open_log_file().and_then(|file| install_logger(filter, file)) {
        eprintln!("Warning: Logging disabled: {:#}", e);
    }

    if filter == LevelFilter::Info && !level.eq_ignore_ascii_case("info") {
        log::warn!("Unknown log level '{}', using info", level);
    }
}

fn install_logger(filter: LevelFilter, file: File) -> Result<()> {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    WriteLogger::init(filter, log_config, file).context("Failed to install file logger")
}

fn open_log_file() -> Result<File> {
    let dirs = directories::ProjectDirs::from("", "", "opsdeck")
        .context("Failed to determine application data directory")?;
    let dir = dirs.data_dir();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    let path = dir.join("opsdeck.log");
    File::create(&path).with_context(|| format!("Failed to create log file: {}", path.display()))
}

fn print_debug(catalog: &Catalog) {
    println!("Menu tree:");
    print!("{}", catalog::describe(&catalog.items));
    println!();
    println!("Registered categories ({}):", catalog.registry.len());
    for category in catalog.registry.categories() {
        println!("  {}", category);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_args_parsing_defaults() {
        let args = Args::try_parse_from(["opsdeck"]).expect("parse");
        assert!(args.config.is_none());
        assert!(args.theme.is_none());
        assert!(!args.debug);
    }

    #[test]
    fn test_args_parsing_all_flags() {
        let args = Args::try_parse_from([
            "opsdeck",
            "--config",
            "ops.json",
            "--theme",
            "Nord",
            "--log-level",
            "debug",
            "--debug",
        ])
        .expect("parse");
        assert_eq!(args.config, Some(PathBuf::from("ops.json")));
        assert_eq!(args.theme.as_deref(), Some("Nord"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.debug);
    }

    #[test]
    fn test_second_logger_install_is_reported() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let open = |name: &str| File::create(temp_dir.path().join(name)).expect("create log file");
        let _ = install_logger(LevelFilter::Off, open("first.log"));

        let err = install_logger(LevelFilter::Off, open("second.log")).expect_err("already set");
        assert!(format!("{:#}", err).contains("Failed to install file logger"));
    }

    #[test]
    fn test_run_application_rejects_invalid_config() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, r#"{"menus": "not a list"}"#).expect("write");

        let args = Args {
            config: Some(path),
            theme: None,
            log_level: None,
            debug: true,
        };
        assert!(run_application(args).is_err());
    }

    #[test]
    fn test_run_application_debug_mode() {
        let temp_dir = TempDir::new().expect("create temp dir");
        let path = temp_dir.path().join("config.json");
        fs::write(
            &path,
            r#"{"history": false, "menus": [{ "title": "Status", "kind": "action", "command": "true" }]}"#,
        )
        .expect("write");

        let args = Args {
            config: Some(path),
            theme: Some("Nord".to_string()),
            log_level: Some("off".to_string()),
            debug: true,
        };
        assert!(run_application(args).is_ok());
    }
}
