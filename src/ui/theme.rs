//! # Themes
//!
//! Color palettes for the menu. Rendering code never names a
//! `ratatui::style::Color` directly; it asks the active [`Theme`] for the role
//! it is drawing (breadcrumb, selected row, masked input, ...).
//!
//! The active theme comes from `config.json` or `--theme` and is looked up
//! case-insensitively with [`Theme::by_name`]. Unknown names fall back to the
//! default with a logged warning.

use ratatui::style::Color;

/// Colors used by the menu, grouped by what they paint.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    /// Panel and modal background.
    pub bg: Color,
    /// Item titles and detail bodies.
    pub text: Color,
    /// Descriptions, hints and the footer.
    pub muted: Color,
    /// Borders of the focused panel and the product name.
    pub border: Color,
    /// Breadcrumb segments, prompt labels and the spinner.
    pub highlight: Color,
    /// Background of the selected row.
    pub selected_bg: Color,
    /// Foreground of the selected row.
    pub selected_fg: Color,
    /// Error items and error detail headings.
    pub error: Color,
}

impl Theme {
    pub fn all() -> &'static [Theme] {
        &BUILT_IN_THEMES
    }

    /// Find a built-in theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        BUILT_IN_THEMES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn default_theme() -> &'static Theme {
        &BUILT_IN_THEMES[0]
    }

    /// Resolve a configured theme name, falling back to the default.
    pub fn resolve(name: &str) -> &'static Theme {
        Self::by_name(name).unwrap_or_else(|| {
            log::warn!(
                "Unknown theme '{}', using '{}'",
                name,
                Self::default_theme().name
            );
            Self::default_theme()
        })
    }
}

static BUILT_IN_THEMES: [Theme; 5] = [
    Theme {
        name: "Catppuccin Mocha",
        bg: Color::Rgb(30, 30, 46),             // base
        text: Color::Rgb(205, 214, 244),        // text
        muted: Color::Rgb(108, 112, 134),       // overlay0
        border: Color::Rgb(137, 180, 250),      // blue
        highlight: Color::Rgb(249, 226, 175),   // yellow
        selected_bg: Color::Rgb(137, 180, 250), // blue
        selected_fg: Color::Rgb(30, 30, 46),    // base
        error: Color::Rgb(243, 139, 168),       // red
    },
    Theme {
        name: "Catppuccin Latte",
        bg: Color::Rgb(239, 241, 245),          // base
        text: Color::Rgb(76, 79, 105),          // text
        muted: Color::Rgb(156, 160, 176),       // overlay0
        border: Color::Rgb(30, 102, 245),       // blue
        highlight: Color::Rgb(223, 142, 29),    // yellow
        selected_bg: Color::Rgb(30, 102, 245),  // blue
        selected_fg: Color::Rgb(239, 241, 245), // base
        error: Color::Rgb(210, 15, 57),         // red
    },
    Theme {
        name: "Dracula",
        bg: Color::Rgb(40, 42, 54),
        text: Color::Rgb(248, 248, 242),
        muted: Color::Rgb(98, 114, 164),
        border: Color::Rgb(139, 233, 253),
        highlight: Color::Rgb(241, 250, 140),
        selected_bg: Color::Rgb(68, 71, 90),
        selected_fg: Color::Rgb(80, 250, 123),
        error: Color::Rgb(255, 85, 85),
    },
    Theme {
        name: "Nord",
        bg: Color::Rgb(46, 52, 64),
        text: Color::Rgb(216, 222, 233),
        muted: Color::Rgb(76, 86, 106),
        border: Color::Rgb(136, 192, 208),
        highlight: Color::Rgb(235, 203, 139),
        selected_bg: Color::Rgb(67, 76, 94),
        selected_fg: Color::Rgb(136, 192, 208),
        error: Color::Rgb(191, 97, 106),
    },
    Theme {
        name: "Gruvbox Dark",
        bg: Color::Rgb(40, 40, 40),
        text: Color::Rgb(235, 219, 178),
        muted: Color::Rgb(146, 131, 116),
        border: Color::Rgb(131, 165, 152),
        highlight: Color::Rgb(250, 189, 47),
        selected_bg: Color::Rgb(80, 73, 69),
        selected_fg: Color::Rgb(184, 187, 38),
        error: Color::Rgb(251, 73, 52),
    },
];
