//! Design tokens for the orgtree CLI UI.
//!
//! Design constraints:
//! - Only 5 semantic colors (`colors::*`)
//! - All icons must be sourced from this module

use crossterm::style::Color;
use is_terminal::IsTerminal;

pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const ERROR: &str = "✗";
    pub const WARNING: &str = "⚠";

    // Checkbox tri-state.
    pub const CHECKED: &str = "●";
    pub const UNCHECKED: &str = "○";
    pub const INDETERMINATE: &str = "◐";

    // Tree expansion.
    pub const EXPANDED: &str = "▼";
    pub const COLLAPSED: &str = "▶";

    // Search prompt.
    pub const SEARCH: &str = "⌕";
}

pub mod icons_ascii {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[FAIL]";
    pub const WARNING: &str = "[WARN]";

    // Checkbox tri-state.
    pub const CHECKED: &str = "[x]";
    pub const UNCHECKED: &str = "[ ]";
    pub const INDETERMINATE: &str = "[-]";

    // Tree expansion.
    pub const EXPANDED: &str = "[v]";
    pub const COLLAPSED: &str = "[>]";

    // Search prompt.
    pub const SEARCH: &str = "/";
}

/// Whether stdout is an interactive terminal.
pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal()
}

/// Unicode support heuristic, overridable from config.
pub fn supports_unicode(override_value: Option<bool>) -> bool {
    if let Some(forced) = override_value {
        return forced;
    }
    if cfg!(windows) {
        return false;
    }
    std::env::var("LANG")
        .or_else(|_| std::env::var("LC_ALL"))
        .map(|value| value.to_uppercase().contains("UTF"))
        .unwrap_or(false)
}
