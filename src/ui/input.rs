//! Keyboard input handling and the interactive loop.
//!
//! Two modes: navigating the tree, and editing the search term. Search
//! edits filter live, keystroke by keystroke, and force-expand the
//! matched paths.

use std::io::{stdout, Write};

use crossterm::event::KeyEvent;

use crate::host::HostBridge;
use crate::session::FilterSession;

use super::tree::{
    flatten_visible, render_help_bar, render_search_bar, render_status_bar, render_tree_row,
    TreeRow,
};

/// Tree picker action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeAction {
    /// Move cursor up
    Up,
    /// Move cursor down
    Down,
    /// Toggle selection of the node under the cursor
    Toggle,
    /// Expand node
    Expand,
    /// Collapse node
    Collapse,
    /// Expand every node
    ExpandAll,
    /// Collapse every node
    CollapseAll,
    /// Select the whole forest
    SelectAll,
    /// Clear the selection
    SelectNone,
    /// Enter search mode
    BeginSearch,
    /// Apply the filter and leave
    Confirm,
    /// Leave without applying
    Quit,
}

/// Convert a keyboard event to a TreeAction (navigation mode).
pub fn key_to_action(key: KeyEvent) -> Option<TreeAction> {
    use crossterm::event::KeyCode;

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(TreeAction::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(TreeAction::Down),
        KeyCode::Char(' ') => Some(TreeAction::Toggle),
        KeyCode::Right | KeyCode::Char('l') => Some(TreeAction::Expand),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Backspace => Some(TreeAction::Collapse),
        KeyCode::Char('e') => Some(TreeAction::ExpandAll),
        KeyCode::Char('c') => Some(TreeAction::CollapseAll),
        KeyCode::Char('a') => Some(TreeAction::SelectAll),
        KeyCode::Char('n') => Some(TreeAction::SelectNone),
        KeyCode::Char('/') => Some(TreeAction::BeginSearch),
        KeyCode::Enter => Some(TreeAction::Confirm),
        KeyCode::Char('q') | KeyCode::Esc => Some(TreeAction::Quit),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Navigate,
    Search,
}

/// Run the tree picker interactively.
///
/// Returns the selected ids if confirmed, None if quit. The filter is
/// pushed to the host on every toggle, exactly as the embedded widget
/// does; Confirm just ends the loop.
pub fn run_interactive<H: HostBridge>(
    session: &mut FilterSession<H>,
    supports_unicode: bool,
) -> std::io::Result<Option<Vec<String>>> {
    use crossterm::{
        cursor,
        event::{self, Event, KeyCode, KeyEventKind},
        execute,
        terminal::{self, ClearType},
    };

    terminal::enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, cursor::Hide)?;

    let mut cursor_pos: usize = 0;
    let mut mode = Mode::Navigate;

    let result = loop {
        let rows = visible_rows(session);
        if cursor_pos >= rows.len() && !rows.is_empty() {
            cursor_pos = rows.len() - 1;
        }
        render_ui(
            &mut stdout,
            session,
            &rows,
            cursor_pos,
            mode,
            supports_unicode,
        )?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match mode {
            Mode::Search => match key.code {
                KeyCode::Esc => {
                    session.set_search("");
                    mode = Mode::Navigate;
                }
                KeyCode::Enter => {
                    mode = Mode::Navigate;
                }
                KeyCode::Backspace => {
                    let mut term = session.search_term().to_string();
                    term.pop();
                    session.set_search(&term);
                }
                KeyCode::Char(ch) => {
                    let mut term = session.search_term().to_string();
                    term.push(ch);
                    session.set_search(&term);
                }
                _ => {}
            },
            Mode::Navigate => {
                let Some(action) = key_to_action(key) else {
                    continue;
                };
                match action {
                    TreeAction::Up => cursor_pos = cursor_pos.saturating_sub(1),
                    TreeAction::Down => {
                        if cursor_pos + 1 < rows.len() {
                            cursor_pos += 1;
                        }
                    }
                    TreeAction::Toggle => {
                        if let Some(row) = rows.get(cursor_pos) {
                            session.toggle_node(&row.id).map_err(io_error)?;
                        }
                    }
                    TreeAction::Expand => {
                        if let Some(row) = rows.get(cursor_pos) {
                            if row.has_children && !row.expanded {
                                session.toggle_expand(&row.id);
                            }
                        }
                    }
                    TreeAction::Collapse => {
                        if let Some(row) = rows.get(cursor_pos) {
                            if row.expanded {
                                session.toggle_expand(&row.id);
                            }
                        }
                    }
                    TreeAction::ExpandAll => session.expand_all(),
                    TreeAction::CollapseAll => session.collapse_all(),
                    TreeAction::SelectAll => session.select_all().map_err(io_error)?,
                    TreeAction::SelectNone => session.clear_selection().map_err(io_error)?,
                    TreeAction::BeginSearch => mode = Mode::Search,
                    TreeAction::Confirm => break Some(session.selection().ids()),
                    TreeAction::Quit => break None,
                }
            }
        }
    };

    execute!(
        stdout,
        cursor::Show,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    terminal::disable_raw_mode()?;

    Ok(result)
}

fn visible_rows<H: HostBridge>(session: &mut FilterSession<H>) -> Vec<TreeRow> {
    let (forest, expansion, selection) = session.view();
    flatten_visible(forest, expansion, selection)
}

fn io_error(err: crate::error::OrgtreeError) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

fn render_ui<H: HostBridge>(
    stdout: &mut std::io::Stdout,
    session: &FilterSession<H>,
    rows: &[TreeRow],
    cursor_pos: usize,
    mode: Mode,
    supports_unicode: bool,
) -> std::io::Result<()> {
    use crossterm::{
        cursor,
        execute,
        terminal::{self, ClearType},
    };

    execute!(
        stdout,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    let width = terminal::size().map(|(w, _)| w as usize).ok();

    print!("Orgtree Pick · {}\r\n", session.config().name);
    print!(
        "{}\r\n\r\n",
        render_search_bar(
            session.search_term(),
            mode == Mode::Search,
            supports_unicode
        )
    );

    if rows.is_empty() {
        let message = if session.search_term().trim().is_empty() {
            "No data"
        } else {
            "No results"
        };
        print!("  {message}\r\n");
    } else {
        for (i, row) in rows.iter().enumerate() {
            let line = render_tree_row(row, i == cursor_pos, supports_unicode, width);
            print!("{line}\r\n");
        }
    }

    print!("───────────────────────────────────────────────────────────────\r\n");
    let total = crate::hierarchy::all_ids(session.forest()).len();
    let status = render_status_bar(
        session.selection().len(),
        total,
        session.search_term(),
        supports_unicode,
    );
    for line in status.lines() {
        print!("{line}\r\n");
    }
    print!("\r\n");
    for line in render_help_bar().lines() {
        print!("{line}\r\n");
    }

    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn key_to_action_arrow_keys() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)),
            Some(TreeAction::Up)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE)),
            Some(TreeAction::Down)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Left, KeyModifiers::NONE)),
            Some(TreeAction::Collapse)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Right, KeyModifiers::NONE)),
            Some(TreeAction::Expand)
        );
    }

    #[test]
    fn key_to_action_vim_keys() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE)),
            Some(TreeAction::Up)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(TreeAction::Down)
        );
    }

    #[test]
    fn key_to_action_bulk_shortcuts() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE)),
            Some(TreeAction::SelectAll)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::NONE)),
            Some(TreeAction::SelectNone)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE)),
            Some(TreeAction::ExpandAll)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(TreeAction::CollapseAll)
        );
    }

    #[test]
    fn key_to_action_search_and_exit() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::NONE)),
            Some(TreeAction::BeginSearch)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)),
            Some(TreeAction::Confirm)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(TreeAction::Quit)
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)),
            Some(TreeAction::Quit)
        );
    }

    #[test]
    fn key_to_action_unknown_key() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::NONE)),
            None
        );
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::F(1), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn key_to_action_space_toggle() {
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(TreeAction::Toggle)
        );
    }
}
