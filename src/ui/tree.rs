//! Tree flattening and line rendering.
//!
//! The renderer never touches the forest directly: it works from
//! [`TreeRow`]s, a flattened view of whatever is currently visible given
//! the expansion set, with the tri-state already resolved per row.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::hierarchy::{Expansion, Node, Selection, TriState};

use super::theme::{icons, icons_ascii};

/// A visible node, flattened for rendering.
#[derive(Debug, Clone)]
pub struct TreeRow {
    pub id: String,
    /// Depth level (0 = root)
    pub depth: usize,
    pub label: String,
    pub state: TriState,
    pub expanded: bool,
    pub has_children: bool,
    /// Direct children, shown as a badge next to the label
    pub child_count: usize,
}

/// Flatten the forest to the rows currently visible: roots always,
/// children only under expanded nodes.
pub fn flatten_visible(
    forest: &[Node],
    expansion: &Expansion,
    selection: &Selection,
) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for node in forest {
        flatten_node(node, 0, expansion, selection, &mut rows);
    }
    rows
}

fn flatten_node(
    node: &Node,
    depth: usize,
    expansion: &Expansion,
    selection: &Selection,
    rows: &mut Vec<TreeRow>,
) {
    let expanded = expansion.is_expanded(&node.id);
    rows.push(TreeRow {
        id: node.id.clone(),
        depth,
        label: node.display_label.clone(),
        state: selection.tri_state(node),
        expanded,
        has_children: !node.children.is_empty(),
        child_count: node.children.len(),
    });

    if expanded {
        for child in &node.children {
            flatten_node(child, depth + 1, expansion, selection, rows);
        }
    }
}

/// Render a single tree row to a string.
pub fn render_tree_row(
    row: &TreeRow,
    is_active: bool,
    supports_unicode: bool,
    max_width: Option<usize>,
) -> String {
    let cursor = if is_active { "> " } else { "  " };
    let indent = "  ".repeat(row.depth);

    let state_icon = match (row.state, supports_unicode) {
        (TriState::Checked, true) => icons::CHECKED,
        (TriState::Checked, false) => icons_ascii::CHECKED,
        (TriState::Unchecked, true) => icons::UNCHECKED,
        (TriState::Unchecked, false) => icons_ascii::UNCHECKED,
        (TriState::Indeterminate, true) => icons::INDETERMINATE,
        (TriState::Indeterminate, false) => icons_ascii::INDETERMINATE,
    };

    let expand_icon = if row.has_children {
        let icon = match (row.expanded, supports_unicode) {
            (true, true) => icons::EXPANDED,
            (true, false) => icons_ascii::EXPANDED,
            (false, true) => icons::COLLAPSED,
            (false, false) => icons_ascii::COLLAPSED,
        };
        format!("{icon} ")
    } else {
        String::from("  ")
    };

    let badge = if row.has_children {
        format!(" ({})", row.child_count)
    } else {
        String::new()
    };

    let line = format!(
        "{}{}{}{} {}{}",
        cursor, indent, expand_icon, state_icon, row.label, badge
    );
    match max_width {
        Some(width) => truncate_to_width(&line, width),
        None => line,
    }
}

/// Render the status bar showing selection counts and the active search.
pub fn render_status_bar(
    selected: usize,
    total: usize,
    term: &str,
    supports_unicode: bool,
) -> String {
    let (checked, indeterminate, unchecked) = if supports_unicode {
        (icons::CHECKED, icons::INDETERMINATE, icons::UNCHECKED)
    } else {
        (
            icons_ascii::CHECKED,
            icons_ascii::INDETERMINATE,
            icons_ascii::UNCHECKED,
        )
    };

    let filter_line = if term.trim().is_empty() {
        String::from("No filter applied")
    } else {
        format!("Filtering: \"{term}\"")
    };

    format!(
        "Selected: {}/{} users · {}\n\n{} = selected    {} = partial    {} = not selected",
        selected, total, filter_line, checked, indeterminate, unchecked
    )
}

/// Render the search input line.
pub fn render_search_bar(term: &str, editing: bool, supports_unicode: bool) -> String {
    let prompt = if supports_unicode {
        icons::SEARCH
    } else {
        icons_ascii::SEARCH
    };
    let caret = if editing { "_" } else { "" };
    format!("{prompt} {term}{caret}")
}

/// Render the help bar showing keyboard shortcuts.
pub fn render_help_bar() -> String {
    String::from(
        "[/] Search    [a] All    [n] None    [e] Expand    [c] Collapse    [Enter] Apply    [q] Quit\n\
         (Use ↑↓ to navigate, Space to toggle, →← to expand/collapse)",
    )
}

/// Truncate a line to a display width, appending an ellipsis when cut.
fn truncate_to_width(line: &str, max_width: usize) -> String {
    if line.width() <= max_width {
        return line.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max_width.saturating_sub(1) {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::{build_forest, Toggle};
    use crate::models::Row;

    fn row(entity: &str, parent: Option<&str>) -> Row {
        Row {
            entity_id: entity.to_string(),
            parent_id: parent.map(|p| p.to_string()),
            display_label: None,
        }
    }

    fn demo_forest() -> Vec<Node> {
        build_forest(&[
            row("Carlos", None),
            row("Ana", Some("Carlos")),
            row("María", Some("Carlos")),
            row("Juan", Some("María")),
        ])
    }

    #[test]
    fn collapsed_roots_flatten_to_one_row_each() {
        let forest = demo_forest();
        let rows = flatten_visible(&forest, &Expansion::new(), &Selection::new());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "Carlos");
        assert!(rows[0].has_children);
        assert_eq!(rows[0].child_count, 2);
    }

    #[test]
    fn expansion_reveals_children_in_tree_order() {
        let forest = demo_forest();
        let expansion = Expansion::new().toggle("Carlos").toggle("María");
        let rows = flatten_visible(&forest, &expansion, &Selection::new());

        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["Carlos", "Ana", "María", "Juan"]);
        assert_eq!(rows[1].depth, 1);
        assert_eq!(rows[3].depth, 2);
    }

    #[test]
    fn rows_carry_tri_state() {
        let forest = demo_forest();
        let maria = crate::hierarchy::find_by_id(&forest, "María").unwrap();
        let selection = Selection::new().toggle(maria, Toggle::Select);
        let expansion = Expansion::expand_all(&forest);

        let rows = flatten_visible(&forest, &expansion, &selection);
        let by_id = |id: &str| rows.iter().find(|r| r.id == id).unwrap();

        assert_eq!(by_id("Carlos").state, TriState::Indeterminate);
        assert_eq!(by_id("María").state, TriState::Checked);
        assert_eq!(by_id("Juan").state, TriState::Checked);
        assert_eq!(by_id("Ana").state, TriState::Unchecked);
    }

    #[test]
    fn render_collapsed_unselected_root() {
        let forest = demo_forest();
        let rows = flatten_visible(&forest, &Expansion::new(), &Selection::new());

        let line = render_tree_row(&rows[0], true, true, None);
        insta::assert_snapshot!(line, @"> ▶ ○ Carlos (2)");
    }

    #[test]
    fn render_ascii_fallback() {
        let forest = demo_forest();
        let expansion = Expansion::new().toggle("Carlos");
        let selection = Selection::select_all(&forest);
        let rows = flatten_visible(&forest, &expansion, &selection);

        let root = render_tree_row(&rows[0], false, false, None);
        assert!(root.contains("[v]"));
        assert!(root.contains("[x]"));

        // Two columns each for cursor, indent, and the leaf's blank
        // expansion slot.
        let leaf = render_tree_row(&rows[1], false, false, None);
        assert_eq!(leaf, "      [x] Ana");
    }

    #[test]
    fn render_truncates_long_labels() {
        let row = TreeRow {
            id: "u1".to_string(),
            depth: 0,
            label: "a-very-long-display-label-that-will-not-fit".to_string(),
            state: TriState::Unchecked,
            expanded: false,
            has_children: false,
            child_count: 0,
        };

        let line = render_tree_row(&row, false, true, Some(20));
        assert!(line.width() <= 20);
        assert!(line.ends_with('…'));
    }

    #[test]
    fn status_bar_shows_counts_and_filter() {
        let status = render_status_bar(3, 15, "", true);
        assert!(status.contains("3/15"));
        assert!(status.contains("No filter applied"));

        let status = render_status_bar(0, 15, "juan", false);
        assert!(status.contains("Filtering: \"juan\""));
        assert!(status.contains("[x]"));
    }

    #[test]
    fn help_bar_shows_shortcuts() {
        let help = render_help_bar();
        assert!(help.contains("[/] Search"));
        assert!(help.contains("[a] All"));
        assert!(help.contains("[Enter] Apply"));
    }
}
