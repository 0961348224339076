//! Filter session: wires config, host, and the hierarchy models together.
//!
//! Owns the last-known-good forest plus the selection/expansion sets and
//! the active search term. Every operation runs to completion on the
//! caller's thread; the only fallible calls are the host's, and a failed
//! fetch leaves the previous forest and selection untouched.

use chrono::{DateTime, Utc};

use crate::config::SourceConfig;
use crate::error::OrgtreeResult;
use crate::hierarchy::{
    build_forest, find_by_id, search, Expansion, Forest, Selection,
};
use crate::host::HostBridge;

/// What a refresh produced.
#[derive(Debug, Clone)]
pub struct RefreshSummary {
    /// Raw rows fetched from the host
    pub row_count: usize,
    /// Distinct nodes in the rebuilt forest
    pub node_count: usize,
    /// Top-level roots
    pub root_count: usize,
    /// Forest version after the rebuild
    pub version: u64,
    pub refreshed_at: DateTime<Utc>,
}

/// Session state over one configured source.
pub struct FilterSession<H: HostBridge> {
    host: H,
    config: SourceConfig,
    forest: Forest,
    /// Bumped per rebuild; identity check for anything derived from an
    /// older forest, and the memo key for the filtered view
    version: u64,
    selection: Selection,
    expansion: Expansion,
    term: String,
    filtered: Option<(u64, String, Forest)>,
    last_refresh: Option<DateTime<Utc>>,
}

impl<H: HostBridge> FilterSession<H> {
    /// Create a session. The config is validated up front: a build is
    /// never attempted with unresolved required fields.
    pub fn new(host: H, config: SourceConfig) -> OrgtreeResult<Self> {
        config.validate()?;
        Ok(Self {
            host,
            config,
            forest: Vec::new(),
            version: 0,
            selection: Selection::new(),
            expansion: Expansion::new(),
            term: String::new(),
            filtered: None,
            last_refresh: None,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &SourceConfig {
        &self.config
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn expansion(&self) -> &Expansion {
        &self.expansion
    }

    pub fn search_term(&self) -> &str {
        &self.term
    }

    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Fetch rows and rebuild the forest. Selection and expansion carry
    /// over by id; ids that vanished stay inert. On error the previous
    /// state is fully retained.
    pub fn refresh(&mut self) -> OrgtreeResult<RefreshSummary> {
        let table = self.host.fetch_table(&self.config.name)?;
        let rows = table.extract_rows(
            &self.config.entity_field,
            &self.config.parent_field,
            self.config.display_field(),
        )?;

        self.forest = build_forest(&rows);
        self.version += 1;
        self.filtered = None;
        self.last_refresh = Some(Utc::now());

        // An active search keeps its matched paths visible through the
        // rebuild.
        if !self.term.trim().is_empty() {
            self.expansion = Expansion::sync_to_search(self.visible_forest());
        }

        Ok(RefreshSummary {
            row_count: rows.len(),
            node_count: crate::hierarchy::all_ids(&self.forest).len(),
            root_count: self.forest.len(),
            version: self.version,
            refreshed_at: self.last_refresh.unwrap_or_else(Utc::now),
        })
    }

    /// The forest as currently displayed: search-pruned when a term is
    /// active, the full forest otherwise. Pruning is memoized per
    /// (version, term), so repeated reads are free.
    pub fn visible_forest(&mut self) -> &Forest {
        self.ensure_filtered();
        self.visible_ref()
    }

    /// Visible forest plus the two display sets, borrowed together for
    /// the renderer.
    pub fn view(&mut self) -> (&Forest, &Expansion, &Selection) {
        self.ensure_filtered();
        (self.visible_ref(), &self.expansion, &self.selection)
    }

    fn ensure_filtered(&mut self) {
        let term = self.term.trim().to_lowercase();
        if term.is_empty() {
            return;
        }
        let fresh = matches!(&self.filtered, Some((v, t, _)) if *v == self.version && *t == term);
        if !fresh {
            let pruned = search(&self.forest, &term);
            self.filtered = Some((self.version, term, pruned));
        }
    }

    fn visible_ref(&self) -> &Forest {
        if self.term.trim().is_empty() {
            return &self.forest;
        }
        match &self.filtered {
            Some((_, _, forest)) => forest,
            None => &self.forest,
        }
    }

    /// Update the search term. Entering or changing a non-empty term
    /// force-expands every matched path; clearing it collapses nothing.
    pub fn set_search(&mut self, term: &str) {
        if self.term == term {
            return;
        }
        self.term = term.to_string();
        if !term.trim().is_empty() {
            self.expansion = Expansion::sync_to_search(self.visible_forest());
        }
    }

    pub fn toggle_expand(&mut self, id: &str) {
        self.expansion = self.expansion.toggle(id);
    }

    pub fn expand_all(&mut self) {
        self.expansion = Expansion::expand_all(&self.forest);
    }

    pub fn collapse_all(&mut self) {
        self.expansion = Expansion::collapse_all();
    }

    /// Cascade-toggle the node as displayed (under an active search the
    /// cascade covers the pruned subtree, which is what the user sees)
    /// and push the new selection to the host. Returns false when the id
    /// is not currently visible.
    pub fn toggle_node(&mut self, id: &str) -> OrgtreeResult<bool> {
        let node = match find_by_id(self.visible_forest(), id) {
            Some(node) => node.clone(),
            None => return Ok(false),
        };
        let target = self.selection.toggle_target(&node);
        self.selection = self.selection.toggle(&node, target);
        self.push_filter()?;
        Ok(true)
    }

    pub fn select_all(&mut self) -> OrgtreeResult<()> {
        self.selection = Selection::select_all(&self.forest);
        self.push_filter()
    }

    pub fn clear_selection(&mut self) -> OrgtreeResult<()> {
        self.selection = Selection::clear();
        self.push_filter()
    }

    /// Replace the selection wholesale (non-interactive `apply` path).
    pub fn set_selection(&mut self, selection: Selection) -> OrgtreeResult<()> {
        self.selection = selection;
        self.push_filter()
    }

    /// Re-push the current selection, e.g. after a host-driven rebuild.
    pub fn reapply_filter(&mut self) -> OrgtreeResult<()> {
        self.push_filter()
    }

    /// Hand the flattened id set to the filter sink; an empty set clears
    /// the filter. The selection itself is already updated - a failed
    /// push is retryable without losing the user's intent.
    fn push_filter(&mut self) -> OrgtreeResult<()> {
        if self.selection.is_empty() {
            self.host.clear_filter(&self.config.entity_field)
        } else {
            let ids = self.selection.ids();
            self.host.apply_filter(&self.config.entity_field, &ids)
        }
    }
}
