//! Continuous rebuild on data changes
//!
//! The original runs embedded in a dashboard and rebuilds when the host
//! raises a filter-changed event; here the data file plays the host and
//! the file watcher is the notification channel. Implements the `watch`
//! command with:
//! - Debouncing (100ms)
//! - Content-hash gating (editor save noise produces no rebuild)
//! - Graceful Ctrl+C shutdown
//! - NDJSON output for CI

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use sha2::{Digest, Sha256};

use crate::config::SourceConfig;
use crate::error::{OrgtreeError, OrgtreeResult};
use crate::host::JsonFileHost;
use crate::session::FilterSession;

/// Debounce duration in milliseconds
pub const DEBOUNCE_MS: u64 = 100;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Data file serving as the host
    pub data_path: PathBuf,
    /// Source and field configuration
    pub source: SourceConfig,
    /// Output as NDJSON
    pub json: bool,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    WatchStarted {
        path: String,
        source: String,
    },
    DataChanged {
        path: String,
    },
    RefreshComplete {
        rows: usize,
        nodes: usize,
        roots: usize,
        version: u64,
    },
    FilterReapplied {
        values: usize,
    },
    Error {
        message: String,
    },
    Shutdown,
}

impl WatchEvent {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Watcher state for debouncing
pub(crate) struct WatcherState {
    pending: bool,
    last_change: Option<Instant>,
}

impl WatcherState {
    pub(crate) fn new() -> Self {
        Self {
            pending: false,
            last_change: None,
        }
    }

    pub(crate) fn mark_change(&mut self) {
        self.pending = true;
        self.last_change = Some(Instant::now());
    }

    pub(crate) fn should_refresh(&self) -> bool {
        match self.last_change {
            Some(last) => self.pending && last.elapsed() >= Duration::from_millis(DEBOUNCE_MS),
            None => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.pending = false;
        self.last_change = None;
    }
}

pub(crate) fn compute_content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Watch the data file and rebuild on every real content change.
///
/// Selection and expansion persist across rebuilds by id; after each
/// rebuild the current filter is pushed again so the host stays in sync.
/// Refresh failures are reported and retried on the next change - the
/// last-known-good forest stays live in between.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> OrgtreeResult<()> {
    let host = JsonFileHost::from_path(&options.data_path)?;
    let mut session = FilterSession::new(host, options.source.clone())?;

    event_callback(WatchEvent::WatchStarted {
        path: options.data_path.display().to_string(),
        source: options.source.name.clone(),
    });

    do_refresh(&mut session, &event_callback);

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                for path in event.paths {
                    let _ = tx.send(path);
                }
            }
        },
        Config::default(),
    )
    .map_err(watch_error)?;

    watcher
        .watch(&options.data_path, RecursiveMode::NonRecursive)
        .map_err(watch_error)?;

    let mut state = WatcherState::new();
    let mut last_hash = std::fs::read_to_string(&options.data_path)
        .ok()
        .map(|content| compute_content_hash(&content));

    while running.load(Ordering::SeqCst) {
        if rx.recv_timeout(Duration::from_millis(50)).is_ok() {
            // Only real content changes count; editors and sync tools
            // touch files without changing them.
            if let Ok(content) = std::fs::read_to_string(&options.data_path) {
                let hash = compute_content_hash(&content);
                if last_hash.as_deref() != Some(hash.as_str()) {
                    last_hash = Some(hash);
                    state.mark_change();
                }
            }
        }

        if state.should_refresh() {
            state.reset();
            event_callback(WatchEvent::DataChanged {
                path: options.data_path.display().to_string(),
            });
            if let Err(e) = session.host_mut().reload() {
                event_callback(WatchEvent::Error {
                    message: e.to_string(),
                });
                continue;
            }
            do_refresh(&mut session, &event_callback);
        }
    }

    event_callback(WatchEvent::Shutdown);
    Ok(())
}

fn do_refresh(session: &mut FilterSession<JsonFileHost>, callback: &impl Fn(WatchEvent)) {
    match session.refresh() {
        Ok(summary) => {
            callback(WatchEvent::RefreshComplete {
                rows: summary.row_count,
                nodes: summary.node_count,
                roots: summary.root_count,
                version: summary.version,
            });
            if !session.selection().is_empty() {
                match session.reapply_filter() {
                    Ok(()) => callback(WatchEvent::FilterReapplied {
                        values: session.selection().len(),
                    }),
                    Err(e) => callback(WatchEvent::Error {
                        message: e.to_string(),
                    }),
                }
            }
        }
        Err(e) => callback(WatchEvent::Error {
            message: e.to_string(),
        }),
    }
}

fn watch_error(err: notify::Error) -> OrgtreeError {
    OrgtreeError::Io(std::io::Error::other(err.to_string()))
}
