//! Configuration loading and persistence

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{OrgtreeError, OrgtreeResult};

use super::types::Config;
use super::CONFIG_FILE;

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> OrgtreeResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| OrgtreeError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load from an explicit path, the project config, the user config, or
/// defaults, applying env overrides last.
pub fn load_or_default(explicit: Option<&Path>) -> OrgtreeResult<Config> {
    if let Some(path) = explicit {
        let (config, _) = load_with_warnings(path)?;
        return Ok(with_env_overrides(config));
    }

    let project_config = PathBuf::from(CONFIG_FILE);
    if project_config.exists() {
        let (config, _) = load_with_warnings(&project_config)?;
        return Ok(with_env_overrides(config));
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_config = config_dir.join("orgtree/config.toml");
        if user_config.exists() {
            let (config, _) = load_with_warnings(&user_config)?;
            return Ok(with_env_overrides(config));
        }
    }

    Ok(with_env_overrides(Config::default()))
}

/// Apply environment variable overrides (ORGTREE_* prefix)
pub fn with_env_overrides(mut config: Config) -> Config {
    if let Ok(name) = std::env::var("ORGTREE_SOURCE") {
        config.source.name = name;
    }
    if let Ok(field) = std::env::var("ORGTREE_ENTITY_FIELD") {
        config.source.entity_field = field;
    }
    if let Ok(field) = std::env::var("ORGTREE_PARENT_FIELD") {
        config.source.parent_field = field;
    }
    if let Ok(field) = std::env::var("ORGTREE_DISPLAY_FIELD") {
        config.source.display_field = if field.is_empty() { None } else { Some(field) };
    }
    config
}

/// Persist the config atomically: write a sibling temp file, then move it
/// into place.
pub fn save(config: &Config, path: &Path) -> OrgtreeResult<()> {
    let content = toml::to_string_pretty(config).map_err(|e| OrgtreeError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
    }

    let mut tmp = tempfile::NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "source",
        "name",
        "entity_field",
        "parent_field",
        "display_field",
        "ui",
        "unicode",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
