//! Orgtree CLI - hierarchical multi-select filter for dashboard data
//!
//! Usage: orgtree <COMMAND>
//!
//! Commands:
//!   show    Print the hierarchy (optionally searched/preselected)
//!   pick    Interactively select subtrees and apply the filter
//!   apply   Apply a filter non-interactively from given ids
//!   check   Validate the configuration against the data source
//!   init    Create a starter config file
//!   watch   Rebuild continuously while the data file changes

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use orgtree::config::{self, Config, SourceConfig};
use orgtree::hierarchy::{all_ids, find_by_id, Expansion, Selection, Toggle, TriState};
use orgtree::host::{DemoHost, HostBridge, JsonFileHost, DEMO_SOURCE};
use orgtree::session::FilterSession;
use orgtree::ui::theme::{self, icons, icons_ascii};
use orgtree::ui::tree::{flatten_visible, render_tree_row};

/// Orgtree - hierarchical multi-select filter for dashboard data sources
#[derive(Parser, Debug)]
#[command(name = "orgtree")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output NDJSON events for CI
    #[arg(long, default_value = "false")]
    json: bool,

    /// Path to a config file (defaults to ./orgtree.toml, then the user
    /// config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the hierarchy
    Show {
        /// JSON data file with named sources (demo data when omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Search term; prunes the tree to matches and their ancestors
        #[arg(short, long)]
        search: Option<String>,

        /// Preselect these ids (with cascade) before printing
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,
    },

    /// Interactively select subtrees and apply the filter
    Pick {
        /// JSON data file with named sources (demo data when omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Apply a filter non-interactively
    Apply {
        /// JSON data file with named sources (demo data when omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Ids to select; each cascades over its subtree
        #[arg(long, value_delimiter = ',')]
        select: Vec<String>,

        /// Clear the filter instead of applying one
        #[arg(long)]
        clear: bool,
    },

    /// Validate the configuration against the data source
    Check {
        /// JSON data file with named sources (demo data when omitted)
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Create a starter config file
    Init {
        /// Where to write the config
        #[arg(long, default_value = config::CONFIG_FILE)]
        path: PathBuf,

        /// Prompt for source and fields against a data file
        #[arg(long)]
        wizard: bool,

        /// JSON data file the wizard reads the schema from
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Rebuild continuously while the data file changes
    Watch {
        /// JSON data file with named sources
        #[arg(short, long)]
        data: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Show {
            data,
            search,
            select,
        } => cmd_show(&config, data, search, select, cli.json),
        Commands::Pick { data } => cmd_pick(&config, data, cli.json),
        Commands::Apply {
            data,
            select,
            clear,
        } => cmd_apply(&config, data, select, clear, cli.json),
        Commands::Check { data } => cmd_check(&config, data, cli.json),
        Commands::Init {
            path,
            wizard,
            data,
            force,
        } => cmd_init(path, wizard, data, force, cli.json),
        Commands::Watch { data } => cmd_watch(&config, data, cli.json),
    }
}

/// Demo mode runs against the built-in dataset with its own field names,
/// like the original does outside a dashboard.
fn demo_source_config() -> SourceConfig {
    SourceConfig {
        name: DEMO_SOURCE.to_string(),
        entity_field: "usuario".to_string(),
        parent_field: "lider".to_string(),
        display_field: None,
    }
}

fn source_config(config: &Config, data: &Option<PathBuf>) -> SourceConfig {
    if data.is_some() {
        config.source.clone()
    } else {
        demo_source_config()
    }
}

fn cmd_show(
    config: &Config,
    data: Option<PathBuf>,
    search: Option<String>,
    select: Vec<String>,
    json: bool,
) -> Result<()> {
    let source = source_config(config, &data);
    match data {
        Some(path) => {
            let host = JsonFileHost::from_path(&path)?;
            show_with(host, source, config, search, select, json)
        }
        None => show_with(DemoHost::new(), source, config, search, select, json),
    }
}

fn show_with<H: HostBridge>(
    host: H,
    source: SourceConfig,
    config: &Config,
    search: Option<String>,
    select: Vec<String>,
    json: bool,
) -> Result<()> {
    let mut session = FilterSession::new(host, source)?;
    session.refresh()?;

    if !select.is_empty() {
        let mut selection = Selection::new();
        for id in &select {
            match find_by_id(session.forest(), id) {
                Some(node) => selection = selection.toggle(node, Toggle::Select),
                None => eprintln!("warning: id '{id}' not found, ignored"),
            }
        }
        session.set_selection(selection)?;
    }
    if let Some(term) = search {
        session.set_search(&term);
    }

    let (forest, _, selection) = session.view();
    let expansion = Expansion::expand_all(forest);
    let rows = flatten_visible(forest, &expansion, selection);

    if json {
        for row in &rows {
            let state = match row.state {
                TriState::Checked => "checked",
                TriState::Unchecked => "unchecked",
                TriState::Indeterminate => "indeterminate",
            };
            let event = serde_json::json!({
                "event": "node",
                "id": row.id,
                "label": row.label,
                "depth": row.depth,
                "state": state,
                "children": row.child_count,
            });
            println!("{}", serde_json::to_string(&event)?);
        }
        return Ok(());
    }

    let unicode = theme::supports_unicode(config.ui.unicode);
    if rows.is_empty() {
        let term = session.search_term();
        if term.trim().is_empty() {
            println!("No data");
        } else {
            println!("No results for \"{term}\"");
        }
        return Ok(());
    }
    for row in &rows {
        // Non-interactive: drop the cursor column.
        let line = render_tree_row(row, false, unicode, None);
        println!("{}", line.strip_prefix("  ").unwrap_or(&line));
    }
    let total = all_ids(session.forest()).len();
    println!();
    println!("{} of {} selected", session.selection().len(), total);
    Ok(())
}

fn cmd_pick(config: &Config, data: Option<PathBuf>, json: bool) -> Result<()> {
    if !theme::is_interactive() {
        bail!("pick needs an interactive terminal; use 'apply' in scripts");
    }

    let source = source_config(config, &data);
    let unicode = theme::supports_unicode(config.ui.unicode);
    match data {
        Some(path) => {
            let host = JsonFileHost::from_path(&path)?;
            pick_with(host, source, unicode, json)
        }
        None => pick_with(DemoHost::new(), source, unicode, json),
    }
}

fn pick_with<H: HostBridge>(
    host: H,
    source: SourceConfig,
    unicode: bool,
    json: bool,
) -> Result<()> {
    let mut session = FilterSession::new(host, source)?;
    session.refresh()?;

    let field = session.config().entity_field.clone();
    let picked = orgtree::ui::run_interactive(&mut session, unicode)?;

    match picked {
        Some(values) => {
            if json {
                let event = serde_json::json!({
                    "event": "filter",
                    "field": field,
                    "values": values,
                });
                println!("{}", serde_json::to_string(&event)?);
            } else if values.is_empty() {
                println!("Filter cleared");
            } else {
                println!("Filter applied: {} = {}", field, values.join(", "));
            }
        }
        None => {
            if json {
                println!("{}", serde_json::json!({"event": "aborted"}));
            } else {
                println!("Aborted, filter unchanged");
            }
        }
    }
    Ok(())
}

fn cmd_apply(
    config: &Config,
    data: Option<PathBuf>,
    select: Vec<String>,
    clear: bool,
    json: bool,
) -> Result<()> {
    if !clear && select.is_empty() {
        bail!("apply needs --select <ids> or --clear");
    }

    let source = source_config(config, &data);
    match data {
        Some(path) => {
            let host = JsonFileHost::from_path(&path)?;
            apply_with(host, source, select, clear, json)
        }
        None => apply_with(DemoHost::new(), source, select, clear, json),
    }
}

fn apply_with<H: HostBridge>(
    host: H,
    source: SourceConfig,
    select: Vec<String>,
    clear: bool,
    json: bool,
) -> Result<()> {
    let mut session = FilterSession::new(host, source)?;
    session.refresh()?;

    let mut selection = Selection::new();
    if !clear {
        for id in &select {
            match find_by_id(session.forest(), id) {
                Some(node) => selection = selection.toggle(node, Toggle::Select),
                None => bail!("id '{id}' not found in source '{}'", session.config().name),
            }
        }
    }
    session.set_selection(selection)?;

    let field = &session.config().entity_field;
    let values = session.selection().ids();
    if json {
        let event = serde_json::json!({
            "event": "filter",
            "field": field,
            "values": values,
        });
        println!("{}", serde_json::to_string(&event)?);
    } else if values.is_empty() {
        println!("Filter cleared");
    } else {
        println!("Filter applied: {} = {}", field, values.join(", "));
    }
    Ok(())
}

fn cmd_check(config: &Config, data: Option<PathBuf>, json: bool) -> Result<()> {
    let source = source_config(config, &data);

    let mut checks: Vec<(String, Result<(), String>)> = Vec::new();

    let config_check = source.validate().map_err(|e| e.to_string());
    checks.push(("config fields".to_string(), config_check.clone()));

    if config_check.is_ok() {
        let table = match data {
            Some(path) => {
                let host = JsonFileHost::from_path(&path)?;
                host.fetch_table(&source.name)
            }
            None => DemoHost::new().fetch_table(&source.name),
        };

        match table {
            Ok(table) => {
                checks.push((format!("source '{}'", source.name), Ok(())));
                let mut fields = vec![
                    ("entity_field", source.entity_field.as_str()),
                    ("parent_field", source.parent_field.as_str()),
                ];
                if let Some(display) = source.display_field() {
                    fields.push(("display_field", display));
                }
                for (name, field) in fields {
                    let found = table.column_index(field).is_some();
                    checks.push((
                        format!("{name} '{field}'"),
                        if found {
                            Ok(())
                        } else {
                            Err(format!("not a column of '{}'", source.name))
                        },
                    ));
                }
            }
            Err(e) => checks.push((format!("source '{}'", source.name), Err(e.to_string()))),
        }
    }

    let errors = checks.iter().filter(|(_, r)| r.is_err()).count();

    if json {
        for (name, result) in &checks {
            let event = serde_json::json!({
                "event": "check",
                "name": name,
                "ok": result.is_ok(),
                "message": result.as_ref().err(),
            });
            println!("{}", serde_json::to_string(&event)?);
        }
    } else {
        let unicode = theme::supports_unicode(config.ui.unicode);
        let (ok_icon, err_icon) = if unicode {
            (icons::SUCCESS, icons::ERROR)
        } else {
            (icons_ascii::SUCCESS, icons_ascii::ERROR)
        };
        for (name, result) in &checks {
            match result {
                Ok(()) => println!("{ok_icon} {name}"),
                Err(message) => println!("{err_icon} {name} - {message}"),
            }
        }
        println!();
        println!(
            "Summary: {} passed, {} errors",
            checks.len() - errors,
            errors
        );
    }

    if errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_init(
    path: PathBuf,
    wizard: bool,
    data: Option<PathBuf>,
    force: bool,
    json: bool,
) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let source = if wizard {
        let data =
            data.ok_or_else(|| anyhow::anyhow!("--wizard needs --data to read the schema from"))?;
        let host = JsonFileHost::from_path(&data)?;
        wizard_source(&host)?
    } else {
        SourceConfig {
            name: "Staff".to_string(),
            entity_field: "usuario".to_string(),
            parent_field: "lider".to_string(),
            display_field: None,
        }
    };

    let config = Config {
        source,
        ..Default::default()
    };
    config::save(&config, &path).context("writing config")?;

    if json {
        let event = serde_json::json!({
            "event": "init",
            "path": path.display().to_string(),
            "source": config.source.name,
        });
        println!("{}", serde_json::to_string(&event)?);
    } else {
        println!("Wrote {}", path.display());
        if !wizard {
            println!("Edit the [source] section to match your data, then run 'orgtree check'.");
        }
    }
    Ok(())
}

fn wizard_source(host: &JsonFileHost) -> Result<SourceConfig> {
    use dialoguer::FuzzySelect;

    let sources = host.list_sources();
    if sources.is_empty() {
        bail!("the data file contains no sources");
    }
    let source_idx = FuzzySelect::new()
        .with_prompt("Source")
        .items(&sources)
        .default(0)
        .interact()?;
    let name = sources[source_idx].clone();

    let table = host.fetch_table(&name)?;
    if table.columns.is_empty() {
        bail!("source '{name}' has no columns");
    }

    let entity_idx = FuzzySelect::new()
        .with_prompt("Entity field (unique id)")
        .items(&table.columns)
        .default(0)
        .interact()?;
    let parent_idx = FuzzySelect::new()
        .with_prompt("Parent field (leader id)")
        .items(&table.columns)
        .default(0)
        .interact()?;

    let mut display_items = vec!["(use entity id)".to_string()];
    display_items.extend(table.columns.iter().cloned());
    let display_idx = FuzzySelect::new()
        .with_prompt("Display field")
        .items(&display_items)
        .default(0)
        .interact()?;

    Ok(SourceConfig {
        name,
        entity_field: table.columns[entity_idx].clone(),
        parent_field: table.columns[parent_idx].clone(),
        display_field: if display_idx == 0 {
            None
        } else {
            Some(table.columns[display_idx - 1].clone())
        },
    })
}

fn cmd_watch(config: &Config, data: PathBuf, json: bool) -> Result<()> {
    use orgtree::watch::{watch, WatchEvent, WatchOptions};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    let options = WatchOptions {
        data_path: data.clone(),
        source: config.source.clone(),
        json,
    };

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .context("setting Ctrl+C handler")?;

    if !json {
        println!("Orgtree Watch");
        println!("Data: {}", data.display());
        println!("Press Ctrl+C to stop\n");
    }

    watch(options, running, |event| {
        if json {
            println!("{}", event.to_json());
        } else {
            match event {
                WatchEvent::WatchStarted { path, source } => {
                    println!("Watching {path} (source '{source}')");
                }
                WatchEvent::DataChanged { path } => {
                    println!("Changed: {path}");
                }
                WatchEvent::RefreshComplete {
                    rows,
                    nodes,
                    roots,
                    version,
                } => {
                    println!("Rebuilt v{version}: {rows} rows, {nodes} nodes, {roots} roots");
                }
                WatchEvent::FilterReapplied { values } => {
                    println!("Filter re-applied ({values} ids)");
                }
                WatchEvent::Error { message } => {
                    eprintln!("Error: {message}");
                }
                WatchEvent::Shutdown => {
                    println!("\nShutting down...");
                }
            }
        }
    })?;

    Ok(())
}
