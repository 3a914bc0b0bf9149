//! Command-line interface for `datagrid`.
//!
//! # Examples
//!
//! ```bash
//! # Render the first page of a dataset with inferred columns
//! datagrid render --data users.json
//!
//! # Use a config, filter, sort and pick a page
//! datagrid render --data users.json --config table.json \
//!     --filter status=Active --sort name:desc --page 2 -o page.html
//!
//! # Validate a config
//! datagrid check --config table.json
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use datagrid::column::Column;
use datagrid::config::TableConfig;
use datagrid::host::MemoryHost;
use datagrid::record::{Record, records_from_json};
use datagrid::render::escape_html;
use datagrid::table::{DataTable, TableOptions};

/// Container id used when the config does not name one.
const DEFAULT_CONTAINER_ID: &str = "datagrid";

/// Render JSON datasets as paginated HTML tables.
#[derive(Parser, Debug, Clone)]
#[command(name = "datagrid", author, version, about)]
pub struct Cli {
    /// Enable verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render one page of a dataset as a standalone HTML document
    Render(RenderArgs),

    /// Validate a table configuration
    Check(CheckArgs),
}

/// Arguments for `render`.
#[derive(Parser, Debug, Clone)]
pub struct RenderArgs {
    /// JSON file holding an array of records
    #[arg(long, short = 'd')]
    pub data: PathBuf,

    /// Table configuration (columns are inferred when omitted)
    #[arg(long, short = 'c', env = "DATAGRID_CONFIG")]
    pub config: Option<PathBuf>,

    /// Search keyword
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Restrict search to one column
    #[arg(long)]
    pub search_field: Option<String>,

    /// Filter as key=value (repeatable)
    #[arg(long = "filter", short = 'f', value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Sort as key or key:desc
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortArg>,

    /// Page to render (clamped)
    #[arg(long, short = 'p')]
    pub page: Option<usize>,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Document title
    #[arg(long, default_value = "datagrid")]
    pub title: String,

    /// Output file (stdout if omitted)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for `check`.
#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    /// Table configuration to validate
    #[arg(long, short = 'c')]
    pub config: PathBuf,
}

/// Parsed `--sort` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    /// Column key.
    pub key: String,
    /// Whether to sort descending.
    pub descending: bool,
}

fn parse_filter(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got {s:?}")),
    }
}

fn parse_sort(s: &str) -> Result<SortArg, String> {
    let (key, descending) = match s.rsplit_once(':') {
        Some((key, "desc")) => (key, true),
        Some((key, "asc")) => (key, false),
        Some((_, other)) => return Err(format!("unknown sort direction {other:?}")),
        None => (s, false),
    };
    if key.is_empty() {
        return Err("sort key is empty".to_string());
    }
    Ok(SortArg {
        key: key.to_string(),
        descending,
    })
}

impl Cli {
    /// Get the default log filter based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Runs the parsed command.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Render(args) => render(&args),
        Command::Check(args) => check(&args),
    }
}

fn load_config(path: &Path) -> anyhow::Result<TableConfig> {
    TableConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn check(args: &CheckArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)?;
    config
        .validate()
        .with_context(|| format!("{} is not a valid table config", args.config.display()))?;
    println!(
        "{}: ok ({} columns)",
        args.config.display(),
        config.columns.len()
    );
    Ok(())
}

fn render(args: &RenderArgs) -> anyhow::Result<()> {
    let text = fs::read_to_string(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    let records = records_from_json(&text)
        .with_context(|| format!("failed to parse {}", args.data.display()))?;
    info!("Loaded {} records from {}", records.len(), args.data.display());

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => TableConfig::new(DEFAULT_CONTAINER_ID, infer_columns(&records)),
    };
    if config.container_id.is_empty() {
        config.container_id = DEFAULT_CONTAINER_ID.to_string();
    }
    if config.columns.is_empty() {
        bail!("no columns: the config defines none and the data has no fields");
    }
    config.validate()?;

    let container_id = config.container_id.clone();
    let mut table = DataTable::new(
        TableOptions::new(config),
        MemoryHost::with_element(&container_id),
    );
    table.set_data(records);

    if let Some(size) = args.page_size {
        table.set_page_size(size);
    }
    if let Some(field) = &args.search_field {
        table.set_search_field(Some(field.as_str()));
    }
    if let Some(keyword) = &args.search {
        table.search(keyword.as_str());
    }
    for (key, value) in &args.filters {
        table.set_filter(key.as_str(), value.as_str());
    }
    if let Some(sort) = &args.sort {
        table.set_sort(&sort.key);
        if sort.descending {
            table.set_sort(&sort.key);
        }
    }
    if let Some(page) = args.page {
        table.go_to_page(page);
    }
    debug!(
        "Rendering page {}/{} of {} records",
        table.current_page(),
        table.total_pages(),
        table.total_records()
    );

    let body = table.last_render().unwrap_or_default();
    let document = html_document(&args.title, body);

    match &args.output {
        Some(path) => fs::write(path, document)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(document.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

/// One sortable, searchable column per field, in first-seen order.
fn infer_columns(records: &[Record]) -> Vec<Column> {
    let mut keys: Vec<&str> = Vec::new();
    for record in records {
        for (key, _) in record.fields() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    keys.into_iter()
        .map(|key| Column::new(key, key).sortable().searchable())
        .collect()
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
.data-table{border-collapse:collapse;width:100%}\
.data-table th,.data-table td{border:1px solid #ddd;padding:.4rem .6rem;text-align:left}\
.data-table-th.sortable{cursor:pointer}\
.data-table-toolbar{display:flex;justify-content:space-between;margin-bottom:.5rem}\
.data-table-empty{text-align:center;color:#888}\
.data-table-pagination{margin-top:.5rem}\
.page-btn.active{font-weight:bold}";

/// Wraps rendered table markup in a standalone document.
fn html_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<div id=\"{DEFAULT_CONTAINER_ID}\">\n{body}\n</div>\n</body>\n</html>\n",
        escape_html(title)
    )
}
