//! `dql` - run lazy DOM queries from the command line
//!
//! ```text
//! dql page.html '**/a/@href'            # every href, one JSON line each
//! dql page.html '**/title/text()' --first
//! curl -s https://example.com | dql - '**/table' --unique --html
//! ```

mod output;
mod path;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dom::{DomSerializer, SerializerConfig};
use query::{Loader, NodeSet, Source, SourceConfig};
use serde_json::Value;
use tracing::Level;

use crate::output::NodeFormat;
use crate::path::{Selection, apply, parse_path};

#[derive(Debug, Parser)]
#[command(name = "dql", version, about = "Query HTML documents with lazy path expressions")]
struct Args {
    /// File path, file:// URL, or `-` for stdin
    source: String,

    /// Steps separated by `/`: `*`, `**`, a tag name, `@attr`, `text()`
    #[arg(default_value = "")]
    path: String,

    /// Print only the first result; fail if there is none
    #[arg(long, conflicts_with = "unique")]
    first: bool,

    /// Print the only result; fail if there are none or several
    #[arg(long)]
    unique: bool,

    /// Stop after this many results
    #[arg(long, short = 'n')]
    limit: Option<usize>,

    /// Print nodes as HTML instead of JSON summaries
    #[arg(long)]
    html: bool,

    /// Indent HTML output, one node per line
    #[arg(long, requires = "html")]
    pretty: bool,

    /// Cut text nodes in HTML output after this many characters
    #[arg(long, value_name = "N", requires = "html")]
    max_text: Option<usize>,

    /// JSON file with loader settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn node_format(&self) -> NodeFormat {
        if self.html {
            NodeFormat::Html(DomSerializer::with_config(SerializerConfig {
                pretty: self.pretty,
                max_text_length: self.max_text,
            }))
        } else {
            NodeFormat::Json
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<SourceConfig> {
    let Some(path) = path else {
        return Ok(SourceConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

fn load_source(loader: &Loader, source: &str) -> NodeSet {
    if source == "-" {
        loader.load(Source::reader(io::stdin()))
    } else {
        loader.load(source)
    }
}

/// Stream every item as one JSON line, up to `limit`
fn print_all<T: 'static>(
    set: &query::ResultSet<T>,
    limit: Option<usize>,
    render: impl Fn(T) -> Value,
    out: &mut impl Write,
) -> Result<usize> {
    if let Some(err) = set.error() {
        return Err(err.clone().into());
    }
    let limit = limit.unwrap_or(usize::MAX);
    let mut printed = 0;
    let mut failure = None;
    set.enumerate().produce(|item| {
        if printed >= limit {
            return false;
        }
        if let Err(err) = writeln!(out, "{}", render(item)) {
            failure = Some(err);
            return false;
        }
        printed += 1;
        printed < limit
    });
    match failure {
        Some(err) => Err(err).context("Failed to write output"),
        None => Ok(printed),
    }
}

fn run(args: &Args) -> Result<()> {
    let steps = parse_path(&args.path)?;
    let loader = Loader::with_config(load_config(args.config.as_ref())?);
    let set = load_source(&loader, &args.source);
    if let Some(err) = set.error() {
        return Err(anyhow::Error::new(err.clone()).context(format!("Failed to load {}", args.source)));
    }
    let format = args.node_format();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match apply(set, &steps) {
        Selection::Nodes(nodes) => {
            if args.first || args.unique {
                let node = if args.first {
                    nodes.first_or_error()?
                } else {
                    nodes.first_and_unique_or_error()?
                };
                writeln!(out, "{}", output::node(&node, &format))?;
            } else {
                let printed =
                    print_all(&nodes, args.limit, |node| output::node(&node, &format), &mut out)?;
                tracing::debug!("[dql] Printed {} nodes", printed);
            }
        }
        Selection::Values(values) => {
            if args.first || args.unique {
                let value = if args.first {
                    values.first_or_error()?
                } else {
                    values.first_and_unique_or_error()?
                };
                writeln!(out, "{}", Value::String(value))?;
            } else {
                let printed = print_all(
                    &values,
                    args.limit,
                    |item| output::item(item, Value::String),
                    &mut out,
                )?;
                tracing::debug!("[dql] Printed {} values", printed);
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    run(&args)
}
