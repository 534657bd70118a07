use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use memomark::config::Config;
use memomark::memo::{Memo, UserStats};
use memomark::serializer::InlineStyle;
use memomark::wire::{self, Encoding};
use memomark::MarkdownSerializer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(ClapParser)]
#[command(name = "memomark")]
#[command(about = "Tokenize note markdown into nodes and back", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long, default_value = "memomark.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse markdown into node JSON
    Parse {
        /// Input markdown file (defaults to stdin)
        input: Option<PathBuf>,

        /// Node JSON shape (overrides config)
        #[arg(short, long, value_enum)]
        encoding: Option<Encoding>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Turn node JSON back into markdown
    Restore {
        /// Input node JSON file (defaults to stdin)
        input: Option<PathBuf>,

        /// Node JSON shape (overrides config)
        #[arg(short, long, value_enum)]
        encoding: Option<Encoding>,

        /// Inline output style (overrides config)
        #[arg(short, long, value_enum)]
        style: Option<InlineStyle>,
    },
    /// Tag and content statistics over markdown files, one memo per file
    Stats {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memomark=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading config {}", cli.config.display()))?;

    match cli.command {
        Commands::Parse {
            input,
            encoding,
            pretty,
        } => {
            let markdown = read_input(input.as_deref())?;
            let nodes = config.parser().tokenize(&markdown);
            tracing::info!(blocks = nodes.len(), "parsed");
            let encoding = encoding.unwrap_or(config.output.encoding);
            println!("{}", wire::encode(&nodes, encoding, pretty || config.output.pretty)?);
        }
        Commands::Restore {
            input,
            encoding,
            style,
        } => {
            let json = read_input(input.as_deref())?;
            let nodes = wire::decode(&json, encoding.unwrap_or(config.output.encoding))
                .context("decoding node JSON")?;
            let serializer = match style {
                Some(style) => MarkdownSerializer::with_style(style),
                None => config.serializer(),
            };
            println!("{}", serializer.serialize(&nodes));
        }
        Commands::Stats { inputs } => {
            let parser = config.parser();
            let mut memos = Vec::with_capacity(inputs.len());
            for path in &inputs {
                memos.push(Memo::from_content(read_input(Some(path.as_path()))?, &parser));
            }
            let stats = UserStats::collect(&memos);
            let json = if config.output.pretty {
                serde_json::to_string_pretty(&stats)?
            } else {
                serde_json::to_string(&stats)?
            };
            println!("{}", json);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            Ok(input)
        }
    }
}
