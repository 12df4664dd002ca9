//! Browse a remote HTTP directory index as a lazily-cached file tree.

mod error;
mod output;

use crate::error::{ErrorKind, Result};
use clap::{ArgAction, Parser, Subcommand};
use exn::ResultExt;
use futures::{StreamExt, pin_mut};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncWriteExt, Stdout};
use tracing_subscriber::EnvFilter;
use url::Url;
use webdir_cache::Tree;
use webdir_transport::backend::HttpTransport;

/// Bytes requested per round-trip by `cat`.
const CAT_CHUNK: usize = 256 * 1024;

#[derive(Parser)]
#[command(version, about = "Browse a remote HTTP directory index as a file tree.")]
struct Args {
    /// Configuration file (TOML, YAML or JSON).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory index to browse; overrides `base_url` from the configuration.
    #[arg(short, long, global = true)]
    url: Option<Url>,

    /// Log more (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List a directory.
    Ls {
        #[arg(default_value = "/")]
        path: String,
    },
    /// Show everything known about a single entry.
    Stat { path: String },
    /// Write a file, or part of it, to standard output.
    Cat {
        path: String,
        /// Byte offset to start reading from.
        #[arg(long, default_value_t = 0)]
        offset: u64,
        /// Maximum number of bytes to write. Reads to the end by default.
        #[arg(long)]
        length: Option<u64>,
    },
    /// Recursively list a directory.
    Tree {
        #[arg(default_value = "/")]
        path: String,
        /// How many levels of directories to descend into.
        #[arg(long)]
        depth: Option<usize>,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = webdir_config::load(args.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    if let Some(url) = args.url {
        config = config.with_base_url(url).or_raise(|| ErrorKind::Config)?;
    }
    let base_url = config.base_url().or_raise(|| ErrorKind::Config)?;
    let transport = HttpTransport::new("http", &config.network).or_raise(|| ErrorKind::Transport)?;
    let tree = Tree::connect(base_url, Arc::new(transport))
        .await
        .or_raise(|| ErrorKind::Connect(base_url.to_string()))?;

    let mut stdout = tokio::io::stdout();
    match args.command {
        Command::Ls { path } => {
            let children = tree.list_children(&path).await.or_raise(|| ErrorKind::Command("ls"))?;
            for info in &children {
                write(&mut stdout, output::listing_row(info).as_bytes()).await?;
            }
        },
        Command::Stat { path } => {
            let entry = tree.resolve(&path).await.or_raise(|| ErrorKind::Command("stat"))?;
            write(&mut stdout, output::stat(&entry).as_bytes()).await?;
        },
        Command::Cat { path, offset, length } => cat(&tree, &mut stdout, &path, offset, length).await?,
        Command::Tree { path, depth } => {
            let walk = tree.walk(&path, depth);
            pin_mut!(walk);
            while let Some(item) = walk.next().await {
                match item {
                    Ok(item) => write(&mut stdout, output::tree_line(&item).as_bytes()).await?,
                    // The rest of the tree is still worth printing.
                    Err(err) => tracing::warn!(error = ?err, "Skipping directory"),
                }
            }
        },
    }
    stdout.flush().await.or_raise(|| ErrorKind::Output)
}

async fn cat(tree: &Tree, stdout: &mut Stdout, path: &str, offset: u64, length: Option<u64>) -> Result<()> {
    let entry = tree.resolve(path).await.or_raise(|| ErrorKind::Command("cat"))?;
    let end = length.map_or(u64::MAX, |length| offset.saturating_add(length));
    let mut position = offset;
    while position < end {
        let wanted = (end - position).min(CAT_CHUNK as u64) as usize;
        let chunk = tree
            .read_entry(&entry, position, wanted)
            .await
            .or_raise(|| ErrorKind::Command("cat"))?;
        if chunk.is_empty() {
            break;
        }
        write(stdout, &chunk).await?;
        position += chunk.len() as u64;
    }
    Ok(())
}

async fn write(stdout: &mut Stdout, bytes: &[u8]) -> Result<()> {
    stdout.write_all(bytes).await.or_raise(|| ErrorKind::Output)
}
