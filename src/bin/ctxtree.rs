use context_tree::config::{load_config, ContextSettings};
use context_tree::{Context, ContextTree};

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ctxtree")]
#[command(about = "Inspect how a context tree configuration routes URIs", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the context each URI resolves to
    Resolve { uris: Vec<String> },
    /// Print the context governing each filesystem location
    Location { paths: Vec<String> },
    /// List every configured context with its parent
    Dump,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    let tree = config.build_tree()?;

    match cli.command {
        Commands::Resolve { uris } => {
            for uri in &uris {
                match tree.best_match(uri) {
                    Ok(Some(ctx)) => println!("{} -> {}", uri, describe(ctx)),
                    Ok(None) => println!("{} -> no match", uri),
                    Err(e) => println!("{} -> rejected: {}", uri, e),
                }
            }
        }
        Commands::Location { paths } => {
            for path in &paths {
                match tree.match_location(path) {
                    Some(ctx) => println!("{} -> {}", path, describe(ctx)),
                    None => println!("{} -> no match", path),
                }
            }
        }
        Commands::Dump => dump(&tree),
    }

    Ok(())
}

fn describe(ctx: &Context<ContextSettings>) -> String {
    let kind = if ctx.is_regex() { "regex" } else { "literal" };
    let handler = ctx.payload().handler.get();
    match handler {
        Some(h) => format!("{} [{}] handler={}", ctx.uri_pattern(), kind, h),
        None => format!("{} [{}]", ctx.uri_pattern(), kind),
    }
}

fn dump(tree: &ContextTree<ContextSettings>) {
    if let Some(root) = tree.root_context() {
        println!("(root) {}", describe(root));
    }
    for ctx in tree.contexts() {
        let parent = ctx.parent().unwrap_or("-");
        match ctx.location() {
            Some(location) => println!("{}  parent={}  location={}", describe(ctx), parent, location),
            None => println!("{}  parent={}", describe(ctx), parent),
        }
    }
}
