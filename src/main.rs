//! Fragment Router CLI
//!
//! Loads a declarative route file and drives a router from the command
//! line, printing one JSON line per handler invocation.
//!
//! # Architecture Overview
//!
//! ```text
//!     route file (TOML)
//!         │
//!         ▼
//!     ┌──────────┐    ┌─────────────┐    ┌──────────────┐
//!     │  config  │───▶│   routing   │───▶│   dispatch   │───▶ stdout (JSON lines)
//!     │  loader  │    │   tables    │    │    engine    │
//!     └──────────┘    └─────────────┘    └──────┬───────┘
//!                                               │ reject / redirect
//!                                               ▼
//!                                        ┌──────────────┐
//!                                        │  navigation  │───▶ MemoryLocation
//!                                        └──────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use fragment_router::config::{build_router, load_config, InvocationObserver, RouterFile};
use fragment_router::dispatch::Args;
use fragment_router::navigation::MemoryLocation;
use fragment_router::observability::logging::init_logging;
use fragment_router::pattern::{compile_strict, keys_of};
use fragment_router::Router;

#[derive(Parser)]
#[command(name = "fragment-router")]
#[command(about = "Match and dispatch URL fragments against a route file", long_about = None)]
struct Cli {
    /// Route file to load (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overridden by RUST_LOG
    #[arg(short, long)]
    log: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch paths without navigating
    Check { paths: Vec<String> },
    /// Dispatch paths and navigate to each unless rejected
    Route { paths: Vec<String> },
    /// Print the parameter names of a pattern
    Keys { pattern: String },
    /// Print the compiled matcher of a pattern
    Compile { pattern: String },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterFile::default(),
    };
    let filter = cli.log.as_deref().unwrap_or(&file.observability.log_filter);
    init_logging(filter)?;

    match cli.command {
        Commands::Check { paths } => {
            let router = router_for(&file, None);
            for path in &paths {
                router.check(path);
            }
        }
        Commands::Route { paths } => {
            let location = Arc::new(MemoryLocation::default());
            let router = router_for(&file, Some(location.clone()));
            for path in &paths {
                router.route(path);
                println!(
                    "{}",
                    json!({
                        "path": path,
                        "committed": router.committed(),
                        "location": router.current(),
                        "rejected": router.rollback_requested(),
                    })
                );
            }
            tracing::debug!(entries = ?location.entries(), "Location history");
        }
        Commands::Keys { pattern } => {
            println!("{}", json!({ "pattern": pattern, "keys": keys_of(&pattern) }));
        }
        Commands::Compile { pattern } => {
            let compiled = compile_strict(&pattern)?;
            let names: Vec<&str> = compiled.captures().iter().map(|c| c.name()).collect();
            println!(
                "{}",
                json!({ "pattern": pattern, "matcher": compiled.as_str(), "params": names })
            );
        }
    }

    Ok(())
}

fn router_for(file: &RouterFile, location: Option<Arc<MemoryLocation>>) -> Router {
    let observer: InvocationObserver = Arc::new(|label: &str, args: &Args| {
        println!("{}", json!({ "route": label, "args": args.to_json() }));
    });
    let router = match location {
        Some(location) => Router::with_location(location),
        None => Router::new(),
    };
    build_router(file, router, &observer)
}
