//! Tablock CLI - inspect and drive tab lock state from the command line.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "tablock")]
#[command(about = "Navigation and close locks for browser tabs", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a tablock profile in the current directory
    Init,
    /// Show persisted lock records and global settings
    Status {
        /// Only show this tab
        #[arg(long)]
        tab: Option<u32>,
    },
    /// Show or change the global link policy
    Settings {
        /// Open links from locked pages in a new tab
        #[arg(long)]
        open_links_in_new_tab: Option<bool>,
    },
    /// Run one protocol request against the persisted state
    Request {
        /// Request as JSON, e.g. '{"action":"getLockStatus","tabId":7}'
        json: String,
        /// Send as the page agent of this tab (default: the popup)
        #[arg(long)]
        sender_tab: Option<u32>,
    },
    /// Replay a JSON-lines file of events and requests against a simulated browser
    Replay {
        /// File with one `{"event": ...}` or `{"request": ..., "sender": ...}` per line
        file: PathBuf,
    },
}

fn main() {
    // Respects RUST_LOG (e.g. RUST_LOG=tablock_core=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli.command) {
        commands::report_error(&e);
        std::process::exit(1);
    }
}

fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Init => commands::init::run(),
        Commands::Status { tab } => commands::status::run(tab),
        Commands::Settings {
            open_links_in_new_tab,
        } => commands::settings::run(open_links_in_new_tab),
        Commands::Request { json, sender_tab } => commands::request::run(&json, sender_tab),
        Commands::Replay { file } => commands::replay::run(&file),
    }
}
