//! Perspective CLI
//!
//! Declares a cost-allocation perspective in TOML and keeps the remote copy
//! in line with it.

mod cli;
mod commands;
mod context;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::{Cli, Commands};
use context::Context;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = Context::from_cli(&cli);
    execute_command(&ctx, cli.command)
}

/// `--verbose` forces DEBUG; otherwise `RUST_LOG`, defaulting to warnings
fn init_tracing(verbose: bool) {
    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(true);

    let result = if verbose {
        builder.with_max_level(Level::DEBUG).try_init()
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        builder.with_env_filter(filter).try_init()
    };

    match result {
        Ok(()) => tracing::debug!("Verbose mode enabled"),
        Err(e) => eprintln!("{}: tracing disabled: {}", "warning".yellow().bold(), e),
    }
}

fn execute_command(ctx: &Context, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Plan { json } => commands::run_plan(ctx, json),
        Commands::Apply => commands::run_apply(ctx, ctx.client()?),
        Commands::Show { json } => commands::run_show(ctx, ctx.client()?, json),
        Commands::Diff { json } => commands::run_diff(ctx, ctx.client()?, json),
        Commands::Import { id } => commands::run_import(ctx, ctx.client()?, &id),
        Commands::Destroy { archive } => commands::run_destroy(ctx, ctx.client()?, archive),
        Commands::List { all } => commands::run_list(ctx.client()?, all),
    }
}
