//! modkit CLI - Main entry point

mod builtin;
mod commands;

use clap::{Parser, Subcommand};
use commands::CompileArgs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// modkit - apply config plugins and compile native project mods
#[derive(Parser, Debug)]
#[command(name = "modkit")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging and mod chain traces
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply the descriptor's plugins and compile mods into the native project
    Compile {
        /// Path to the descriptor JSON file
        descriptor: PathBuf,

        /// Project root (defaults to the descriptor's directory)
        #[arg(long)]
        project_root: Option<PathBuf>,

        /// Platforms to compile (repeatable, defaults to all)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,

        /// Run every mod without writing any file
        #[arg(long)]
        introspect: bool,

        /// Warn and continue when a plugin cannot be resolved
        #[arg(long)]
        skip_unresolved: bool,

        /// Write the compiled descriptor here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the plugin history recorded in a descriptor
    History {
        /// Path to the descriptor JSON file
        descriptor: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match args.command {
        Command::Compile {
            descriptor,
            project_root,
            platforms,
            introspect,
            skip_unresolved,
            output,
        } => {
            let compile_args = CompileArgs {
                descriptor,
                project_root,
                platforms,
                introspect,
                skip_unresolved,
                output,
                debug: args.debug,
            };
            commands::compile(&compile_args).await?;
        }
        Command::History { descriptor } => {
            commands::history(&descriptor).await?;
        }
    }

    Ok(())
}
