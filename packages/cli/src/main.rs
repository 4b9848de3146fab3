mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    blocks, export, init, new, replay, templates, BlocksArgs, ExportArgs, InitArgs, NewArgs,
    ReplayArgs, TemplatesArgs,
};
use tracing_subscriber::EnvFilter;

/// Pagesmith CLI - Build pages from content blocks
#[derive(Parser, Debug)]
#[command(name = "pagesmith")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log editor and compiler activity (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a Pagesmith project config
    Init(InitArgs),

    /// List available content blocks
    Blocks(BlocksArgs),

    /// List built-in page templates
    Templates(TemplatesArgs),

    /// Create a page from a template
    New(NewArgs),

    /// Export pages to standalone HTML
    Export(ExportArgs),

    /// Run a script of editor commands against a page
    Replay(ReplayArgs),
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::Init(args) => init(args, &cwd),
        Command::Blocks(args) => blocks(args),
        Command::Templates(args) => templates(args),
        Command::New(args) => new(args, &cwd),
        Command::Export(args) => export(args, &cwd),
        Command::Replay(args) => replay(args, &cwd),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
