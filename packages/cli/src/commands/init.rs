use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Document title for exports
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output directory for exports
    #[arg(short, long)]
    pub out_dir: Option<String>,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing Pagesmith project...".bright_blue().bold());

    let mut config = Config::default();
    if let Some(title) = args.title {
        config.title = title;
    }
    if let Some(out_dir) = args.out_dir {
        config.out_dir = out_dir;
    }

    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    println!();
    println!("{}", "✨ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. {} to start from a template", "pagesmith new landing-1 -o page.json".bright_cyan());
    println!("  2. {} to build HTML", "pagesmith export page.json".bright_cyan());

    Ok(())
}
