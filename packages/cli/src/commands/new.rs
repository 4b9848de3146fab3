use super::{emit, resolve};
use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_model::templates;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Template to start from (see `pagesmith templates`)
    pub template: String,

    /// Page file to write (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn new(args: NewArgs, cwd: &Path) -> Result<()> {
    let template = templates::find(&args.template).ok_or_else(|| {
        let known: Vec<String> = templates::builtin().into_iter().map(|t| t.id).collect();
        anyhow!(
            "Unknown template: {}. Available: {}",
            args.template,
            known.join(", ")
        )
    })?;

    let json = template.nodes.to_json_pretty()?;
    let output = args.output.as_deref().map(|path| resolve(cwd, path));
    emit(output.as_deref(), &json)?;

    if let Some(path) = output {
        println!(
            "  {} {} → {}",
            "✓".green(),
            template.name,
            path.display()
        );
    }
    Ok(())
}
