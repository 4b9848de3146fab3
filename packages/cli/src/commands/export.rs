use super::{emit, read_page, resolve};
use crate::config::Config;
use anyhow::{anyhow, bail, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_compiler_html::{compile_to_html, CompileOptions};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Page JSON files to export
    #[arg(required = true)]
    pub pages: Vec<PathBuf>,

    /// Document title (overrides config)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output to stdout instead of files
    #[arg(long)]
    pub stdout: bool,

    /// Output file (single page only)
    #[arg(short, long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Output directory (overrides config)
    #[arg(long)]
    pub out_dir: Option<String>,
}

pub(crate) fn html_options(config: &Config, title: Option<&str>) -> CompileOptions {
    CompileOptions {
        title: title.unwrap_or(&config.title).to_string(),
        lang: config.lang.clone(),
        pretty: config.pretty,
        ..CompileOptions::default()
    }
}

pub fn export(args: ExportArgs, cwd: &Path) -> Result<()> {
    let mut config = Config::load(cwd)?;
    if let Some(out_dir) = &args.out_dir {
        config.out_dir = out_dir.clone();
    }
    if args.output.is_some() && args.pages.len() > 1 {
        return Err(anyhow!("--output can only be used with a single page"));
    }
    let options = html_options(&config, args.title.as_deref());

    if !args.stdout {
        println!("{}", "📦 Exporting pages...".bright_blue().bold());
    }

    let mut success_count = 0;
    let mut error_count = 0;
    let mut written = HashSet::new();

    for page in &args.pages {
        match export_page(&resolve(cwd, page), &args, &config, &options, cwd, &mut written) {
            Ok(Some(output_path)) => {
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    page.display(),
                    output_path.display()
                );
            }
            Ok(None) => success_count += 1,
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    page.display(),
                    e.to_string().red()
                );
            }
        }
    }

    if args.stdout {
        return if error_count == 0 {
            Ok(())
        } else {
            Err(anyhow!("{} pages failed to export", error_count))
        };
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Exported {} pages successfully",
            "✅".green(),
            success_count
        );
        Ok(())
    } else {
        Err(anyhow!(
            "Exported {} pages, {} errors",
            success_count,
            error_count
        ))
    }
}

/// Export one page; returns the written path, `None` for stdout.
/// A page whose output path was already written in this run is refused.
fn export_page(
    page: &Path,
    args: &ExportArgs,
    config: &Config,
    options: &CompileOptions,
    cwd: &Path,
    written: &mut HashSet<PathBuf>,
) -> Result<Option<PathBuf>> {
    let tree = read_page(page)?;
    let html = compile_to_html(&tree, options);

    if args.stdout {
        emit(None, &html)?;
        return Ok(None);
    }

    let output_file = match &args.output {
        Some(output) => resolve(cwd, output),
        None => {
            let stem = page
                .file_stem()
                .ok_or_else(|| anyhow!("Cannot derive a file name from {}", page.display()))?;
            config
                .get_out_dir(cwd)
                .join(format!("{}.html", stem.to_string_lossy()))
        }
    };
    if !written.insert(output_file.clone()) {
        bail!("{} was already written by an earlier page", output_file.display());
    }
    emit(Some(&output_file), &html)?;
    Ok(Some(output_file))
}
