use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_model::{default_attributes, BlockKind};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct BlocksArgs {
    /// Print the block table as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockInfo {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
    container: bool,
    default_content: &'static str,
    default_attributes: Vec<String>,
}

fn block_table() -> Vec<BlockInfo> {
    BlockKind::ALL
        .iter()
        .map(|kind| BlockInfo {
            kind: kind.as_str(),
            name: kind.display_name(),
            container: kind.is_container(),
            default_content: kind.default_content(),
            default_attributes: default_attributes(kind.as_str()).into_keys().collect(),
        })
        .collect()
}

pub fn blocks(args: BlocksArgs) -> Result<()> {
    let table = block_table();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&table)?);
        return Ok(());
    }

    println!("{}", "🧱 Available blocks".bright_blue().bold());
    for block in &table {
        let marker = if block.container {
            " (container)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {:<12} {}{}", block.kind.green(), block.name, marker);
    }
    Ok(())
}
