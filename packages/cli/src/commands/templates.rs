use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagesmith_model::templates;

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Only list templates in this category
    #[arg(short, long)]
    pub category: Option<String>,
}

pub fn templates(args: TemplatesArgs) -> Result<()> {
    let all = templates::builtin();

    println!("{}", "📐 Built-in templates".bright_blue().bold());
    for category in templates::categories() {
        if args.category.as_ref().is_some_and(|c| !c.eq_ignore_ascii_case(&category)) {
            continue;
        }
        println!();
        println!("{}", category.bold());
        for template in all.iter().filter(|t| t.category == category) {
            println!(
                "  {:<10} {} {}",
                template.id.green(),
                template.name,
                format!("({} blocks)", template.nodes.node_count()).dimmed()
            );
        }
    }
    Ok(())
}
