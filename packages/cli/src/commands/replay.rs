//! Replays a JSON script of editor commands through an edit session.
//!
//! ```json
//! [
//!   { "op": "applyTemplate", "templateId": "landing-1" },
//!   { "op": "insert", "type": "image", "index": 0 },
//!   { "op": "update", "nodeId": "hero-heading", "patch": { "content": "Hi" } },
//!   { "op": "undo" }
//! ]
//! ```

use super::export::html_options;
use super::{emit, read_page, resolve};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use clap::Args;
use colored::Colorize;
use pagesmith_compiler_html::compile_to_html;
use pagesmith_editor::{EditSession, HistoryOutcome, Mutation, MutationOutcome, NodeId};
use pagesmith_model::{templates, Tree};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Script file: a JSON array of commands
    pub script: PathBuf,

    /// Page to start from (empty page when omitted)
    #[arg(short, long)]
    pub page: Option<PathBuf>,

    /// Emit HTML instead of page JSON
    #[arg(long)]
    pub html: bool,

    /// Document title for --html (overrides config)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Fail on the first command that leaves the page unchanged
    #[arg(long)]
    pub strict: bool,
}

/// Commands that act on the session rather than the tree
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum SessionCommand {
    Undo,
    Redo,
    #[serde(rename_all = "camelCase")]
    ApplyTemplate { template_id: String },
    #[serde(rename_all = "camelCase")]
    Select { node_id: Option<NodeId> },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    Edit(Mutation),
    Session(SessionCommand),
}

/// What a step did, for the report
#[derive(Debug, PartialEq)]
enum StepReport {
    Applied(String),
    Skipped(String),
}

fn run_step(session: &mut EditSession, step: Step) -> Result<StepReport> {
    let report = match step {
        Step::Edit(mutation) => {
            let label = mutation.label();
            match session.apply(mutation) {
                MutationOutcome::Applied(_) => StepReport::Applied(label),
                MutationOutcome::Noop { reason } => {
                    StepReport::Skipped(format!("{}: {}", label, reason))
                }
            }
        }
        Step::Session(SessionCommand::Undo) => match session.undo() {
            HistoryOutcome::Applied => StepReport::Applied("undo".to_string()),
            HistoryOutcome::Nothing => StepReport::Skipped("undo: nothing to undo".to_string()),
        },
        Step::Session(SessionCommand::Redo) => match session.redo() {
            HistoryOutcome::Applied => StepReport::Applied("redo".to_string()),
            HistoryOutcome::Nothing => StepReport::Skipped("redo: nothing to redo".to_string()),
        },
        Step::Session(SessionCommand::ApplyTemplate { template_id }) => {
            let template = templates::find(&template_id)
                .ok_or_else(|| anyhow!("Unknown template: {}", template_id))?;
            match session.apply_template(&template) {
                MutationOutcome::Applied(_) => StepReport::Applied(format!("template {}", template_id)),
                MutationOutcome::Noop { reason } => {
                    StepReport::Skipped(format!("template {}: {}", template_id, reason))
                }
            }
        }
        Step::Session(SessionCommand::Select { node_id: None }) => {
            session.clear_selection();
            StepReport::Applied("clear selection".to_string())
        }
        Step::Session(SessionCommand::Select { node_id: Some(id) }) => {
            if session.select(&id) {
                StepReport::Applied(format!("select {}", id))
            } else {
                StepReport::Skipped(format!("select {}: node not found", id))
            }
        }
    };
    Ok(report)
}

fn parse_script(path: &Path) -> Result<Vec<Step>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&source)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value(value)
                .with_context(|| format!("Invalid command #{} in {}", i + 1, path.display()))
        })
        .collect()
}

pub fn replay(args: ReplayArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let steps = parse_script(&resolve(cwd, &args.script))?;

    let initial = match &args.page {
        Some(page) => read_page(&resolve(cwd, page))?,
        None => Tree::new(),
    };
    let mut session = EditSession::with_history_limit(initial, config.history_limit);
    debug!(
        steps = steps.len(),
        history_limit = config.history_limit,
        "Starting replay"
    );

    eprintln!("{}", "🔁 Replaying commands...".bright_blue().bold());
    let mut skipped = 0;
    for (i, step) in steps.into_iter().enumerate() {
        match run_step(&mut session, step)? {
            StepReport::Applied(label) => eprintln!("  {} {}", "✓".green(), label),
            StepReport::Skipped(label) => {
                skipped += 1;
                eprintln!("  {} {}", "⚠️".yellow(), label.yellow());
                if args.strict {
                    return Err(anyhow!("Command #{} left the page unchanged: {}", i + 1, label));
                }
            }
        }
    }
    eprintln!(
        "{} {} nodes, {} undo levels, {} no-ops",
        "✅".green(),
        session.tree().node_count(),
        session.history().undo_levels(),
        skipped
    );

    let content = if args.html {
        compile_to_html(session.tree(), &html_options(&config, args.title.as_deref()))
    } else {
        session.tree().to_json_pretty()?
    };
    let output = args.output.as_deref().map(|path| resolve(cwd, path));
    emit(output.as_deref(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(json: &str) -> Vec<Step> {
        serde_json::from_str(json).unwrap()
    }

    fn replay_args(script: &str) -> ReplayArgs {
        ReplayArgs {
            script: PathBuf::from(script),
            page: None,
            html: false,
            title: None,
            output: Some(PathBuf::from("out/page.json")),
            strict: false,
        }
    }

    #[test]
    fn test_step_parsing() {
        let parsed = steps(
            r#"[
                {"op": "insert", "type": "text"},
                {"op": "undo"},
                {"op": "applyTemplate", "templateId": "about-1"},
                {"op": "select", "nodeId": "about-text"},
                {"op": "select"}
            ]"#,
        );
        assert!(matches!(parsed[0], Step::Edit(Mutation::Insert(_))));
        assert!(matches!(parsed[1], Step::Session(SessionCommand::Undo)));
        assert!(matches!(
            parsed[2],
            Step::Session(SessionCommand::ApplyTemplate { .. })
        ));
        assert!(matches!(
            parsed[3],
            Step::Session(SessionCommand::Select { node_id: Some(_) })
        ));
        assert!(matches!(
            parsed[4],
            Step::Session(SessionCommand::Select { node_id: None })
        ));
    }

    #[test]
    fn test_run_steps_reports_noops() {
        let mut session = EditSession::new();
        let reports: Vec<StepReport> = steps(
            r#"[
                {"op": "applyTemplate", "templateId": "contact-1"},
                {"op": "delete", "nodeId": "ghost"},
                {"op": "move", "nodeId": "contact-form", "index": 0},
                {"op": "redo"}
            ]"#,
        )
        .into_iter()
        .map(|step| run_step(&mut session, step).unwrap())
        .collect();

        assert_eq!(reports[0], StepReport::Applied("template contact-1".to_string()));
        assert!(matches!(&reports[1], StepReport::Skipped(s) if s.contains("ghost")));
        assert_eq!(reports[2], StepReport::Applied("move contact-form".to_string()));
        assert_eq!(reports[3], StepReport::Skipped("redo: nothing to redo".to_string()));
        assert_eq!(session.tree().roots()[0].id.as_str(), "contact-form");
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let mut session = EditSession::new();
        let step = steps(r#"[{"op": "applyTemplate", "templateId": "nope"}]"#).remove(0);
        assert!(run_step(&mut session, step).is_err());
    }

    #[test]
    fn test_replay_writes_page() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("script.json"),
            r#"[
                {"op": "insert", "type": "section", "id": "s"},
                {"op": "insert", "type": "heading", "content": "Inside", "parentId": "s"},
                {"op": "insert", "type": "button"},
                {"op": "undo"}
            ]"#,
        )
        .unwrap();

        replay(replay_args("script.json"), dir.path()).unwrap();

        let page = read_page(&dir.path().join("out/page.json")).unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page.roots()[0].children[0].content.as_deref(), Some("Inside"));
    }

    #[test]
    fn test_replay_html_from_existing_page() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("page.json"),
            r#"[{"id": "t", "type": "text", "content": "Old"}]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("script.json"),
            r#"[{"op": "update", "nodeId": "t", "patch": {"content": "New"}}]"#,
        )
        .unwrap();

        let mut args = replay_args("script.json");
        args.page = Some(PathBuf::from("page.json"));
        args.html = true;
        args.output = Some(PathBuf::from("page.html"));
        replay(args, dir.path()).unwrap();

        let html = fs::read_to_string(dir.path().join("page.html")).unwrap();
        assert!(html.contains(r##"<p style="color: #4b5563; font-size: 16px">New</p>"##));
    }

    #[test]
    fn test_strict_replay_stops_on_noop() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("script.json"), r#"[{"op": "undo"}]"#).unwrap();

        let mut args = replay_args("script.json");
        args.strict = true;
        let err = replay(args, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Command #1"));
    }
}
