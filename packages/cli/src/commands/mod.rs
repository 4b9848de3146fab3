pub mod blocks;
pub mod export;
pub mod init;
pub mod new;
pub mod replay;
pub mod templates;

pub use blocks::{blocks, BlocksArgs};
pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use new::{new, NewArgs};
pub use replay::{replay, ReplayArgs};
pub use templates::{templates, TemplatesArgs};

use anyhow::{Context, Result};
use pagesmith_model::Tree;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolve `path` against the working directory
pub(crate) fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Read a page JSON file. Pages with duplicate ids are rejected.
pub(crate) fn read_page(path: &Path) -> Result<Tree> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let tree = Tree::from_json(&source)
        .with_context(|| format!("Invalid page JSON in {}", path.display()))?;

    let duplicates = tree.duplicate_ids();
    if let Some(id) = duplicates.first() {
        anyhow::bail!("{} contains duplicate node id {}", path.display(), id);
    }
    Ok(tree)
}

/// Write `content` to `output`, creating parent directories, or print it
/// when no output is given
pub(crate) fn emit(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => println!("{}", content),
    }
    Ok(())
}
