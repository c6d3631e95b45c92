//! Stack selection: maps a stack name (or the currently selected stack) to its log source.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::log::JsonLinesFile;

/// File inside the logs directory naming the currently selected stack.
pub const CURRENT_STACK_FILE: &str = "current";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    pub name: String,
    pub log_path: PathBuf,
}

impl Stack {
    pub fn source(&self) -> JsonLinesFile {
        JsonLinesFile::new(&self.log_path)
    }
}

/// Resolve `name`, falling back to the current stack when it is empty.
pub async fn require_stack(name: &str, logs_dir: &Path) -> Result<Stack> {
    let name = if name.is_empty() {
        current_stack(logs_dir).await?
    } else {
        name.to_string()
    };
    validate_name(&name)?;
    let log_path = logs_dir.join(format!("{name}.jsonl"));
    tracing::debug!(stack = %name, path = %log_path.display(), "resolved stack");
    Ok(Stack { name, log_path })
}

async fn current_stack(logs_dir: &Path) -> Result<String> {
    let path = logs_dir.join(CURRENT_STACK_FILE);
    let contents = match tokio::fs::read_to_string(&path).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            bail!("no stack selected; pass --stack or write a stack name to {}", path.display())
        }
        Err(err) => return Err(err).with_context(|| format!("failed to read {}", path.display())),
    };
    let name = contents.trim();
    if name.is_empty() {
        bail!("no stack selected; {} is empty", path.display());
    }
    Ok(name.to_string())
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        bail!("invalid stack name {name:?}");
    }
    Ok(())
}
