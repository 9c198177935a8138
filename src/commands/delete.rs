use std::io::Write;

use crate::commands::one_arg;
use crate::error::{Result, TreeError};
use crate::shell::{Console, Flow, Shell};
use crate::tree;

/// `rm id`: confirm, then delete the subtask and everything below it.
pub fn rm(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let store = shell.store();
    let id = shell.context().resolve_child(store, one_arg("rm", args)?)?;
    let task = store.read(id)?;

    let question = if task.is_leaf() {
        format!("Remove task {} '{}'?", task.id, task.name)
    } else {
        format!(
            "Remove task {} '{}' and all its subtasks?",
            task.id, task.name
        )
    };
    if !console.confirm(&question)? {
        return Err(TreeError::Cancelled);
    }

    let parent = shell.context().current_id();
    let removed = tree::remove(store, parent, id)?;
    shell.propagate()?;
    writeln!(console.out(), "Removed {} task(s)", removed.len())?;
    Ok(Flow::Continue)
}
