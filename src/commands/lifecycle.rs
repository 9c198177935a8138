use std::io::Write;

use crate::commands::one_arg;
use crate::error::{Result, TreeError};
use crate::model::State;
use crate::output;
use crate::shell::{Console, Flow, Shell};
use crate::tree;

fn set_state(
    shell: &mut Shell,
    console: &mut dyn Console,
    name: &str,
    args: &[&str],
    state: State,
) -> Result<Flow> {
    let id = shell
        .context()
        .resolve_child(shell.store(), one_arg(name, args)?)?;
    let task = tree::set_leaf_state(shell.store(), id, state)?;
    shell.propagate()?;
    writeln!(
        console.out(),
        "[{}] {} {}",
        task.id,
        task.name,
        output::state_marker(task.state)
    )?;
    Ok(Flow::Continue)
}

pub fn progr(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    set_state(shell, console, "progr", args, State::InProgress)
}

pub fn done(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    set_state(shell, console, "done", args, State::Done)
}

/// `reset id`: confirm, then put the whole subtree back to todo.
pub fn reset(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let id = shell
        .context()
        .resolve_child(shell.store(), one_arg("reset", args)?)?;
    let task = shell.store().read(id)?;
    let question = format!("Reset task {} '{}' and its subtasks to todo?", id, task.name);
    if !console.confirm(&question)? {
        return Err(TreeError::Cancelled);
    }
    tree::reset_subtree(shell.store(), id)?;
    shell.propagate()?;
    Ok(Flow::Continue)
}
