use crate::commands::{no_args, one_arg, usage};
use crate::context::parse_id;
use crate::error::Result;
use crate::shell::{Console, Flow, Shell};
use crate::tree::{self, Direction};

/// `pull id`: move a subtask up next to the current task.
pub fn pull(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let id = parse_id(one_arg("pull", args)?)?;
    tree::pull(shell.store(), &shell.context().history_ids(), id)?;
    shell.propagate()?;
    Ok(Flow::Continue)
}

/// `push id1 id2`: move subtask `id1` under its sibling `id2`.
pub fn push(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let &[first, second] = args else {
        return Err(usage("push"));
    };
    let id = parse_id(first)?;
    let target = parse_id(second)?;
    tree::push(
        shell.store(),
        &shell.context().history_ids(),
        id,
        target,
        shell.now(),
    )?;
    shell.propagate()?;
    Ok(Flow::Continue)
}

fn shift(shell: &mut Shell, name: &str, args: &[&str], direction: Direction) -> Result<Flow> {
    let id = shell
        .context()
        .resolve_child(shell.store(), one_arg(name, args)?)?;
    let parent = shell.context().current_id();
    if !tree::shift(shell.store(), parent, id, direction)? {
        tracing::debug!(id, ?direction, "already at the boundary");
    }
    Ok(Flow::Continue)
}

pub fn up(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    shift(shell, "up", args, Direction::Up)
}

pub fn down(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    shift(shell, "down", args, Direction::Down)
}

pub fn sort(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    no_args("sort", args)?;
    tree::sort_children(shell.store(), shell.context().current_id())?;
    Ok(Flow::Continue)
}
