use std::io::Write;

use crate::commands::{one_arg, optional_arg};
use crate::error::{Result, TreeError};
use crate::output::format_duration;
use crate::shell::{Console, Flow, Shell};
use crate::tree;

/// `bwork id`
pub fn begin(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let store = shell.store();
    let id = shell
        .context()
        .resolve_child(store, one_arg("bwork", args)?)?;
    if let Some(folded) = tree::begin_work(store, id, shell.now())? {
        writeln!(
            console.out(),
            "Closed previous session ({})",
            format_duration(folded)
        )?;
    }
    writeln!(console.out(), "Started work on [{id}]")?;
    Ok(Flow::Continue)
}

/// `ework id`
pub fn end(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let store = shell.store();
    let id = shell
        .context()
        .resolve_child(store, one_arg("ework", args)?)?;
    let elapsed = tree::end_work(store, id, shell.now())?;
    writeln!(
        console.out(),
        "Worked {} on [{id}]",
        format_duration(elapsed)
    )?;
    Ok(Flow::Continue)
}

/// `wtime [id]`: worked time summed over the subtree, open sessions counted up to now.
pub fn time(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let token = optional_arg("wtime", args)?;
    let store = shell.store();
    let id = shell.context().resolve_target(store, token)?;
    let worked = tree::total_worked(store, id, shell.now())?;
    writeln!(console.out(), "worked: {}", format_duration(worked))?;
    Ok(Flow::Continue)
}

/// `wreset id`: confirm, then clear worked time across the subtree.
pub fn reset(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let store = shell.store();
    let id = shell
        .context()
        .resolve_child(store, one_arg("wreset", args)?)?;
    let task = store.read(id)?;
    let question = format!("Clear worked time of task {} '{}'?", id, task.name);
    if !console.confirm(&question)? {
        return Err(TreeError::Cancelled);
    }
    let cleared = tree::reset_worked_time(shell.store(), id)?;
    tracing::info!(id, cleared, "reset worked time");
    Ok(Flow::Continue)
}
