use std::io::Write;

use crate::commands::{optional_arg, usage};
use crate::editor;
use crate::error::Result;
use crate::output;
use crate::shell::{Console, Flow, Shell};
use crate::tree;

/// `edit id name...`
pub fn rename(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let [token, name @ ..] = args else {
        return Err(usage("edit"));
    };
    if name.is_empty() {
        return Err(usage("edit"));
    }
    let id = shell.context().resolve_child(shell.store(), token)?;
    let task = tree::rename(shell.store(), id, &name.join(" "))?;
    writeln!(console.out(), "Renamed [{}] {}", task.id, task.name)?;
    Ok(Flow::Continue)
}

/// `descr [id]`: round-trip the description through the external editor.
pub fn describe(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let token = optional_arg("descr", args)?;
    let store = shell.store();
    let id = shell.context().resolve_target(store, token)?;
    let before = store.read(id)?;

    let description = editor::edit_description(shell.editor(), before.description.as_deref())?;

    let mut task = store.read(id)?;
    task.description = description;
    store.write(&task)?;
    if task.description.is_some() {
        writeln!(console.out(), "Description of [{}] updated", id)?;
    } else {
        writeln!(console.out(), "Description of [{}] cleared", id)?;
    }
    Ok(Flow::Continue)
}

/// `info [id]`
pub fn info(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let token = optional_arg("info", args)?;
    let store = shell.store();
    let id = shell.context().resolve_target(store, token)?;
    let task = store.read(id)?;
    let cost = tree::cumulative_cost(store, id)?;
    let worked = tree::total_worked(store, id, shell.now())?;
    output::print_info(console.out(), &task, cost, worked)?;
    Ok(Flow::Continue)
}
