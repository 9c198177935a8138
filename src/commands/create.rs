use std::io::Write;

use crate::commands::usage;
use crate::error::Result;
use crate::shell::{Console, Flow, Shell};
use crate::tree;

/// `new name...`: append a leaf to the current task and re-derive the ancestors.
pub fn new(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let name = args.join(" ");
    if name.trim().is_empty() {
        return Err(usage("new"));
    }
    let parent = shell.context().current_id();
    let task = tree::add_child(shell.store(), parent, &name, shell.now())?;
    shell.propagate()?;
    writeln!(console.out(), "Created [{}] {}", task.id, task.name)?;
    Ok(Flow::Continue)
}
