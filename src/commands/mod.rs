//! Command registry: every shell command with its parameters, help line and handler.

pub mod cost;
pub mod create;
pub mod delete;
pub mod edit;
pub mod init;
pub mod lifecycle;
pub mod navigate;
pub mod reparent;
pub mod work;

use std::collections::HashMap;
use std::io::Write;

use colored::Colorize;

use crate::error::{Result, TreeError};
use crate::shell::{Console, Flow, Shell};

pub type Handler = fn(&mut Shell, &mut dyn Console, &[&str]) -> Result<Flow>;

pub struct CommandSpec {
    pub name: &'static str,
    pub params: &'static str,
    pub about: &'static str,
    pub handler: Handler,
}

impl CommandSpec {
    pub fn usage(&self) -> String {
        if self.params.is_empty() {
            format!("usage: {}", self.name)
        } else {
            format!("usage: {} {}", self.name, self.params)
        }
    }
}

const fn cmd(
    name: &'static str,
    params: &'static str,
    about: &'static str,
    handler: Handler,
) -> CommandSpec {
    CommandSpec {
        name,
        params,
        about,
        handler,
    }
}

static COMMANDS: &[CommandSpec] = &[
    cmd("see", "[id]", "List subtasks", navigate::see),
    cmd("in", "id", "Make subtask the current task", navigate::enter),
    cmd("out", "", "Make parent the current task", navigate::leave),
    cmd("froot", "[id...]", "Go to root, then into each subtask in turn", navigate::from_root),
    cmd("todo", "", "Show the first pending task", navigate::todo),
    cmd("new", "name...", "Create new subtask", create::new),
    cmd("rm", "id", "Remove task and all its subtasks", delete::rm),
    cmd("progr", "id", "Set task state to IN PROGRESS", lifecycle::progr),
    cmd("done", "id", "Set task state to DONE", lifecycle::done),
    cmd("reset", "id", "Reset task and its subtasks to TODO", lifecycle::reset),
    cmd("edit", "id name...", "Rename task", edit::rename),
    cmd("descr", "[id]", "Write description in the editor", edit::describe),
    cmd("info", "[id]", "Show task details and description", edit::info),
    cmd("pull", "id", "Move subtask up next to the current task", reparent::pull),
    cmd("push", "id1 id2", "Move subtask id1 under subtask id2", reparent::push),
    cmd("up", "id", "Move subtask one place up", reparent::up),
    cmd("down", "id", "Move subtask one place down", reparent::down),
    cmd("sort", "", "Order subtasks by state", reparent::sort),
    cmd("eval", "[id] cost", "Estimate cost of a leaf task (0 clears)", cost::eval),
    cmd("cost", "[id]", "Show summed cost of leaf tasks", cost::cost),
    cmd("bwork", "id", "Begin a work session", work::begin),
    cmd("ework", "id", "End the work session", work::end),
    cmd("wtime", "[id]", "Show worked time", work::time),
    cmd("wreset", "id", "Clear worked time of task and subtasks", work::reset),
    cmd("exit", "", "Exit program", navigate::exit),
];

/// Lookup table over the built-in commands, built once per shell.
pub struct Registry {
    commands: &'static [CommandSpec],
    by_name: HashMap<&'static str, usize>,
}

impl Registry {
    pub fn builtin() -> Self {
        let by_name = COMMANDS
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name, i))
            .collect();
        Self {
            commands: COMMANDS,
            by_name,
        }
    }

    pub fn get(&self, name: &str) -> Option<&'static CommandSpec> {
        let commands = self.commands;
        self.by_name.get(name).map(|&i| &commands[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static CommandSpec> {
        self.commands.iter()
    }

    pub fn print_help(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", "Available commands:".bold())?;
        let width = self
            .iter()
            .map(|c| c.name.len() + c.params.len() + 1)
            .max()
            .unwrap_or(0);
        for spec in self.iter() {
            let signature = format!("{} {}", spec.name, spec.params);
            writeln!(out, "  {:width$}  {}", signature.trim_end(), spec.about)?;
        }
        writeln!(out)?;
        writeln!(out, "[id] is optional and defaults to the current task.")?;
        Ok(())
    }
}

/// Look up the usage line of a registered command for error messages.
pub(crate) fn usage(name: &str) -> TreeError {
    let message = COMMANDS
        .iter()
        .find(|spec| spec.name == name)
        .map(CommandSpec::usage)
        .unwrap_or_else(|| format!("usage: {name}"));
    TreeError::InvalidOperation(message)
}

pub(crate) fn no_args(name: &str, args: &[&str]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(usage(name))
    }
}

pub(crate) fn one_arg<'a>(name: &str, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(*arg),
        _ => Err(usage(name)),
    }
}

pub(crate) fn optional_arg<'a>(name: &str, args: &[&'a str]) -> Result<Option<&'a str>> {
    match args {
        [] => Ok(None),
        [arg] => Ok(Some(*arg)),
        _ => Err(usage(name)),
    }
}
