use std::io::Write;

use colored::{ColoredString, Colorize};

use crate::error::Result;
use crate::model::{State, Task};

pub fn state_marker(state: State) -> ColoredString {
    match state {
        State::Todo => "[todo ]".yellow(),
        State::InProgress => "[progr]".cyan(),
        State::Done => "[done ]".green(),
    }
}

fn kind_marker(task: &Task) -> &'static str {
    if task.is_leaf() { "leaf" } else { "tree" }
}

/// `H:MM:SS`, hours unbounded.
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}:{minutes:02}:{secs:02}")
}

pub fn format_cost(cost: f64) -> String {
    if cost.fract() == 0.0 {
        format!("{cost:.0}")
    } else {
        format!("{cost}")
    }
}

/// One line per child: id, state, leaf/tree, number of subtasks, name.
pub fn print_children(out: &mut dyn Write, children: &[Task]) -> Result<()> {
    if children.is_empty() {
        writeln!(out, "{}", "(no subtasks)".dimmed())?;
        return Ok(());
    }
    for child in children {
        writeln!(
            out,
            "{:>4} {} {} ({}) {}",
            child.id,
            state_marker(child.state),
            kind_marker(child),
            child.children.len(),
            child.name.bold()
        )?;
    }
    Ok(())
}

pub fn print_info(out: &mut dyn Write, task: &Task, cost: f64, worked: u64) -> Result<()> {
    writeln!(
        out,
        "[{}] {} {}",
        task.id,
        task.name.bold(),
        state_marker(task.state)
    )?;
    writeln!(
        out,
        "  subtasks: {} | cost: {} | worked: {}",
        task.children.len(),
        format_cost(cost),
        format_duration(worked)
    )?;
    if task.has_open_session() {
        writeln!(out, "  {}", "work session in progress".cyan())?;
    }
    match task.description.as_deref() {
        Some(desc) => {
            writeln!(out)?;
            write!(out, "{desc}")?;
            if !desc.ends_with('\n') {
                writeln!(out)?;
            }
        }
        None => writeln!(out, "  {}", "(no description)".dimmed())?,
    }
    Ok(())
}

/// Path from the root to the first pending task, then its description.
pub fn print_pending(out: &mut dyn Write, path: &[Task]) -> Result<()> {
    let trail = path
        .iter()
        .map(|t| format!("{} [{}]", t.name, t.id))
        .collect::<Vec<_>>()
        .join(" / ");
    writeln!(out, "{} {}", "next:".green().bold(), trail)?;
    if let Some(desc) = path.last().and_then(|t| t.description.as_deref()) {
        write!(out, "{desc}")?;
        if !desc.ends_with('\n') {
            writeln!(out)?;
        }
    }
    Ok(())
}
