use std::io::Write;

use crate::commands::{optional_arg, usage};
use crate::error::{Result, TreeError};
use crate::output;
use crate::shell::{Console, Flow, Shell};
use crate::tree;

fn parse_cost(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| TreeError::invalid(format!("invalid cost '{token}'")))
}

/// `eval [id] cost`: estimate a leaf; zero clears the estimate.
pub fn eval(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let (token, cost) = match *args {
        [cost] => (None, cost),
        [id, cost] => (Some(id), cost),
        _ => return Err(usage("eval")),
    };
    let cost = parse_cost(cost)?;
    let store = shell.store();
    let id = shell.context().resolve_target(store, token)?;
    let task = tree::set_estimated_cost(store, id, cost)?;
    match task.estimated_cost {
        Some(cost) => writeln!(
            console.out(),
            "[{}] {} costs {}",
            task.id,
            task.name,
            output::format_cost(cost)
        )?,
        None => writeln!(console.out(), "[{}] {} is not estimated", task.id, task.name)?,
    }
    Ok(Flow::Continue)
}

/// `cost [id]`: summed estimate of all leaves below the target.
pub fn cost(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let token = optional_arg("cost", args)?;
    let store = shell.store();
    let id = shell.context().resolve_target(store, token)?;
    let total = tree::cumulative_cost(store, id)?;
    writeln!(console.out(), "cost: {}", output::format_cost(total))?;
    Ok(Flow::Continue)
}
