use std::io::Write;

use crate::commands::{no_args, one_arg, optional_arg};
use crate::context::parse_id;
use crate::error::Result;
use crate::output;
use crate::shell::{Console, Flow, Shell};
use crate::tree;

pub fn see(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let token = optional_arg("see", args)?;
    let store = shell.store();
    let target = shell.context().resolve_target(store, token)?;
    let task = store.read(target)?;
    let children = store.read_many(&task.children)?;
    output::print_children(console.out(), &children)?;
    Ok(Flow::Continue)
}

pub fn enter(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let id = shell.context().resolve_child(shell.store(), one_arg("in", args)?)?;
    let (store, ctx) = shell.store_and_context_mut();
    ctx.descend(store, id)?;
    Ok(Flow::Continue)
}

pub fn leave(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    no_args("out", args)?;
    let (store, ctx) = shell.store_and_context_mut();
    ctx.ascend(store)?;
    Ok(Flow::Continue)
}

/// `froot [id...]`: back to the root, then down the given path. A bad id leaves the
/// context where it was.
pub fn from_root(shell: &mut Shell, _console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    let path = args
        .iter()
        .map(|token| parse_id(token))
        .collect::<Result<Vec<_>>>()?;
    let (store, ctx) = shell.store_and_context_mut();
    ctx.reset_to_root(store, &path)?;
    Ok(Flow::Continue)
}

pub fn todo(shell: &mut Shell, console: &mut dyn Console, args: &[&str]) -> Result<Flow> {
    no_args("todo", args)?;
    match tree::first_pending(shell.store())? {
        Some(path) => output::print_pending(console.out(), &path)?,
        None => writeln!(console.out(), "Nothing pending.")?,
    }
    Ok(Flow::Continue)
}

pub fn exit(_shell: &mut Shell, _console: &mut dyn Console, _args: &[&str]) -> Result<Flow> {
    Ok(Flow::Exit)
}

#[cfg(test)]
mod tests {
    use crate::error::TreeError;
    use crate::model::ROOT_ID;
    use crate::shell::Flow;
    use crate::shell::testing::Harness;

    #[test]
    fn see_lists_children_of_current_or_target() {
        let mut h = Harness::new();
        h.ok("new Alpha");
        h.ok("new Beta");
        h.ok("in 1");
        h.ok("new Gamma");
        h.ok("out");

        let out = h.ok("see");
        assert!(out.contains("   1 [todo ] tree (1) Alpha"));
        assert!(out.contains("   2 [todo ] leaf (0) Beta"));
        let out = h.ok("see 1");
        assert!(out.contains("   3 [todo ] leaf (0) Gamma"));
        assert!(!out.contains("Beta"));
    }

    #[test]
    fn in_and_out_move_the_context() {
        let mut h = Harness::new();
        h.ok("new A");
        h.ok("in 1");
        assert_eq!(h.shell.context().path(), "root/A");
        h.ok("out");
        assert_eq!(h.shell.context().current_id(), ROOT_ID);
        assert!(matches!(h.fails("out"), TreeError::InvalidOperation(_)));
        assert!(matches!(h.fails("in"), TreeError::InvalidOperation(_)));
        assert!(matches!(h.fails("in a"), TreeError::InvalidId(_)));
    }

    #[test]
    fn froot_rolls_back_on_invalid_path() {
        let mut h = Harness::new();
        h.ok("new A");
        h.ok("in 1");
        h.ok("new B");
        h.ok("out");
        h.ok("new C");
        h.ok("in 3");

        assert!(matches!(h.fails("froot 1 3"), TreeError::NotChild(3, 1)));
        assert_eq!(h.shell.context().history_ids(), vec![ROOT_ID, 3]);
        assert!(matches!(h.fails("froot 1 x"), TreeError::InvalidId(_)));

        h.ok("froot 1 2");
        assert_eq!(h.shell.context().path(), "root/A/B");
        h.ok("froot");
        assert_eq!(h.shell.context().history_ids(), vec![ROOT_ID]);
    }

    #[test]
    fn todo_reports_first_pending_leaf() {
        let mut h = Harness::new();
        h.ok("new A");
        h.ok("in 1");
        h.ok("new B");
        h.ok("new C");
        h.ok("done 2");
        h.ok("out");

        let out = h.ok("todo");
        assert_eq!(out, "next: root [0] / A [1] / C [3]\n");

        h.ok("in 1");
        h.ok("done 3");
        assert_eq!(h.ok("todo"), "Nothing pending.\n");
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut h = Harness::new();
        let (result, _, _) = h.run_with("exit", "");
        assert_eq!(result.unwrap(), Flow::Exit);
    }
}
