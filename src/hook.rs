//! Running a single hook.

use crate::fixture::{Context, FixtureId, NodeKind, Tree};
use crate::outcome::{Failure, Flow};
use crate::report::Driver;
use maybe_unwind::maybe_unwind;
use std::panic::AssertUnwindSafe;

/// Runs one hook unless it was skipped. A skipped hook is silent and does
/// not appear in the report at all.
///
/// Any panic in a hook body poisons the remainder of the run, so the
/// caller always receives [`Flow::Bail`] on failure.
pub(crate) fn run_hook(tree: &mut Tree, id: FixtureId, driver: &mut Driver<'_>) -> Flow {
    if tree.is_skipped(id) {
        return Flow::Continue;
    }

    let result = {
        let node = &mut tree.nodes[id.0];
        let data = match &mut node.kind {
            NodeKind::Hook(data) => data,
            _ => unreachable!(),
        };
        let mut cx = Context::new(&node.name, node.skipped);
        let body = &mut data.body;
        maybe_unwind(AssertUnwindSafe(|| body(&mut cx)))
    };

    match result {
        Ok(()) => {
            driver.hook_pass(tree, id);
            Flow::Continue
        }
        Err(unwind) => {
            driver.hook_fail(tree, id, Failure::Panicked(unwind));
            Flow::Bail
        }
    }
}
