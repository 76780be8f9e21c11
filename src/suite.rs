//! Depth-first traversal of a suite and its children.

use crate::fixture::{FixtureId, Tree};
use crate::hook::run_hook;
use crate::outcome::Flow;
use crate::report::Driver;
use crate::test::run_test;

/// Runs a suite: its suite-level hooks once, and around every test beneath
/// it the setup and teardown hooks of the whole ancestor chain.
///
/// Both the setup chain and the teardown chain run outermost suite first.
/// A skipped suite still reports its start and end, forwards the skip mark
/// to each child as it is reached, and runs none of its hooks.
pub(crate) fn run_suite(tree: &mut Tree, id: FixtureId, driver: &mut Driver<'_>) -> Flow {
    driver.suite_start(tree, id);

    if !tree.is_skipped(id) {
        for hook in tree.suite(id).suite_setups.clone() {
            if run_hook(tree, hook, driver).is_bail() {
                return Flow::Bail;
            }
        }
    }

    let chain = tree.ancestor_chain(id);
    for child in tree.suite(id).children.clone() {
        let is_suite = tree.nodes[child.0].is_suite();
        let skipped = tree.is_skipped(id);

        if !is_suite && !skipped {
            for &suite in &chain {
                for hook in tree.suite(suite).setups.clone() {
                    if run_hook(tree, hook, driver).is_bail() {
                        return Flow::Bail;
                    }
                }
            }
        }

        if skipped {
            tree.mark_skipped(child);
        }

        let flow = if is_suite {
            run_suite(tree, child, driver)
        } else {
            run_test(tree, child, driver)
        };
        if flow.is_bail() {
            return Flow::Bail;
        }

        if !is_suite && !skipped {
            for &suite in &chain {
                for hook in tree.suite(suite).teardowns.clone() {
                    if run_hook(tree, hook, driver).is_bail() {
                        return Flow::Bail;
                    }
                }
            }
        }
    }

    if !tree.is_skipped(id) {
        for hook in tree.suite(id).suite_teardowns.clone() {
            if run_hook(tree, hook, driver).is_bail() {
                return Flow::Bail;
            }
        }
    }

    driver.suite_end(tree, id);
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Registry, RegistryError};
    use crate::report::{HookDesc, Reporter, SuiteDesc, Summary, TestDesc};
    use crate::runner::RunOptions;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct History(Rc<RefCell<Vec<String>>>);

    impl History {
        fn mark(&self, entry: impl Into<String>) {
            self.0.borrow_mut().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.borrow().clone()
        }
    }

    struct EventReporter(History);

    impl Reporter for EventReporter {
        fn suite_start(&mut self, suite: &SuiteDesc<'_>, _: &Summary) {
            self.0.mark(format!("enter {}", suite.name()));
        }

        fn suite_end(&mut self, suite: &SuiteDesc<'_>, _: &Summary) {
            self.0.mark(format!("leave {}", suite.name()));
        }

        fn test_pass(&mut self, test: &TestDesc<'_>, _: &Summary) {
            self.0.mark(format!("pass {}", test.name()));
        }

        fn test_fail(&mut self, test: &TestDesc<'_>, _: &Summary) {
            self.0.mark(format!("fail {}", test.name()));
        }

        fn test_pending(&mut self, test: &TestDesc<'_>, _: &Summary) {
            self.0.mark(format!("pending {}", test.name()));
        }

        fn hook_fail(&mut self, hook: &HookDesc<'_>, _: &Summary) {
            self.0.mark(format!("hook_fail {}", hook.name()));
        }
    }

    fn run_with_history(
        options: RunOptions,
        build: impl FnOnce(&History, &mut Registry<'_>) -> Result<(), RegistryError>,
    ) -> (Vec<String>, Summary) {
        let history = History::default();
        let mut tree = Tree::new();
        let mut wrapped = HashSet::new();
        let root = tree.root();
        let mut registry = Registry::new(&mut tree, &mut wrapped, root);
        build(&history, &mut registry).unwrap();

        let mut reporter = EventReporter(history.clone());
        let mut driver = Driver::new(&mut reporter, options);
        let _ = run_suite(&mut tree, root, &mut driver);
        (history.entries(), driver.into_summary())
    }

    #[test]
    fn setup_and_teardown_chains_run_outermost_first() {
        let (history, summary) = run_with_history(RunOptions::default(), |h, r| {
            let (h1, h2, h3, h4) = (h.clone(), h.clone(), h.clone(), h.clone());
            let ht = h.clone();
            r.suite("outer", move |s| {
                s.setup(move |_cx| h1.mark("outer setup"))?;
                s.teardown(move |_cx| h2.mark("outer teardown"))?;
                s.suite("inner", move |s| {
                    s.setup(move |_cx| h3.mark("inner setup"))?;
                    s.teardown(move |_cx| h4.mark("inner teardown"))?;
                    s.test("probe", move |_cx| ht.mark("probe body"))?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(
            history,
            vec![
                "enter root",
                "enter outer",
                "enter inner",
                "outer setup",
                "inner setup",
                "probe body",
                "pass probe",
                "outer teardown",
                "inner teardown",
                "leave inner",
                "leave outer",
                "leave root",
            ]
        );
        assert!(summary.is_passed());
    }

    #[test]
    fn suite_hooks_run_once_around_all_children() {
        let (history, _) = run_with_history(RunOptions::default(), |h, r| {
            let (hb, ha) = (h.clone(), h.clone());
            let (t1, t2) = (h.clone(), h.clone());
            r.suite("wrapped", move |s| {
                s.suite_setup(move |_cx| hb.mark("open"))?;
                s.suite_teardown(move |_cx| ha.mark("close"))?;
                s.test("first", move |_cx| t1.mark("first body"))?;
                s.test("second", move |_cx| t2.mark("second body"))?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(
            history,
            vec![
                "enter root",
                "enter wrapped",
                "open",
                "first body",
                "pass first",
                "second body",
                "pass second",
                "close",
                "leave wrapped",
                "leave root",
            ]
        );
    }

    #[test]
    fn root_hooks_wrap_the_whole_run() {
        let (history, _) = run_with_history(RunOptions::default(), |h, r| {
            let (hb, ha, hs, htd) = (h.clone(), h.clone(), h.clone(), h.clone());
            let ht = h.clone();
            r.suite_setup(move |_cx| hb.mark("root open"))?;
            r.suite_teardown(move |_cx| ha.mark("root close"))?;
            r.setup(move |_cx| hs.mark("root setup"))?;
            r.teardown(move |_cx| htd.mark("root teardown"))?;
            r.suite("leafy", move |s| {
                s.test("leaf", move |_cx| ht.mark("leaf body"))?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(
            history,
            vec![
                "enter root",
                "root open",
                "enter leafy",
                "root setup",
                "leaf body",
                "pass leaf",
                "root teardown",
                "leave leafy",
                "root close",
                "leave root",
            ]
        );
    }

    #[test]
    fn skip_propagates_to_descendants() {
        let (history, summary) = run_with_history(RunOptions::default(), |h, r| {
            let hs = h.clone();
            let hb = h.clone();
            let outer = r.suite("quiet", move |s| {
                s.setup(move |_cx| hs.mark("never setup"))?;
                s.test("one", move |_cx| hb.mark("never body"))?;
                s.suite("deeper", |s| {
                    s.test("two", |_cx| {})?;
                    Ok(())
                })?;
                Ok(())
            })?;
            r.skip(outer);
            Ok(())
        });

        assert_eq!(
            history,
            vec![
                "enter root",
                "enter quiet",
                "pending one",
                "enter deeper",
                "pending two",
                "leave deeper",
                "leave quiet",
                "leave root",
            ]
        );
        assert_eq!(summary.pending(), 2);
        assert_eq!(summary.tests(), 2);
        assert!(summary.is_passed());
    }

    #[test]
    fn a_skipped_hook_runs_nothing_but_stays_silent() {
        let (history, summary) = run_with_history(RunOptions::default(), |h, r| {
            let hs = h.clone();
            let hb = h.clone();
            let noisy = r.setup(move |_cx| hs.mark("loud setup"))?;
            r.test("works", move |_cx| hb.mark("body"))?;
            r.skip(noisy);
            Ok(())
        });

        assert_eq!(history, vec!["enter root", "body", "pass works", "leave root"]);
        assert!(summary.is_passed());
    }

    #[test]
    fn hook_failure_always_bails() {
        let (history, summary) = run_with_history(RunOptions::default(), |h, r| {
            let hb = h.clone();
            r.suite("fragile", move |s| {
                s.setup(|_cx| panic!("setup broke"))?;
                s.test("unreached", move |_cx| hb.mark("never"))?;
                s.test("also unreached", |_cx| {})?;
                Ok(())
            })?;
            Ok(())
        });

        assert_eq!(history, vec!["enter root", "enter fragile", "hook_fail setup"]);
        assert_eq!(summary.num_failures(), 1);
        assert_eq!(summary.tests(), 0);
        assert_eq!(summary.open_suites(), 1);
    }

    #[test]
    fn teardown_failure_poisons_the_rest() {
        let (history, summary) = run_with_history(RunOptions::default(), |h, r| {
            let hb = h.clone();
            r.teardown(|_cx| panic!("cleanup broke"))?;
            r.test("first", move |_cx| hb.mark("first body"))?;
            r.test("second", |_cx| {})?;
            Ok(())
        });

        assert_eq!(
            history,
            vec!["enter root", "first body", "pass first", "hook_fail teardown"]
        );
        assert_eq!(summary.passes(), 1);
        assert_eq!(summary.num_failures(), 1);
    }

    #[test]
    fn test_failure_continues_by_default() {
        let (history, summary) = run_with_history(RunOptions::default(), |h, r| {
            let h2 = h.clone();
            r.test("breaks", |_cx| panic!("nope"))?;
            r.test("still runs", move |_cx| h2.mark("second body"))?;
            Ok(())
        });

        assert_eq!(
            history,
            vec![
                "enter root",
                "fail breaks",
                "second body",
                "pass still runs",
                "leave root",
            ]
        );
        assert_eq!(summary.num_failures(), 1);
        assert_eq!(summary.passes(), 1);
    }

    #[test]
    fn test_failure_bails_when_enabled() {
        let (history, summary) = run_with_history(RunOptions { bail: true }, |h, r| {
            let h2 = h.clone();
            r.test("breaks", |_cx| panic!("nope"))?;
            r.test("never runs", move |_cx| h2.mark("second body"))?;
            Ok(())
        });

        assert_eq!(history, vec!["enter root", "fail breaks"]);
        assert_eq!(summary.tests(), 1);
        assert_eq!(summary.num_failures(), 1);
    }

    #[test]
    fn empty_suites_still_report_their_edges() {
        let (history, summary) = run_with_history(RunOptions::default(), |_h, r| {
            r.suite("hollow", |_s| Ok(()))?;
            Ok(())
        });

        assert_eq!(
            history,
            vec!["enter root", "enter hollow", "leave hollow", "leave root"]
        );
        assert_eq!(summary.suites(), 1);
        assert_eq!(summary.tests(), 0);
        assert!(summary.is_passed());
    }
}
