//! Registration of suites, tests, and hooks.

use crate::fixture::{Context, FixtureId, HookKind, TestBody, Tree};
use crate::test::{Captured, Expected};
use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt::Debug;
use thiserror::Error;

/// Errors detected while registering fixtures.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// The same callable was registered as a runnable twice.
    #[error("the callable is already registered as a runnable")]
    AlreadyRunnable,
}

/// Builder for registering fixtures under one suite.
///
/// A registry scoped to the root suite is offered by the methods on
/// [`Runner`](crate::Runner); [`Registry::suite`] hands its body a
/// registry scoped to the freshly created suite.
pub struct Registry<'a> {
    tree: &'a mut Tree,
    wrapped: &'a mut HashSet<TypeId>,
    suite: FixtureId,
}

impl<'a> Registry<'a> {
    pub(crate) fn new(
        tree: &'a mut Tree,
        wrapped: &'a mut HashSet<TypeId>,
        suite: FixtureId,
    ) -> Self {
        Self {
            tree,
            wrapped,
            suite,
        }
    }

    /// Remembers the callable's type so a second registration of the same
    /// function or closure is rejected.
    ///
    /// Each closure literal has its own type, so two closures produced by
    /// the same `fn` or the same loop body do not collide.
    fn wrap<F: 'static>(&mut self) -> Result<(), RegistryError> {
        if self.wrapped.insert(TypeId::of::<F>()) {
            Ok(())
        } else {
            Err(RegistryError::AlreadyRunnable)
        }
    }

    /// Registers a nested suite and immediately invokes `body` with a
    /// registry scoped to it.
    pub fn suite<F>(&mut self, name: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError> + 'static,
    {
        self.wrap::<F>()?;
        let id = self.tree.new_suite(self.suite, name);
        let mut registry = Registry {
            tree: &mut *self.tree,
            wrapped: &mut *self.wrapped,
            suite: id,
        };
        body(&mut registry)?;
        Ok(id)
    }

    /// Registers a test under the current suite.
    ///
    /// The value returned by `body` is kept for the `returns` family of
    /// expectations; tests without one usually just return `()`.
    pub fn test<F, R>(&mut self, desc: &str, mut body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) -> R + 'static,
        R: Debug + 'static,
    {
        self.wrap::<F>()?;
        let body: TestBody = Box::new(move |cx: &mut Context<'_>| Captured::of(body(cx)));
        Ok(self.tree.new_test(self.suite, desc, body))
    }

    fn hook<F>(&mut self, kind: HookKind, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.wrap::<F>()?;
        Ok(self.tree.new_hook(self.suite, kind, Box::new(body)))
    }

    /// Registers a hook that runs once, before the suite's first child.
    pub fn suite_setup<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.hook(HookKind::SuiteSetup, body)
    }

    /// Registers a hook that runs once, after the suite's last child.
    pub fn suite_teardown<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.hook(HookKind::SuiteTeardown, body)
    }

    /// Registers a hook that runs before every test beneath the suite,
    /// including tests of nested suites.
    pub fn setup<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.hook(HookKind::Setup, body)
    }

    /// Registers a hook that runs after every test beneath the suite,
    /// including tests of nested suites.
    pub fn teardown<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.hook(HookKind::Teardown, body)
    }

    /// Marks a fixture as skipped.
    ///
    /// Skipping a suite propagates to every fixture beneath it once the
    /// runner reaches the suite. The mark cannot be removed.
    pub fn skip(&mut self, id: FixtureId) {
        self.tree.mark_skipped(id);
    }

    /// Marks a fixture as skipped when `condition` holds.
    pub fn skip_if(&mut self, id: FixtureId, condition: bool) {
        if condition {
            self.tree.mark_skipped(id);
        }
    }

    /// Expects the test to panic with a message containing `pattern`.
    ///
    /// Attached to anything other than a test this does nothing.
    pub fn raises(&mut self, id: FixtureId, pattern: impl Into<String>) {
        self.tree.set_raises(id, pattern.into());
    }

    /// Expects the test to return `value`.
    ///
    /// The comparison happens after type erasure. A body returning a
    /// value of a different type fails the expectation at run time
    /// instead of being rejected here.
    pub fn returns<T>(&mut self, id: FixtureId, value: T)
    where
        T: PartialEq + Debug + 'static,
    {
        let repr = format!("{:?}", value);
        let matches: Box<dyn Fn(&dyn Any) -> bool> = Box::new(move |actual| {
            actual
                .downcast_ref::<T>()
                .map_or(false, |actual| *actual == value)
        });
        self.tree.set_returns(id, Expected::Exact { repr, matches });
    }

    /// Expects the test to return an `f64` within `tolerance` of `value`.
    pub fn returns_approx(&mut self, id: FixtureId, value: f64, tolerance: f64) {
        self.tree.set_returns(id, Expected::Approx { value, tolerance });
    }

    /// Alias for [`suite`](Registry::suite).
    #[inline]
    pub fn describe<F>(&mut self, name: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnOnce(&mut Registry<'_>) -> Result<(), RegistryError> + 'static,
    {
        self.suite(name, body)
    }

    /// Alias for [`test`](Registry::test).
    #[inline]
    pub fn it<F, R>(&mut self, desc: &str, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) -> R + 'static,
        R: Debug + 'static,
    {
        self.test(desc, body)
    }

    /// Alias for [`suite_setup`](Registry::suite_setup).
    #[inline]
    pub fn before<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.suite_setup(body)
    }

    /// Alias for [`suite_teardown`](Registry::suite_teardown).
    #[inline]
    pub fn after<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.suite_teardown(body)
    }

    /// Alias for [`setup`](Registry::setup).
    #[inline]
    pub fn before_each<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.setup(body)
    }

    /// Alias for [`teardown`](Registry::teardown).
    #[inline]
    pub fn after_each<F>(&mut self, body: F) -> Result<FixtureId, RegistryError>
    where
        F: FnMut(&mut Context<'_>) + 'static,
    {
        self.teardown(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::Tree;

    fn noop(_: &mut Context<'_>) {}

    fn with_registry<T>(f: impl FnOnce(&mut Registry<'_>) -> T) -> T {
        let mut tree = Tree::new();
        let mut wrapped = HashSet::new();
        let root = tree.root();
        let mut registry = Registry::new(&mut tree, &mut wrapped, root);
        f(&mut registry)
    }

    #[test]
    fn a_function_registers_once() {
        with_registry(|r| {
            assert!(r.setup(noop).is_ok());
            assert_eq!(r.teardown(noop).unwrap_err(), RegistryError::AlreadyRunnable);
        });
    }

    #[test]
    fn a_copied_closure_registers_once() {
        with_registry(|r| {
            let body = |_cx: &mut Context<'_>| {};
            assert!(r.setup(body).is_ok());
            assert_eq!(r.setup(body).unwrap_err(), RegistryError::AlreadyRunnable);
        });
    }

    #[test]
    fn distinct_closures_do_not_collide() {
        with_registry(|r| {
            assert!(r.test("one", |_cx| {}).is_ok());
            assert!(r.test("two", |_cx| {}).is_ok());
        });
    }

    #[test]
    fn suite_bodies_count_as_runnables() {
        fn empty_suite(_: &mut Registry<'_>) -> Result<(), RegistryError> {
            Ok(())
        }
        with_registry(|r| {
            assert!(r.suite("first", empty_suite).is_ok());
            assert_eq!(
                r.suite("second", empty_suite).unwrap_err(),
                RegistryError::AlreadyRunnable
            );
        });
    }

    #[test]
    fn registration_errors_surface_from_nested_bodies() {
        fn dup(_: &mut Context<'_>) {}
        with_registry(|r| {
            let result = r.suite("broken", |s| {
                s.setup(dup)?;
                s.teardown(dup)?;
                Ok(())
            });
            assert_eq!(result.unwrap_err(), RegistryError::AlreadyRunnable);
        });
    }

    #[test]
    fn nested_registration_targets_the_inner_suite() {
        let mut tree = Tree::new();
        let mut wrapped = HashSet::new();
        let root = tree.root();
        let mut registry = Registry::new(&mut tree, &mut wrapped, root);
        let outer = registry
            .suite("outer", |s| {
                s.test("inner test", |_cx| {})?;
                s.setup(|_cx| {})?;
                Ok(())
            })
            .unwrap();

        assert_eq!(tree.suite(root).children, vec![outer]);
        assert_eq!(tree.suite(outer).children.len(), 1);
        assert_eq!(tree.suite(outer).setups.len(), 1);
    }

    #[test]
    fn skip_if_respects_the_condition() {
        let mut tree = Tree::new();
        let mut wrapped = HashSet::new();
        let root = tree.root();
        let mut registry = Registry::new(&mut tree, &mut wrapped, root);
        let a = registry.test("kept", |_cx| {}).unwrap();
        let b = registry.test("dropped", |_cx| {}).unwrap();
        registry.skip_if(a, false);
        registry.skip_if(b, true);

        assert!(!tree.is_skipped(a));
        assert!(tree.is_skipped(b));
    }

    #[test]
    fn aliases_delegate_to_their_primaries() {
        let mut tree = Tree::new();
        let mut wrapped = HashSet::new();
        let root = tree.root();
        let mut registry = Registry::new(&mut tree, &mut wrapped, root);
        let greetings = registry
            .describe("greetings", |s| {
                s.before(|_cx| {})?;
                s.before_each(|_cx| {})?;
                s.it("waves", |_cx| {})?;
                s.after_each(|_cx| {})?;
                s.after(|_cx| {})?;
                Ok(())
            })
            .unwrap();

        let suite = tree.suite(greetings);
        assert_eq!(suite.suite_setups.len(), 1);
        assert_eq!(suite.setups.len(), 1);
        assert_eq!(suite.children.len(), 1);
        assert_eq!(suite.teardowns.len(), 1);
        assert_eq!(suite.suite_teardowns.len(), 1);
    }
}
