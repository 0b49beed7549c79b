//! Suite tree: ordered composition of cases and child suites
//!
//! A suite runs its own cases first, then its children, checking the
//! result's stop signal before each unit of work. Children carrying a skip
//! reason are omitted from both execution and the declared test count.

use crate::case::TestCase;
use crate::result::TestResult;

/// Per-case fixture hook. Runs immediately before or after each case in the
/// suite that owns it, with the suite's context. Hooks must not fail.
pub type Hook<C> = Box<dyn Fn(&C)>;

/// A runnable node of the suite tree.
pub trait Suite {
    /// Descriptive name, if any.
    fn name(&self) -> Option<&str>;

    /// Non-empty when the whole suite (descendants included) is skipped.
    fn skip_reason(&self) -> Option<&str>;

    /// Declared number of tests: local cases plus the counts of children
    /// that are not themselves skipped.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every case and child in insertion order against `result`,
    /// stopping as soon as the result says to.
    fn run(&mut self, result: &mut dyn TestResult);
}

/// An ordered, named collection of test cases and nested suites.
///
/// The context value `C` replaces ad-hoc shared state: the suite owns it and
/// every case body and hook in the suite reads it. Suites with unrelated
/// context types still compose, since children are held behind the [`Suite`]
/// trait.
pub struct TestSuite<C = ()> {
    name: Option<String>,
    doc: Option<String>,
    skip: Option<String>,
    ctx: C,
    setup: Option<Hook<C>>,
    teardown: Option<Hook<C>>,
    cases: Vec<TestCase<C>>,
    children: Vec<Box<dyn Suite>>,
}

impl TestSuite<()> {
    /// Create an empty suite with no context.
    pub fn new() -> Self {
        Self::with_context(())
    }
}

impl Default for TestSuite<()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> TestSuite<C> {
    /// Create an empty suite owning `ctx`.
    pub fn with_context(ctx: C) -> Self {
        Self {
            name: None,
            doc: None,
            skip: None,
            ctx,
            setup: None,
            teardown: None,
            cases: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark the whole suite as skipped.
    pub fn with_skip(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }

    /// Install a hook that runs before each case in this suite.
    pub fn with_setup(mut self, hook: impl Fn(&C) + 'static) -> Self {
        self.setup = Some(Box::new(hook));
        self
    }

    /// Install a hook that runs after each case in this suite.
    pub fn with_teardown(mut self, hook: impl Fn(&C) + 'static) -> Self {
        self.teardown = Some(Box::new(hook));
        self
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    /// Append a case. Insertion order is execution order.
    pub fn add_test(&mut self, case: TestCase<C>) {
        self.cases.push(case);
    }

    /// Append a child suite. Children run after all local cases.
    ///
    /// The builder is responsible for keeping the composition a tree; a
    /// suite must not become its own ancestor.
    pub fn add_suite(&mut self, child: impl Suite + 'static) {
        self.children.push(Box::new(child));
    }

    /// Append an already-boxed child suite.
    pub fn add_boxed_suite(&mut self, child: Box<dyn Suite>) {
        self.children.push(child);
    }
}

impl<C> Suite for TestSuite<C> {
    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn skip_reason(&self) -> Option<&str> {
        self.skip.as_deref()
    }

    fn len(&self) -> usize {
        let nested: usize = self
            .children
            .iter()
            .filter(|child| child.skip_reason().is_none())
            .map(|child| child.len())
            .sum();
        self.cases.len() + nested
    }

    fn run(&mut self, result: &mut dyn TestResult) {
        let Self {
            ctx,
            setup,
            teardown,
            cases,
            children,
            ..
        } = self;
        for case in cases.iter_mut() {
            if result.should_stop() {
                break;
            }
            case.run(ctx, setup.as_ref(), teardown.as_ref(), result);
        }
        for child in children.iter_mut() {
            if result.should_stop() {
                break;
            }
            // TODO: record a skip outcome for skipped child suites
            if child.skip_reason().is_none() {
                child.run(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::TapResult;
    use crate::{tap_fail, tap_success};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn passing(name: &str) -> TestCase<()> {
        TestCase::new(name, |t, _: &()| {
            tap_success!(t, "ok");
            Ok(())
        })
    }

    fn failing(name: &str) -> TestCase<()> {
        TestCase::new(name, |t, _: &()| {
            tap_fail!(t, "boom");
            Ok(())
        })
    }

    fn run_suite<C>(suite: &mut TestSuite<C>, fail_fast: bool) -> TapResult<Vec<u8>> {
        let mut result = TapResult::new(fail_fast, Vec::new());
        suite.run(&mut result);
        result
    }

    #[test]
    fn empty_suite_has_len_zero() {
        let suite = TestSuite::new();
        assert_eq!(suite.len(), 0);
        assert!(suite.is_empty());
    }

    #[test]
    fn cases_run_in_insertion_order() {
        let mut suite = TestSuite::new();
        suite.add_test(passing("test_first"));
        suite.add_test(passing("test_second"));
        suite.add_test(passing("test_third"));

        let result = run_suite(&mut suite, false);
        let names: Vec<_> = result.passed().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["test_first", "test_second", "test_third"]);
    }

    #[test]
    fn children_run_after_local_cases() {
        let mut child = TestSuite::new();
        child.add_test(passing("test_nested"));

        let mut suite = TestSuite::new();
        suite.add_suite(child);
        suite.add_test(passing("test_local"));

        let result = run_suite(&mut suite, false);
        let names: Vec<_> = result.passed().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["test_local", "test_nested"]);
    }

    #[test]
    fn len_counts_cases_and_unskipped_children() {
        let mut inner = TestSuite::new();
        inner.add_test(passing("test_a"));
        inner.add_test(passing("test_b"));

        let mut suite = TestSuite::new();
        suite.add_test(passing("test_local"));
        suite.add_suite(inner);

        assert_eq!(suite.len(), 3);
    }

    #[test]
    fn skipped_child_contributes_zero_to_len() {
        let mut inner = TestSuite::new().with_skip("wrong platform");
        inner.add_test(passing("test_a"));
        inner.add_test(passing("test_b"));

        let mut suite = TestSuite::new();
        suite.add_test(passing("test_local"));
        suite.add_suite(inner);

        assert_eq!(suite.len(), 1);
    }

    #[test]
    fn skipped_child_is_silently_omitted() {
        let mut inner = TestSuite::new().with_skip("wrong platform");
        inner.add_test(passing("test_hidden"));

        let mut suite = TestSuite::new();
        suite.add_test(passing("test_local"));
        suite.add_suite(inner);

        let result = run_suite(&mut suite, false);
        assert_eq!(result.passed().len(), 1);
        // No skip outcome is recorded for the omitted child's cases.
        assert!(result.skipped().is_empty());
    }

    #[test]
    fn fail_fast_stops_remaining_cases_and_children() {
        let mut sibling = TestSuite::new();
        sibling.add_test(passing("test_never_reached"));

        let mut suite = TestSuite::new();
        suite.add_test(passing("test_before"));
        suite.add_test(failing("test_bad"));
        suite.add_test(passing("test_after"));
        suite.add_suite(sibling);

        let result = run_suite(&mut suite, true);
        assert_eq!(result.passed().len(), 1);
        assert_eq!(result.failed().len(), 1);
        // Neither the later local case nor the child suite ran, and the
        // unexecuted remainder is not reported as skipped.
        assert!(result.skipped().is_empty());
    }

    #[test]
    fn without_fail_fast_every_case_runs() {
        let mut suite = TestSuite::new();
        suite.add_test(failing("test_bad"));
        suite.add_test(passing("test_good"));

        let result = run_suite(&mut suite, false);
        assert_eq!(result.failed().len(), 1);
        assert_eq!(result.passed().len(), 1);
    }

    #[test]
    fn hooks_run_once_per_case() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let setup_log = Rc::clone(&log);
        let teardown_log = Rc::clone(&log);

        let mut suite = TestSuite::new()
            .with_setup(move |_| setup_log.borrow_mut().push("setup"))
            .with_teardown(move |_| teardown_log.borrow_mut().push("teardown"));
        suite.add_test(passing("test_one"));
        suite.add_test(passing("test_two"));

        run_suite(&mut suite, false);
        assert_eq!(
            *log.borrow(),
            vec!["setup", "teardown", "setup", "teardown"]
        );
    }

    #[test]
    fn context_is_shared_by_cases_and_hooks() {
        let mut suite = TestSuite::with_context(RefCell::new(0u32))
            .with_setup(|ctx: &RefCell<u32>| *ctx.borrow_mut() += 1);
        suite.add_test(TestCase::new("test_counts", |t, ctx: &RefCell<u32>| {
            crate::tap_assert!(t, *ctx.borrow() > 0, "setup ran first");
            Ok(())
        }));

        let result = run_suite(&mut suite, false);
        assert_eq!(result.passed().len(), 1);
    }

    #[test]
    fn suites_with_different_contexts_compose() {
        let mut numbered = TestSuite::with_context(7i64);
        numbered.add_test(TestCase::new("test_number", |t, ctx: &i64| {
            crate::tap_assert_eq!(t, *ctx, 7);
            Ok(())
        }));

        let mut labeled = TestSuite::with_context("label".to_string());
        labeled.add_test(TestCase::new("test_label", |t, ctx: &String| {
            crate::tap_assert_eq!(t, ctx.as_str(), "label");
            Ok(())
        }));

        let mut root = TestSuite::new();
        root.add_suite(numbered);
        root.add_suite(labeled);

        let result = run_suite(&mut root, false);
        assert_eq!(result.passed().len(), 2);
    }
}
