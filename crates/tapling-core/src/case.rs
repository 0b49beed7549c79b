//! Test cases and the assertion trap
//!
//! A test body communicates its outcome exclusively through the
//! [`CaseHandle`] it receives: every check records what was evaluated, and a
//! failing check raises [`AssertionFailure`], which the assertion macros
//! propagate with `?` so the rest of the body never runs. The case-execution
//! frame catches the signal and classifies the outcome from the case's
//! metadata: a plain case fails, a todo case records an expected failure, and
//! a todo body that runs to completion records an unexpected success.

use crate::result::{CaseReport, TestResult};
use crate::suite::Hook;

/// Signal raised by a failing check.
///
/// Carries no payload: the details of the failed check are already recorded
/// on the case, and whether the failure was expected is decided where the
/// signal is caught. It cannot be constructed outside the harness.
#[derive(Debug)]
pub struct AssertionFailure(pub(crate) ());

/// What a test body returns. `Err` means a check failed and the body was
/// abandoned at that point.
pub type Check = Result<(), AssertionFailure>;

/// A test body: receives the case handle and the owning suite's context.
pub type TestBody<C> = Box<dyn Fn(&mut CaseHandle<'_>, &C) -> Check>;

/// Record of the most recent check evaluated in a running case.
///
/// Valid only during a single execution of the case; written on every check,
/// pass or fail, so a success message is available for reporting.
#[derive(Debug, Clone, Default)]
pub(crate) struct AssertRecord {
    pub(crate) condition: Option<&'static str>,
    pub(crate) message: Option<String>,
    pub(crate) file: Option<&'static str>,
    pub(crate) line: u32,
}

/// Handle given to a running test body.
///
/// The only way for a body to produce an outcome. Use the assertion macros
/// (`tap_assert_eq!` and friends) rather than calling [`check`](Self::check)
/// directly; they fill in the condition text and source location.
pub struct CaseHandle<'a> {
    record: &'a mut AssertRecord,
}

impl CaseHandle<'_> {
    /// Record a check and raise [`AssertionFailure`] if it did not pass.
    pub fn check(
        &mut self,
        pass: bool,
        condition: &'static str,
        message: Option<String>,
        file: &'static str,
        line: u32,
    ) -> Check {
        self.record.condition = Some(condition);
        self.record.message = message;
        self.record.file = Some(file);
        self.record.line = line;
        if pass {
            Ok(())
        } else {
            Err(AssertionFailure(()))
        }
    }
}

/// The smallest executable unit of testing.
///
/// Metadata is fixed at construction; the assertion record is transient and
/// only meaningful while [`run`](Self::run) is on the stack.
pub struct TestCase<C> {
    name: String,
    skip: Option<String>,
    todo: Option<String>,
    body: TestBody<C>,
    last: AssertRecord,
}

impl<C> TestCase<C> {
    /// Create a test case that runs `body`.
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&mut CaseHandle<'_>, &C) -> Check + 'static,
    ) -> Self {
        Self::from_parts(name.into(), None, None, Box::new(body))
    }

    /// Create a test case that is never executed and reports as skipped.
    pub fn skipped(
        name: impl Into<String>,
        reason: impl Into<String>,
        body: impl Fn(&mut CaseHandle<'_>, &C) -> Check + 'static,
    ) -> Self {
        Self::from_parts(name.into(), Some(reason.into()), None, Box::new(body))
    }

    /// Create a test case that is expected to fail for the given reason.
    pub fn todo(
        name: impl Into<String>,
        reason: impl Into<String>,
        body: impl Fn(&mut CaseHandle<'_>, &C) -> Check + 'static,
    ) -> Self {
        Self::from_parts(name.into(), None, Some(reason.into()), Box::new(body))
    }

    pub(crate) fn from_parts(
        name: String,
        skip: Option<String>,
        todo: Option<String>,
        body: TestBody<C>,
    ) -> Self {
        Self {
            name,
            skip,
            todo,
            body,
            last: AssertRecord::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip.as_deref()
    }

    pub fn todo_reason(&self) -> Option<&str> {
        self.todo.as_deref()
    }

    /// Execute the case against `result`.
    ///
    /// A skipped case is recorded without invoking the body or the hooks.
    /// Otherwise setup runs, the body runs inside the assertion trap, the
    /// outcome is classified and recorded, and teardown runs. Teardown runs
    /// exactly when setup ran.
    pub(crate) fn run(
        &mut self,
        ctx: &C,
        setup: Option<&Hook<C>>,
        teardown: Option<&Hook<C>>,
        result: &mut dyn TestResult,
    ) {
        result.start_test(&self.name);
        if self.skip.is_some() {
            result.add_skip(self.report());
            result.stop_test(&self.name);
            return;
        }
        if let Some(setup) = setup {
            setup(ctx);
        }
        self.last = AssertRecord::default();
        let outcome = {
            let mut handle = CaseHandle {
                record: &mut self.last,
            };
            (self.body)(&mut handle, ctx)
        };
        match (outcome, self.todo.is_some()) {
            (Ok(()), false) => result.add_success(self.report()),
            (Ok(()), true) => result.add_unexpected_success(self.report()),
            (Err(AssertionFailure(())), false) => result.add_failure(self.report()),
            (Err(AssertionFailure(())), true) => result.add_expected_failure(self.report()),
        }
        if let Some(teardown) = teardown {
            teardown(ctx);
        }
        result.stop_test(&self.name);
    }

    fn report(&self) -> CaseReport {
        CaseReport {
            name: self.name.clone(),
            skip: self.skip.clone(),
            todo: self.todo.clone(),
            condition: self.last.condition,
            message: self.last.message.clone(),
            file: self.last.file,
            line: self.last.line,
        }
    }
}
