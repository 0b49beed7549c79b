//! Runner: drives one suite against one result
//!
//! The plan line always comes first and states the count declared before
//! execution begins; TAP consumers read it up front to know how many outcome
//! lines to expect.

use crate::loader::TestLoader;
use crate::result::{TestResult, Verdict};
use crate::suite::Suite;

/// Runs a suite tree against the single result it owns.
pub struct TestRunner<R: TestResult> {
    result: R,
}

impl<R: TestResult> TestRunner<R> {
    pub fn new(result: R) -> Self {
        Self { result }
    }

    /// Run `suite` and return the verdict.
    ///
    /// A root suite flagged as skipped produces only the `1..0 # SKIP` plan
    /// line; no case outcome is recorded.
    pub fn run(&mut self, suite: &mut dyn Suite) -> Verdict {
        if let Some(reason) = suite.skip_reason().map(str::to_owned) {
            self.result.plan_skipped(&reason);
        } else {
            self.result.plan(suite.len());
            self.result.start_run();
            suite.run(&mut self.result);
            self.result.stop_run();
        }
        self.result.verdict()
    }

    pub fn result(&self) -> &R {
        &self.result
    }

    pub fn into_result(self) -> R {
        self.result
    }
}

/// Load the tests and run them.
///
/// Returns a process exit status: the verdict's code, or 1 when the loader
/// produced no suite at all.
pub fn run_tests<R: TestResult>(
    runner: &mut TestRunner<R>,
    loader: &mut dyn TestLoader,
    args: &[String],
) -> i32 {
    match loader.load_tests(args) {
        Some(mut suite) => runner.run(suite.as_mut()).exit_code(),
        None => 1,
    }
}
