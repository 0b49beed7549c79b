//! Tapling - a minimal TAP-emitting unit-test harness
//!
//! The harness is built from small pieces wired together by a runner:
//! - [`TestCase`] wraps a user function and classifies its outcome through
//!   the assertion trap in [`case`]
//! - [`TestSuite`] composes cases and child suites into an ordered tree
//! - [`TapResult`] records outcomes and streams them as TAP lines
//! - [`TestRunner`] drives one suite against one result and yields a
//!   [`Verdict`] suitable as a process exit status
//! - [`TestLoader`] implementations supply the suite to run, either from
//!   dynamic test libraries or from a single registered function
//!
//! # Example
//!
//! ```
//! use tapling_core::{tap_success, TapResult, TestCase, TestRunner, TestSuite};
//!
//! let mut suite = TestSuite::new();
//! suite.add_test(TestCase::new("test_hello", |t, _: &()| {
//!     tap_success!(t, "hello world");
//!     Ok(())
//! }));
//!
//! let mut runner = TestRunner::new(TapResult::new(false, Vec::new()));
//! let verdict = runner.run(&mut suite);
//! assert_eq!(verdict.exit_code(), 0);
//! ```

/// Harness version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod case;
pub mod loader;
pub mod result;
pub mod runner;
pub mod suite;

mod macros;

pub use case::{AssertionFailure, CaseHandle, Check, TestCase};
pub use loader::{FnLoader, LibraryLoader, LoadError, LoadSuiteFn, TestLoader, LOAD_SUITE_SYMBOL};
pub use result::{CaseReport, TapResult, TestResult, Verdict};
pub use runner::{run_tests, TestRunner};
pub use suite::{Hook, Suite, TestSuite};
