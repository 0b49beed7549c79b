//! Result recording and TAP stream emission
//!
//! Outcomes are streamed the moment they are recorded, so partial output
//! survives an interrupted run. Emission is best effort: a broken stream
//! never disturbs recording or the verdict.

use std::io::Write;

/// Owned snapshot of a case's reportable state, taken when its outcome is
/// recorded. The result keeps these in its buckets instead of borrowing the
/// cases themselves.
#[derive(Debug, Clone, Default)]
pub struct CaseReport {
    /// Case name, stable across the run.
    pub name: String,
    /// Skip reason, when the case was skipped.
    pub skip: Option<String>,
    /// Todo reason, when the case was marked as expected to fail.
    pub todo: Option<String>,
    /// Condition text of the last check evaluated.
    pub condition: Option<&'static str>,
    /// Message of the last check evaluated.
    pub message: Option<String>,
    /// Source file of the last check evaluated.
    pub file: Option<&'static str>,
    /// Source line of the last check evaluated.
    pub line: u32,
}

/// Final classification of a run, mapped to a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every executed test passed, or none existed. Exit code 0.
    Success,
    /// At least one failure. Exit code 1.
    Failure,
    /// Nothing passed and at least one test was skipped. Exit code 77, the
    /// conventional "skip this whole test" signal for harness integration.
    AllSkipped,
}

impl Verdict {
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Success => 0,
            Verdict::Failure => 1,
            Verdict::AllSkipped => 77,
        }
    }
}

/// Sink for test outcomes.
///
/// The runner and the suite tree drive exactly one of these per run. The
/// lifecycle hooks default to no-ops; implementations decide what recording
/// an outcome means.
pub trait TestResult {
    /// True once no further cases anywhere in the tree should execute.
    fn should_stop(&self) -> bool;

    /// Announce the declared test count. Called once, before any outcome.
    fn plan(&mut self, count: usize);

    /// Announce that the whole run is skipped. Called instead of
    /// [`plan`](Self::plan) when the root suite carries a skip reason.
    fn plan_skipped(&mut self, reason: &str);

    /// Executed before a run.
    fn start_run(&mut self) {}

    /// Executed after a run.
    fn stop_run(&mut self) {}

    /// Executed before each test.
    fn start_test(&mut self, _name: &str) {}

    /// Executed after each test.
    fn stop_test(&mut self, _name: &str) {}

    fn add_skip(&mut self, report: CaseReport);
    fn add_success(&mut self, report: CaseReport);
    fn add_unexpected_success(&mut self, report: CaseReport);
    fn add_failure(&mut self, report: CaseReport);
    fn add_expected_failure(&mut self, report: CaseReport);

    /// Compute the final verdict. Meaningful once the run is over.
    fn verdict(&self) -> Verdict;
}

/// Streaming [TAP](http://testanything.org/tap-specification.html) result.
///
/// Keeps one ordered bucket per outcome kind and writes the corresponding
/// protocol line as each outcome arrives. With `fail_fast`, a failure or an
/// unexpected success raises the stop signal; an expected failure never does.
pub struct TapResult<W: Write> {
    should_stop: bool,
    fail_fast: bool,
    verbosity: i32,
    buffered: bool,
    in_test: bool,
    staged: Vec<u8>,
    stream: W,
    skipped: Vec<CaseReport>,
    passed: Vec<CaseReport>,
    failed: Vec<CaseReport>,
    expected_failures: Vec<CaseReport>,
    unexpected_successes: Vec<CaseReport>,
}

impl<W: Write> TapResult<W> {
    pub fn new(fail_fast: bool, stream: W) -> Self {
        Self {
            should_stop: false,
            fail_fast,
            verbosity: 0,
            buffered: false,
            in_test: false,
            staged: Vec::new(),
            stream,
            skipped: Vec::new(),
            passed: Vec::new(),
            failed: Vec::new(),
            expected_failures: Vec::new(),
            unexpected_successes: Vec::new(),
        }
    }

    /// At verbosity one and above, a `#` comment line announces each test as
    /// it starts. Comments are ignored by TAP consumers.
    pub fn with_verbosity(mut self, verbosity: i32) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Stage each test's lines and flush them when the test finishes, so
    /// nothing interleaves with a test's own output.
    pub fn with_buffered(mut self, buffered: bool) -> Self {
        self.buffered = buffered;
        self
    }

    pub fn skipped(&self) -> &[CaseReport] {
        &self.skipped
    }

    pub fn passed(&self) -> &[CaseReport] {
        &self.passed
    }

    pub fn failed(&self) -> &[CaseReport] {
        &self.failed
    }

    pub fn expected_failures(&self) -> &[CaseReport] {
        &self.expected_failures
    }

    pub fn unexpected_successes(&self) -> &[CaseReport] {
        &self.unexpected_successes
    }

    /// Consume the result and hand back the stream.
    pub fn into_stream(self) -> W {
        self.stream
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if self.buffered && self.in_test {
            let _ = writeln!(self.staged, "{line}");
        } else {
            let _ = writeln!(self.stream, "{line}");
        }
    }
}

impl<W: Write> TestResult for TapResult<W> {
    fn should_stop(&self) -> bool {
        self.should_stop
    }

    fn plan(&mut self, count: usize) {
        self.emit(format_args!("1..{count}"));
    }

    fn plan_skipped(&mut self, reason: &str) {
        self.emit(format_args!("1..0 # SKIP {reason}"));
    }

    fn start_test(&mut self, name: &str) {
        self.in_test = true;
        if self.verbosity > 0 {
            self.emit(format_args!("# {name}"));
        }
    }

    fn stop_test(&mut self, _name: &str) {
        if self.buffered && !self.staged.is_empty() {
            let _ = self.stream.write_all(&self.staged);
            self.staged.clear();
        }
        self.in_test = false;
    }

    fn stop_run(&mut self) {
        let _ = self.stream.flush();
    }

    fn add_skip(&mut self, report: CaseReport) {
        let reason = report.skip.as_deref().unwrap_or_default();
        self.emit(format_args!("ok {} # SKIP {}", report.name, reason));
        self.skipped.push(report);
    }

    fn add_success(&mut self, report: CaseReport) {
        match report.message.as_deref() {
            Some(msg) => self.emit(format_args!("ok {} # {}", report.name, msg)),
            None => self.emit(format_args!("ok {}", report.name)),
        }
        self.passed.push(report);
    }

    fn add_unexpected_success(&mut self, report: CaseReport) {
        let reason = report.todo.as_deref().unwrap_or_default();
        self.emit(format_args!("ok {} # TODO {}", report.name, reason));
        self.unexpected_successes.push(report);
        if self.fail_fast {
            self.should_stop = true;
        }
    }

    fn add_failure(&mut self, report: CaseReport) {
        match report.message.as_deref() {
            Some(msg) => self.emit(format_args!("not ok {} # {}", report.name, msg)),
            None => self.emit(format_args!("not ok {}", report.name)),
        }
        self.failed.push(report);
        if self.fail_fast {
            self.should_stop = true;
        }
    }

    fn add_expected_failure(&mut self, report: CaseReport) {
        let reason = report.todo.as_deref().unwrap_or_default();
        self.emit(format_args!("not ok {} # TODO {}", report.name, reason));
        self.expected_failures.push(report);
    }

    fn verdict(&self) -> Verdict {
        if !self.failed.is_empty() {
            Verdict::Failure
        } else if self.passed.is_empty() && !self.skipped.is_empty() {
            Verdict::AllSkipped
        } else {
            Verdict::Success
        }
    }
}
