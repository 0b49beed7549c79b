use clap::{ArgAction, Parser};
use std::io;
use std::process::ExitCode;
use tapling_core::{run_tests, LibraryLoader, TapResult, TestRunner};

/// TAP unit-test harness.
///
/// Loads test suites from dynamic test libraries and runs them, streaming
/// results in the Test Anything Protocol. The exit status reflects the run:
/// 0 when everything passed, 1 on any failure, 77 when nothing ran except
/// skipped tests.
///
/// EXAMPLES:
///     tapling libwidget_tests.so            Run one test library
///     tapling -f a_tests.so b_tests.so      Stop at the first failure
///     tapling -v libwidget_tests.so         Announce each test as it runs
#[derive(Parser)]
#[command(name = "tapling")]
#[command(version)]
struct Cli {
    /// Stop on the first failure or unexpected success
    #[arg(short = 'f', long)]
    failfast: bool,

    /// Increase verbosity (repeatable)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (repeatable)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    quiet: u8,

    /// Buffer each test's output and flush it when the test finishes
    #[arg(short = 'b', long)]
    buffer: bool,

    /// Dynamic test libraries to load
    tests: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbosity = i32::from(cli.verbose) - i32::from(cli.quiet);

    let result = TapResult::new(cli.failfast, io::stdout())
        .with_verbosity(verbosity)
        .with_buffered(cli.buffer);
    let mut runner = TestRunner::new(result);
    let mut loader = LibraryLoader::new();

    if cli.tests.is_empty() {
        eprintln!("tapling: no test libraries given");
    }
    let code = run_tests(&mut runner, &mut loader, &cli.tests);
    ExitCode::from(code as u8)
}
