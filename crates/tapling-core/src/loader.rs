//! Test loaders
//!
//! A loader supplies the suite to run. [`LibraryLoader`] discovers suites in
//! dynamic test libraries through a well-known entry point; [`FnLoader`]
//! wraps a single registered function. Discovery failures never crash the
//! runner: they become a one-case suite whose case fails with the error
//! message, so load errors travel through the ordinary report stream and
//! affect the exit code like any other failure.

use crate::case::{CaseHandle, Check, TestBody, TestCase};
use crate::suite::{Suite, TestSuite};
use libloading::Library;
use thiserror::Error;

/// Symbol a dynamic test library must export to register its suite.
///
/// Libraries are expected to be Rust cdylibs built with the same toolchain
/// as the harness.
pub const LOAD_SUITE_SYMBOL: &[u8] = b"load_test_suite";

/// Signature of the entry point behind [`LOAD_SUITE_SYMBOL`]. Receives the
/// loader driving the discovery; returning `None` signals a failed load.
pub type LoadSuiteFn = fn(&mut dyn TestLoader) -> Option<Box<dyn Suite>>;

/// Why a dynamic test library yielded no suite.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to load test library {path}: {source}")]
    OpenFailed {
        path: String,
        source: libloading::Error,
    },

    #[error("no test suite entry point in {path}")]
    MissingEntryPoint { path: String },

    #[error("loader in {path} returned no suite")]
    NoSuite { path: String },
}

/// Supplies the suite(s) to run.
pub trait TestLoader {
    /// Load tests based on the arguments passed through from the command
    /// line. `None` means the loader found nothing to run at all.
    fn load_tests(&mut self, args: &[String]) -> Option<Box<dyn Suite>>;
}

/// Build the suite that surfaces a load error as a normal test failure.
fn error_suite(message: String) -> TestSuite<String> {
    let mut suite = TestSuite::with_context(message).with_name("load_error");
    suite.add_test(TestCase::new("suite_error", |t, message: &String| {
        crate::tap_fail!(t, message);
        Ok(())
    }));
    suite
}

/// Loads test suites from dynamic libraries named on the command line.
///
/// Each argument is opened with `libloading` and its [`LOAD_SUITE_SYMBOL`]
/// entry point invoked. Opened libraries stay loaded in the loader for the
/// rest of the run; the returned suites reference code inside them.
#[derive(Default)]
pub struct LibraryLoader {
    libraries: Vec<Library>,
}

impl LibraryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    fn load_library(&mut self, path: &str) -> Box<dyn Suite> {
        match self.try_load(path) {
            Ok(suite) => suite,
            Err(err) => Box::new(error_suite(err.to_string())),
        }
    }

    fn try_load(&mut self, path: &str) -> Result<Box<dyn Suite>, LoadError> {
        // Loading a library runs arbitrary initialization code in-process;
        // that is the point of a test plugin.
        let library = unsafe { Library::new(path) }.map_err(|source| LoadError::OpenFailed {
            path: path.to_string(),
            source,
        })?;
        let load_suite: LoadSuiteFn = unsafe {
            library
                .get::<LoadSuiteFn>(LOAD_SUITE_SYMBOL)
                .map(|symbol| *symbol)
                .map_err(|_| LoadError::MissingEntryPoint {
                    path: path.to_string(),
                })?
        };
        let suite = load_suite(self).ok_or_else(|| LoadError::NoSuite {
            path: path.to_string(),
        })?;
        self.libraries.push(library);
        Ok(suite)
    }
}

impl TestLoader for LibraryLoader {
    fn load_tests(&mut self, args: &[String]) -> Option<Box<dyn Suite>> {
        if args.is_empty() {
            return None;
        }
        let mut root = TestSuite::new().with_name("tapling");
        for path in args {
            let child = self.load_library(path);
            root.add_boxed_suite(child);
        }
        Some(Box::new(root))
    }
}

/// Loads a single function as a one-case suite.
///
/// Yields its suite once; subsequent calls return `None`.
pub struct FnLoader {
    name: String,
    skip: Option<String>,
    todo: Option<String>,
    body: Option<TestBody<()>>,
}

impl FnLoader {
    pub fn new(
        name: impl Into<String>,
        body: impl Fn(&mut CaseHandle<'_>, &()) -> Check + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            skip: None,
            todo: None,
            body: Some(Box::new(body)),
        }
    }

    /// Mark the loaded test as skipped.
    pub fn with_skip(mut self, reason: impl Into<String>) -> Self {
        self.skip = Some(reason.into());
        self
    }

    /// Mark the loaded test as expected to fail.
    pub fn with_todo(mut self, reason: impl Into<String>) -> Self {
        self.todo = Some(reason.into());
        self
    }
}

impl TestLoader for FnLoader {
    fn load_tests(&mut self, _args: &[String]) -> Option<Box<dyn Suite>> {
        let body = self.body.take()?;
        let case = TestCase::from_parts(self.name.clone(), self.skip.take(), self.todo.take(), body);
        let mut suite = TestSuite::new().with_name(self.name.clone());
        suite.add_test(case);
        Some(Box::new(suite))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{TapResult, TestResult as _};
    use crate::runner::TestRunner;
    use pretty_assertions::assert_eq;

    fn transcript(mut suite: Box<dyn Suite>) -> (String, i32) {
        let mut runner = TestRunner::new(TapResult::new(false, Vec::new()));
        let verdict = runner.run(suite.as_mut());
        let out = String::from_utf8(runner.into_result().into_stream()).unwrap();
        (out, verdict.exit_code())
    }

    #[test]
    fn error_suite_fails_with_the_message() {
        let mut suite = error_suite("something went wrong".to_string());
        let mut result = TapResult::new(false, Vec::new());
        suite.run(&mut result);

        assert_eq!(result.failed().len(), 1);
        assert_eq!(
            result.failed()[0].message.as_deref(),
            Some("something went wrong")
        );
        assert_eq!(result.verdict().exit_code(), 1);
    }

    #[test]
    fn library_loader_with_no_args_finds_nothing() {
        let mut loader = LibraryLoader::new();
        assert!(loader.load_tests(&[]).is_none());
    }

    #[test]
    fn missing_library_becomes_a_failing_case() {
        let mut loader = LibraryLoader::new();
        let suite = loader
            .load_tests(&["/nonexistent/libtests.so".to_string()])
            .unwrap();

        let (out, code) = transcript(suite);
        assert_eq!(code, 1);
        assert!(out.starts_with("1..1\nnot ok suite_error # "));
    }

    #[test]
    fn invalid_library_file_becomes_a_failing_case() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_library.so");
        std::fs::write(&path, b"definitely not a shared object").unwrap();

        let mut loader = LibraryLoader::new();
        let suite = loader.load_tests(&[path.display().to_string()]).unwrap();

        let (out, code) = transcript(suite);
        assert_eq!(code, 1);
        assert!(out.contains("not ok suite_error # failed to load test library"));
    }

    #[test]
    fn each_argument_gets_its_own_child_suite() {
        let mut loader = LibraryLoader::new();
        let suite = loader
            .load_tests(&["/missing/a.so".to_string(), "/missing/b.so".to_string()])
            .unwrap();

        assert_eq!(suite.len(), 2);
        let (out, code) = transcript(suite);
        assert_eq!(code, 1);
        assert_eq!(out.matches("not ok suite_error").count(), 2);
    }

    #[test]
    fn fn_loader_wraps_one_case() {
        let mut loader = FnLoader::new("test_fn", |t, _: &()| {
            t.check(true, "SUCCESS", None, file!(), line!())?;
            Ok(())
        });
        let suite = loader.load_tests(&[]).unwrap();
        let (out, code) = transcript(suite);
        assert_eq!(code, 0);
        assert_eq!(out, "1..1\nok test_fn\n");
    }

    #[test]
    fn fn_loader_honors_skip() {
        let mut loader =
            FnLoader::new("test_fn", |_, _: &()| Ok(())).with_skip("needs hardware");
        let suite = loader.load_tests(&[]).unwrap();
        let (out, code) = transcript(suite);
        assert_eq!(code, 77);
        assert_eq!(out, "1..1\nok test_fn # SKIP needs hardware\n");
    }

    #[test]
    fn fn_loader_honors_todo() {
        let mut loader = FnLoader::new("test_fn", |t, _: &()| {
            t.check(false, "FAIL", None, file!(), line!())?;
            Ok(())
        })
        .with_todo("not done");
        let suite = loader.load_tests(&[]).unwrap();
        let (out, code) = transcript(suite);
        assert_eq!(code, 0);
        assert_eq!(out, "1..1\nnot ok test_fn # TODO not done\n");
    }

    #[test]
    fn fn_loader_yields_its_suite_once() {
        let mut loader = FnLoader::new("test_fn", |_, _: &()| Ok(()));
        assert!(loader.load_tests(&[]).is_some());
        assert!(loader.load_tests(&[]).is_none());
    }
}
