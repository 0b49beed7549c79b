//! Assertion macros for test bodies
//!
//! Each macro records the check on the case handle and, on failure,
//! abandons the rest of the body by propagating the assertion signal with
//! `?`. The condition text and source location are captured at the call site
//! for reporting. Message arguments are optional and accept anything that
//! implements `Display`.

/// Record a check that always passes, with a message to report.
#[macro_export]
macro_rules! tap_success {
    ($case:expr, $msg:expr) => {
        $case.check(true, "SUCCESS", Some($msg.to_string()), file!(), line!())?
    };
}

/// Record a check that always fails, with a message to report.
/// The rest of the body does not run.
#[macro_export]
macro_rules! tap_fail {
    ($case:expr, $msg:expr) => {
        $case.check(false, "FAIL", Some($msg.to_string()), file!(), line!())?
    };
}

/// Check that a condition holds.
#[macro_export]
macro_rules! tap_assert {
    ($case:expr, $cond:expr) => {
        $case.check($cond, stringify!($cond), None, file!(), line!())?
    };
    ($case:expr, $cond:expr, $msg:expr) => {
        $case.check($cond, stringify!($cond), Some($msg.to_string()), file!(), line!())?
    };
}

/// Check that two values are equal.
#[macro_export]
macro_rules! tap_assert_eq {
    ($case:expr, $first:expr, $second:expr) => {
        $case.check(
            ($first) == ($second),
            concat!("(", stringify!($first), ") == (", stringify!($second), ")"),
            None,
            file!(),
            line!(),
        )?
    };
    ($case:expr, $first:expr, $second:expr, $msg:expr) => {
        $case.check(
            ($first) == ($second),
            concat!("(", stringify!($first), ") == (", stringify!($second), ")"),
            Some($msg.to_string()),
            file!(),
            line!(),
        )?
    };
}

/// Check that two values are not equal.
#[macro_export]
macro_rules! tap_assert_ne {
    ($case:expr, $first:expr, $second:expr) => {
        $case.check(
            ($first) != ($second),
            concat!("(", stringify!($first), ") != (", stringify!($second), ")"),
            None,
            file!(),
            line!(),
        )?
    };
    ($case:expr, $first:expr, $second:expr, $msg:expr) => {
        $case.check(
            ($first) != ($second),
            concat!("(", stringify!($first), ") != (", stringify!($second), ")"),
            Some($msg.to_string()),
            file!(),
            line!(),
        )?
    };
}

/// Check that two references point to the same address.
#[macro_export]
macro_rules! tap_assert_ptr_eq {
    ($case:expr, $first:expr, $second:expr) => {
        $case.check(
            ::std::ptr::eq($first, $second),
            concat!("ptr::eq(", stringify!($first), ", ", stringify!($second), ")"),
            None,
            file!(),
            line!(),
        )?
    };
    ($case:expr, $first:expr, $second:expr, $msg:expr) => {
        $case.check(
            ::std::ptr::eq($first, $second),
            concat!("ptr::eq(", stringify!($first), ", ", stringify!($second), ")"),
            Some($msg.to_string()),
            file!(),
            line!(),
        )?
    };
}

/// Check that two references point to different addresses.
#[macro_export]
macro_rules! tap_assert_ptr_ne {
    ($case:expr, $first:expr, $second:expr) => {
        $case.check(
            !::std::ptr::eq($first, $second),
            concat!("!ptr::eq(", stringify!($first), ", ", stringify!($second), ")"),
            None,
            file!(),
            line!(),
        )?
    };
    ($case:expr, $first:expr, $second:expr, $msg:expr) => {
        $case.check(
            !::std::ptr::eq($first, $second),
            concat!("!ptr::eq(", stringify!($first), ", ", stringify!($second), ")"),
            Some($msg.to_string()),
            file!(),
            line!(),
        )?
    };
}

/// Check that two numbers differ by at most `delta` in absolute value.
#[macro_export]
macro_rules! tap_assert_almost_eq {
    ($case:expr, $first:expr, $second:expr, $delta:expr) => {
        $case.check(
            (($first) as f64 - ($second) as f64).abs() <= (($delta) as f64).abs(),
            concat!(
                "|", stringify!($first), " - ", stringify!($second),
                "| <= ", stringify!($delta)
            ),
            None,
            file!(),
            line!(),
        )?
    };
    ($case:expr, $first:expr, $second:expr, $delta:expr, $msg:expr) => {
        $case.check(
            (($first) as f64 - ($second) as f64).abs() <= (($delta) as f64).abs(),
            concat!(
                "|", stringify!($first), " - ", stringify!($second),
                "| <= ", stringify!($delta)
            ),
            Some($msg.to_string()),
            file!(),
            line!(),
        )?
    };
}

/// Check that two numbers differ by more than `delta` in absolute value.
#[macro_export]
macro_rules! tap_assert_almost_ne {
    ($case:expr, $first:expr, $second:expr, $delta:expr) => {
        $case.check(
            (($first) as f64 - ($second) as f64).abs() > (($delta) as f64).abs(),
            concat!(
                "|", stringify!($first), " - ", stringify!($second),
                "| > ", stringify!($delta)
            ),
            None,
            file!(),
            line!(),
        )?
    };
    ($case:expr, $first:expr, $second:expr, $delta:expr, $msg:expr) => {
        $case.check(
            (($first) as f64 - ($second) as f64).abs() > (($delta) as f64).abs(),
            concat!(
                "|", stringify!($first), " - ", stringify!($second),
                "| > ", stringify!($delta)
            ),
            Some($msg.to_string()),
            file!(),
            line!(),
        )?
    };
}
