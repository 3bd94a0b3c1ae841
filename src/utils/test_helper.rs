//! Log assertions for unit tests.
//!
//! Call `testing_logger::setup()` at the beginning of the test, then check the captured
//! warnings with one of the functions below.

#[cfg(test)]
pub mod test_helper {
    use log::Level;

    fn validate_warnings(expected: &[&str], matches: fn(&str, &str) -> bool) {
        testing_logger::validate(|captured_logs| {
            let warnings: Vec<&str> = captured_logs
                .iter()
                .filter(|l| l.level == Level::Warn)
                .map(|l| l.body.as_str())
                .collect();
            assert_eq!(warnings.len(), expected.len(), "warnings: {warnings:?}");
            for (warning, pattern) in warnings.iter().zip(expected) {
                assert!(matches(warning, pattern), "{warning} does not match {pattern}");
            }
        });
    }
    /// Asserts that exactly the `expected` warnings were logged, in this order.
    pub fn check_warnings(expected: &[&str]) {
        validate_warnings(expected, |warning, pattern| warning == pattern);
    }
    /// Like [`check_warnings`] but only compares the beginning of each warning.
    pub fn check_warning_prefixes(expected: &[&str]) {
        validate_warnings(expected, |warning, pattern| warning.starts_with(pattern));
    }
}
