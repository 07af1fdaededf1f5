//! Property verification types.
//!
//! A finished sampling pass is checked against a fixed set of named
//! properties; each check yields a [`PropertyResult`].

/// Result of checking a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyResult {
    /// Human-readable property name (e.g., "StratigraphicConsistency")
    pub name: &'static str,

    /// Whether the property holds
    pub holds: bool,

    /// Description of violation if property doesn't hold
    pub violation: Option<String>,
}

impl PropertyResult {
    /// Create a passing property result.
    #[must_use]
    pub fn pass(name: &'static str) -> Self {
        debug_assert!(!name.is_empty(), "Property name must not be empty");

        Self {
            name,
            holds: true,
            violation: None,
        }
    }

    /// Create a failing property result.
    #[must_use]
    pub fn fail(name: &'static str, violation: String) -> Self {
        debug_assert!(!name.is_empty(), "Property name must not be empty");
        debug_assert!(!violation.is_empty(), "Violation description must not be empty");

        Self {
            name,
            holds: false,
            violation: Some(violation),
        }
    }

    /// Pass if `violations` is empty, otherwise fail with the first one.
    #[must_use]
    pub fn from_violations(name: &'static str, violations: Vec<String>) -> Self {
        match violations.len() {
            0 => Self::pass(name),
            1 => Self::fail(name, violations.into_iter().collect()),
            more => Self::fail(
                name,
                format!("{} (and {} more)", violations[0], more - 1),
            ),
        }
    }

    /// Format as a single-line status for logging.
    #[must_use]
    pub fn format_status(&self) -> String {
        if self.holds {
            format!("[PASS] {}", self.name)
        } else {
            format!(
                "[FAIL] {}: {}",
                self.name,
                self.violation.as_deref().unwrap_or("unknown")
            )
        }
    }
}

/// Trait for verifying properties against a state.
pub trait PropertyChecker {
    /// Check all properties and return results.
    ///
    /// Even passing properties are included for completeness.
    fn check_all(&self) -> Vec<PropertyResult>;

    /// Verify all properties, returning the first failure.
    fn verify_all(&self) -> Result<(), PropertyResult> {
        for result in self.check_all() {
            if !result.holds {
                return Err(result);
            }
        }
        Ok(())
    }

    /// Check if all properties hold.
    fn all_hold(&self) -> bool {
        self.check_all().iter().all(|r| r.holds)
    }

    /// Get a summary of all property check results.
    fn summary(&self) -> PropertySummary {
        let results = self.check_all();
        let passed = results.iter().filter(|r| r.holds).count() as u64;
        let failed = results.iter().filter(|r| !r.holds).count() as u64;
        let total = results.len() as u64;

        debug_assert!(passed + failed == total);

        PropertySummary {
            passed,
            failed,
            total,
            results,
        }
    }
}

/// Summary of property check results.
#[derive(Debug, Clone)]
pub struct PropertySummary {
    /// Number of properties that passed
    pub passed: u64,
    /// Number of properties that failed
    pub failed: u64,
    /// Total number of properties checked
    pub total: u64,
    /// Individual results
    pub results: Vec<PropertyResult>,
}

impl PropertySummary {
    /// Format as a report string.
    #[must_use]
    pub fn format_report(&self) -> String {
        let mut report = format!(
            "Property Check Summary: {}/{} passed\n",
            self.passed, self.total
        );

        for result in &self.results {
            report.push_str(&result.format_status());
            report.push('\n');
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_result_pass() {
        let result = PropertyResult::pass("LayerNaming");
        assert!(result.holds);
        assert!(result.violation.is_none());
    }

    #[test]
    fn test_property_result_fail() {
        let result = PropertyResult::fail("LayerNaming", "sample 2: got `Layer 0`".to_string());
        assert!(!result.holds);
        assert!(result.violation.is_some());
    }

    #[test]
    fn test_from_violations() {
        assert!(PropertyResult::from_violations("P", Vec::new()).holds);

        let one = PropertyResult::from_violations("P", vec!["a".to_string()]);
        assert_eq!(one.violation.as_deref(), Some("a"));

        let many = PropertyResult::from_violations(
            "P",
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
        );
        assert_eq!(many.violation.as_deref(), Some("a (and 2 more)"));
    }

    #[test]
    fn test_format_status() {
        let pass = PropertyResult::pass("Test");
        assert!(pass.format_status().contains("[PASS]"));

        let fail = PropertyResult::fail("Test", "error".to_string());
        assert!(fail.format_status().contains("[FAIL]"));
    }

    struct Fixed(Vec<PropertyResult>);

    impl PropertyChecker for Fixed {
        fn check_all(&self) -> Vec<PropertyResult> {
            self.0.clone()
        }
    }

    #[test]
    fn test_summary_and_verify() {
        let checker = Fixed(vec![
            PropertyResult::pass("A"),
            PropertyResult::fail("B", "broken".to_string()),
        ]);

        let summary = checker.summary();
        assert_eq!((summary.passed, summary.failed, summary.total), (1, 1, 2));
        assert!(summary.format_report().starts_with("Property Check Summary: 1/2 passed"));
        assert!(!checker.all_hold());
        assert_eq!(checker.verify_all().unwrap_err().name, "B");
    }
}
