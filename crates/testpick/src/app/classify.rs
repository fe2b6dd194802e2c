//! Shape-based classification of the raw target token.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::model::TargetKind;

/// Lowercase `test...` identifier at the end of the token.
static METHOD_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"test[a-z0-9_]*$").expect("valid method pattern"));

/// `FooTest`, `FooTests`, or `TestFoo`.
static CLASS_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Tests?$|Test[A-Za-z]").expect("valid class pattern"));

/// Decide what a token names. Rules are ordered; a token that looks like both a method and a
/// class is treated as a method.
pub fn classify(token: &str) -> TargetKind {
    let kind = if METHOD_SHAPE.is_match(token) {
        TargetKind::Method
    } else if CLASS_SHAPE.is_match(token) {
        TargetKind::Class
    } else {
        TargetKind::ModuleOrPackage
    };
    tracing::debug!(token, kind = kind.as_str(), "classified target");
    kind
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_names() {
        assert_eq!(classify("test_creates_user"), TargetKind::Method);
        assert_eq!(classify("test"), TargetKind::Method);
        assert_eq!(classify("test_v2"), TargetKind::Method);
    }

    #[test]
    fn method_shape_only_needs_to_match_the_tail() {
        assert_eq!(classify("InvoiceTest.test_total"), TargetKind::Method);
        assert_eq!(classify("should_test_total"), TargetKind::Method);
    }

    #[test]
    fn class_names() {
        assert_eq!(classify("UserCreationTest"), TargetKind::Class);
        assert_eq!(classify("UserCreationTests"), TargetKind::Class);
        assert_eq!(classify("TestUserCreation"), TargetKind::Class);
        assert_eq!(classify("UserTestCase"), TargetKind::Class);
    }

    #[test]
    fn class_suffix_is_case_sensitive() {
        assert_eq!(classify("Usertest_x"), TargetKind::Method);
        assert_eq!(classify("USERTEST"), TargetKind::ModuleOrPackage);
    }

    #[test]
    fn everything_else_is_a_module() {
        assert_eq!(classify("billing/invoices"), TargetKind::ModuleOrPackage);
        assert_eq!(classify("app/billing/tests.py"), TargetKind::ModuleOrPackage);
        assert_eq!(classify(""), TargetKind::ModuleOrPackage);
    }

    #[test]
    fn method_rule_wins_over_class_rule() {
        // Matches `Test[A-Za-z]` and ends with a lowercase `test...` tail.
        assert_eq!(classify("TestCase_test_one"), TargetKind::Method);
    }
}
