//! The verification chain.
//!
//! [`Verify`] is implemented for every sized type. Each operation reads the
//! value, and either hands it back unchanged or fails with a
//! [`VerificationError`]. Chains compose with `?`, so the first failing check
//! aborts the rest:
//!
//! ```
//! use chainverify::{DomNode, Locator, Verify, VerifyResult};
//!
//! fn check(grid: &DomNode) -> VerifyResult<()> {
//!     grid.verify_present_named(&Locator::class_name("k-grid-header"), "Grid header")?
//!         .verify_absent(&Locator::class_name("k-grid-norecords"))?
//!         .verify_classes(["k-widget", "k-grid"])?;
//!     Ok(())
//! }
//!
//! let grid = DomNode::new("div")
//!     .with_class("k-widget")
//!     .with_class("k-grid")
//!     .with_child(DomNode::new("div").with_class("k-grid-header"));
//! assert!(check(&grid).is_ok());
//! ```

use crate::capability::{Block, Element, HasText, Selectable};
use crate::locator::Locator;
use crate::page_object::short_type_name;
use crate::result::{BoxError, VerificationError, VerifyResult};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

const DEFAULT_ELEMENT_KIND: &str = "Element";

/// Chainable verification operations.
///
/// Capability-specific operations are only callable when the value exposes
/// the capability.
pub trait Verify: Sized {
    /// Verify a named predicate holds.
    fn verify<P>(self, description: &str, predicate: P) -> VerifyResult<Self>
    where
        P: FnOnce(&Self) -> bool,
    {
        if predicate(&self) {
            passed(description);
            Ok(self)
        } else {
            Err(failed(format!("Unable to verify {description}")))
        }
    }

    /// Verify an unnamed predicate holds.
    fn verify_that<P>(self, predicate: P) -> VerifyResult<Self>
    where
        P: FnOnce(&Self) -> bool,
    {
        self.verify("custom verification.", predicate)
    }

    /// Run an assertion that reports its own failure as an error.
    ///
    /// Any error is wrapped into a [`VerificationError`] whose source is the
    /// original error.
    fn verify_with<F, E>(self, assertion: F) -> VerifyResult<Self>
    where
        F: FnOnce(&Self) -> Result<(), E>,
        E: Into<BoxError>,
    {
        match assertion(&self) {
            Ok(()) => {
                passed("delegated assertion");
                Ok(self)
            }
            Err(err) => Err(wrap_cause(err.into())),
        }
    }

    /// Run an assertion that fails by panicking (`assert!`, `assert_eq!`).
    ///
    /// The panic is caught and turned into a [`VerificationError`]. The panic
    /// hook still runs, so the usual panic output is printed.
    fn verify_asserts<F>(self, assertion: F) -> VerifyResult<Self>
    where
        F: FnOnce(&Self),
    {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| assertion(&self)));
        match outcome {
            Ok(()) => {
                passed("delegated assertion");
                Ok(self)
            }
            Err(payload) => Err(wrap_cause(BoxError::from(panic_message(payload.as_ref())))),
        }
    }

    /// Verify the selected state.
    fn verify_selected(self, expected: bool) -> VerifyResult<Self>
    where
        Self: Selectable,
    {
        let actual = self.is_selected();
        if actual == expected {
            passed("selected state");
            Ok(self)
        } else {
            Err(failed(format!(
                "Expected selected state to be {expected} but was {actual}"
            )))
        }
    }

    /// Verify the text equals `expected` exactly.
    fn verify_text(self, expected: &str) -> VerifyResult<Self>
    where
        Self: HasText,
    {
        let actual = self.text();
        if actual == expected {
            passed("text");
            Ok(self)
        } else {
            Err(failed(format!(
                "Expected text '{expected}' but was '{actual}'"
            )))
        }
    }

    /// Verify the text is anything but `forbidden`.
    fn verify_text_not(self, forbidden: &str) -> VerifyResult<Self>
    where
        Self: HasText,
    {
        let actual = self.text();
        if actual == forbidden {
            Err(failed(format!(
                "Expected text not to be '{forbidden}' but was '{actual}'"
            )))
        } else {
            passed("text mismatch");
            Ok(self)
        }
    }

    /// Verify the text contains `substring`.
    fn verify_text_contains(self, substring: &str) -> VerifyResult<Self>
    where
        Self: HasText,
    {
        let actual = self.text();
        if actual.contains(substring) {
            passed("text contains");
            Ok(self)
        } else {
            Err(failed(format!(
                "Expected text '{actual}' to contain '{substring}'"
            )))
        }
    }

    /// Verify at least one descendant matches `locator`.
    fn verify_present(self, locator: &Locator) -> VerifyResult<Self>
    where
        Self: Block,
    {
        self.verify_present_named(locator, DEFAULT_ELEMENT_KIND)
    }

    /// Like [`verify_present`](Self::verify_present), naming the element kind
    /// in the failure message.
    fn verify_present_named(self, locator: &Locator, kind: &str) -> VerifyResult<Self>
    where
        Self: Block,
    {
        if has_match(&self, locator) {
            passed("presence");
            Ok(self)
        } else {
            Err(failed(format!("{kind} not found: {locator}")))
        }
    }

    /// Like [`verify_present`](Self::verify_present), labelling the element by
    /// the type `E` (usually a page object).
    fn verify_present_as<E: ?Sized>(self, locator: &Locator) -> VerifyResult<Self>
    where
        Self: Block,
    {
        self.verify_present_named(locator, short_type_name::<E>())
    }

    /// Verify no descendant matches `locator`.
    fn verify_absent(self, locator: &Locator) -> VerifyResult<Self>
    where
        Self: Block,
    {
        self.verify_absent_named(locator, DEFAULT_ELEMENT_KIND)
    }

    /// Like [`verify_absent`](Self::verify_absent), naming the element kind.
    fn verify_absent_named(self, locator: &Locator, kind: &str) -> VerifyResult<Self>
    where
        Self: Block,
    {
        if has_match(&self, locator) {
            Err(failed(format!("{kind} should not be present: {locator}")))
        } else {
            passed("absence");
            Ok(self)
        }
    }

    /// Like [`verify_absent`](Self::verify_absent), labelling the element by
    /// the type `E`.
    fn verify_absent_as<E: ?Sized>(self, locator: &Locator) -> VerifyResult<Self>
    where
        Self: Block,
    {
        self.verify_absent_named(locator, short_type_name::<E>())
    }

    /// Verify every expected class is on the element.
    ///
    /// Extra classes on the element are ignored. All missing classes are
    /// reported together, in expected order.
    fn verify_classes<I, S>(self, expected: I) -> VerifyResult<Self>
    where
        Self: Element,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let actual = self.class_names();
        let mut missing: Vec<String> = Vec::new();
        for class in expected {
            let class = class.as_ref();
            if !actual.contains(class) && !missing.iter().any(|m| m == class) {
                missing.push(class.to_string());
            }
        }

        if missing.is_empty() {
            passed("classes");
            Ok(self)
        } else {
            Err(failed(format!(
                "Element is missing expected classes: {}",
                missing.join(", ")
            )))
        }
    }

    /// Compute a value from `self` and hand both back.
    ///
    /// Lets a chain capture data mid-way:
    /// `let (row, id) = row.verify_selected(true)?.capture(|r| r.text());`
    fn capture<U, F>(self, f: F) -> (Self, U)
    where
        F: FnOnce(&Self) -> U,
    {
        let value = f(&self);
        (self, value)
    }
}

impl<T> Verify for T {}

/// Verify classes given as separate arguments.
///
/// `verify_classes!(element, "k-item", "k-state-selected")` is the variadic
/// form of [`Verify::verify_classes`].
#[macro_export]
macro_rules! verify_classes {
    ($value:expr $(,)?) => {
        $crate::Verify::verify_classes($value, ::std::iter::empty::<&str>())
    };
    ($value:expr, $($class:expr),+ $(,)?) => {
        $crate::Verify::verify_classes($value, [$($class),+])
    };
}

fn has_match<B: Block + ?Sized>(block: &B, locator: &Locator) -> bool {
    block.find_all(locator).next().is_some()
}

fn wrap_cause(cause: BoxError) -> VerificationError {
    let message = format!("Unable to verify. {cause}");
    tracing::debug!(%message, "verification failed");
    VerificationError::with_source(message, cause)
}

fn failed(message: String) -> VerificationError {
    tracing::debug!(%message, "verification failed");
    VerificationError::new(message)
}

fn passed(check: &str) {
    tracing::trace!(check, "verification passed");
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "assertion panicked".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::capability::Matches;
    use std::collections::BTreeSet;
    use std::error::Error as _;

    #[derive(Debug, PartialEq)]
    struct Widget {
        selected: bool,
        text: String,
        classes: Vec<&'static str>,
        children: Vec<&'static str>,
    }

    impl Widget {
        fn new(text: &str) -> Self {
            Self {
                selected: false,
                text: text.to_string(),
                classes: vec!["a", "b"],
                children: vec!["row", "row", "header"],
            }
        }
    }

    impl Selectable for Widget {
        fn is_selected(&self) -> bool {
            self.selected
        }
    }

    impl HasText for Widget {
        fn text(&self) -> String {
            self.text.clone()
        }
    }

    impl Element for Widget {
        fn class_names(&self) -> BTreeSet<String> {
            self.classes.iter().map(|c| (*c).to_string()).collect()
        }
    }

    impl Block for Widget {
        type Match<'a> = &'static str;

        fn find_all<'a>(&'a self, locator: &'a Locator) -> Matches<'a, &'static str> {
            Box::new(
                self.children
                    .iter()
                    .copied()
                    .filter(move |c| *c == locator.selector().value()),
            )
        }
    }

    mod predicate_tests {
        use super::*;

        #[test]
        fn test_named_pass_returns_value() {
            let widget = Widget::new("Orders");
            let back = widget.verify("title", |w| w.text == "Orders").unwrap();
            assert_eq!(back, Widget::new("Orders"));
        }

        #[test]
        fn test_named_failure_message() {
            let err = Widget::new("Orders")
                .verify("title is Products", |w| w.text == "Products")
                .unwrap_err();
            assert_eq!(err.message(), "Unable to verify title is Products");
        }

        #[test]
        fn test_unnamed_failure_message() {
            let err = Widget::new("x").verify_that(|_| false).unwrap_err();
            assert_eq!(err.message(), "Unable to verify custom verification.");
        }

        #[test]
        fn test_reference_identity_preserved() {
            let widget = Widget::new("Orders");
            let back = (&widget).verify_that(|_| true).unwrap();
            assert!(std::ptr::eq(back, &widget));
        }

        #[test]
        fn test_first_failure_aborts_chain() {
            let mut later_ran = false;
            let result = Widget::new("x")
                .verify_that(|_| false)
                .and_then(|w| {
                    later_ran = true;
                    w.verify_that(|_| true)
                });
            assert!(result.is_err());
            assert!(!later_ran);
        }
    }

    mod delegated_tests {
        use super::*;

        #[derive(Debug, thiserror::Error)]
        #[error("row count was 3")]
        struct RowCount;

        #[test]
        fn test_ok_passes_through() {
            let widget = Widget::new("x");
            let back = (&widget)
                .verify_with(|_| Ok::<(), RowCount>(()))
                .unwrap();
            assert!(std::ptr::eq(back, &widget));
        }

        #[test]
        fn test_error_is_wrapped_with_cause() {
            let err = Widget::new("x").verify_with(|_| Err(RowCount)).unwrap_err();
            assert_eq!(err.message(), "Unable to verify. row count was 3");
            let source = err.source().unwrap();
            assert!(source.downcast_ref::<RowCount>().is_some());
        }

        #[test]
        fn test_string_errors_are_accepted() {
            let err = Widget::new("x")
                .verify_with(|w| {
                    if w.text.is_empty() {
                        Ok(())
                    } else {
                        Err(format!("text was {}", w.text))
                    }
                })
                .unwrap_err();
            assert_eq!(err.message(), "Unable to verify. text was x");
        }

        #[test]
        fn test_panicking_assertion_is_caught() {
            let err = Widget::new("x")
                .verify_asserts(|w| assert!(w.selected, "widget must be selected"))
                .unwrap_err();
            assert_eq!(err.message(), "Unable to verify. widget must be selected");
            assert!(err.source().is_some());
        }

        #[test]
        fn test_formatted_panic_message() {
            let err = Widget::new("x")
                .verify_asserts(|w| panic!("bad text {}", w.text))
                .unwrap_err();
            assert_eq!(err.message(), "Unable to verify. bad text x");
        }

        #[test]
        fn test_non_panicking_assertion_passes() {
            let result = Widget::new("x").verify_asserts(|w| assert_eq!(w.text, "x"));
            assert!(result.is_ok());
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_matching_state_passes() {
            let mut widget = Widget::new("x");
            widget.selected = true;
            assert!(widget.verify_selected(true).is_ok());
            assert!(Widget::new("x").verify_selected(false).is_ok());
        }

        #[test]
        fn test_message_names_both_states() {
            let err = Widget::new("x").verify_selected(true).unwrap_err();
            assert_eq!(
                err.message(),
                "Expected selected state to be true but was false"
            );
        }
    }

    mod text_tests {
        use super::*;

        #[test]
        fn test_equality_is_exact() {
            assert!(Widget::new("Orders").verify_text("Orders").is_ok());
            let err = Widget::new("Orders").verify_text("orders").unwrap_err();
            assert_eq!(err.message(), "Expected text 'orders' but was 'Orders'");
            assert!(Widget::new("Orders ").verify_text("Orders").is_err());
        }

        #[test]
        fn test_equality_with_empty_text() {
            assert!(Widget::new("").verify_text("").is_ok());
            assert!(Widget::new("x").verify_text("").is_err());
        }

        #[test]
        fn test_mismatch() {
            assert!(Widget::new("Orders").verify_text_not("Products").is_ok());
            let err = Widget::new("Orders").verify_text_not("Orders").unwrap_err();
            assert_eq!(
                err.message(),
                "Expected text not to be 'Orders' but was 'Orders'"
            );
        }

        #[test]
        fn test_mismatch_with_empty_text() {
            assert!(Widget::new("x").verify_text_not("").is_ok());
            assert!(Widget::new("").verify_text_not("").is_err());
        }

        #[test]
        fn test_contains() {
            assert!(Widget::new("Total: 42").verify_text_contains("42").is_ok());
            let err = Widget::new("Total: 42")
                .verify_text_contains("43")
                .unwrap_err();
            assert_eq!(err.message(), "Expected text 'Total: 42' to contain '43'");
        }

        #[test]
        fn test_contains_empty_substring_always_passes() {
            assert!(Widget::new("").verify_text_contains("").is_ok());
            assert!(Widget::new("abc").verify_text_contains("").is_ok());
        }
    }

    mod presence_tests {
        use super::*;

        struct GridRow;

        #[test]
        fn test_present_and_absent_polarity() {
            let widget = Widget::new("x");
            let row = Locator::text("row");
            let footer = Locator::text("footer");

            assert!((&widget).verify_present(&row).is_ok());
            assert!((&widget).verify_absent(&row).is_err());
            assert!((&widget).verify_present(&footer).is_err());
            assert!((&widget).verify_absent(&footer).is_ok());
        }

        #[test]
        fn test_named_messages() {
            let widget = Widget::new("x");
            let err = (&widget)
                .verify_present_named(&Locator::text("footer"), "Grid footer")
                .unwrap_err();
            assert_eq!(err.message(), "Grid footer not found: By.Text: footer");

            let err = (&widget)
                .verify_absent_named(&Locator::text("header"), "Grid header")
                .unwrap_err();
            assert_eq!(
                err.message(),
                "Grid header should not be present: By.Text: header"
            );
        }

        #[test]
        fn test_default_kind() {
            let err = Widget::new("x")
                .verify_present(&Locator::text("nope"))
                .unwrap_err();
            assert_eq!(err.message(), "Element not found: By.Text: nope");
        }

        #[test]
        fn test_generic_kind_uses_type_name() {
            let err = Widget::new("x")
                .verify_present_as::<GridRow>(&Locator::text("nope"))
                .unwrap_err();
            assert_eq!(err.message(), "GridRow not found: By.Text: nope");

            let err = Widget::new("x")
                .verify_absent_as::<GridRow>(&Locator::text("row"))
                .unwrap_err();
            assert_eq!(err.message(), "GridRow should not be present: By.Text: row");
        }
    }

    mod class_tests {
        use super::*;

        #[test]
        fn test_reports_exactly_missing() {
            let err = Widget::new("x").verify_classes(["a", "c"]).unwrap_err();
            assert_eq!(err.message(), "Element is missing expected classes: c");
        }

        #[test]
        fn test_reports_all_missing_once() {
            let err = Widget::new("x")
                .verify_classes(vec!["d", "a", "c", "d"])
                .unwrap_err();
            assert_eq!(err.message(), "Element is missing expected classes: d, c");
        }

        #[test]
        fn test_subset_passes_and_extras_ignored() {
            assert!(Widget::new("x").verify_classes(["b"]).is_ok());
            assert!(Widget::new("x").verify_classes(["a", "b"]).is_ok());
        }

        #[test]
        fn test_empty_expected_passes() {
            assert!(Widget::new("x").verify_classes(Vec::<String>::new()).is_ok());
            assert!(verify_classes!(Widget::new("x")).is_ok());
        }

        #[test]
        fn test_variadic_macro() {
            assert!(verify_classes!(Widget::new("x"), "a", "b").is_ok());
            let err = verify_classes!(Widget::new("x"), "a", "z",).unwrap_err();
            assert_eq!(err.message(), "Element is missing expected classes: z");
        }
    }

    mod capture_tests {
        use super::*;

        #[test]
        fn test_capture_returns_value_and_result() {
            let widget = Widget::new("Orders");
            let (back, text) = (&widget).capture(|w| w.text());
            assert!(std::ptr::eq(back, &widget));
            assert_eq!(text, "Orders");
        }

        #[test]
        fn test_capture_mid_chain() {
            let widget = Widget::new("Orders");
            let (back, len) = (&widget)
                .verify_text("Orders")
                .unwrap()
                .capture(|w| w.text.len());
            assert_eq!(len, 6);
            assert!(back.verify_text_contains("Ord").is_ok());
        }
    }

    mod property_tests {
        use super::*;
        use crate::dom::DomNode;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_predicate_outcome_matches(text in ".{0,16}", expected in any::<bool>()) {
                let widget = Widget::new(&text);
                let result = (&widget).verify("flag", |_| expected);
                prop_assert_eq!(result.is_ok(), expected);
            }

            #[test]
            fn prop_text_checks_agree_with_str(actual in "[a-c]{0,4}", expected in "[a-c]{0,2}") {
                let widget = Widget::new(&actual);
                prop_assert_eq!((&widget).verify_text(&expected).is_ok(), actual == expected);
                prop_assert_eq!((&widget).verify_text_not(&expected).is_ok(), actual != expected);
                prop_assert_eq!((&widget).verify_text_contains(&expected).is_ok(), actual.contains(&expected));
            }

            #[test]
            fn prop_selection(actual in any::<bool>(), expected in any::<bool>()) {
                let mut widget = Widget::new("x");
                widget.selected = actual;
                let result = (&widget).verify_selected(expected);
                prop_assert_eq!(result.is_ok(), actual == expected);
                if let Err(err) = result {
                    prop_assert!(err.message().contains(&expected.to_string()));
                    prop_assert!(err.message().contains(&actual.to_string()));
                }
            }

            #[test]
            fn prop_classes_subset(expected in proptest::collection::vec("[a-d]", 0..5)) {
                let widget = Widget::new("x");
                let all_present = expected.iter().all(|c| c == "a" || c == "b");
                prop_assert_eq!((&widget).verify_classes(&expected).is_ok(), all_present);
            }

            #[test]
            fn prop_repeated_text_checks_are_idempotent(text in "[a-z]{0,8}", needle in "[a-z]{0,3}") {
                let widget = Widget::new(&text);
                let first = (&widget).verify_text_contains(&needle).is_ok();
                let second = (&widget).verify_text_contains(&needle).is_ok();
                prop_assert_eq!(first, second);
                prop_assert_eq!(
                    (&widget).verify_text(&needle).is_ok(),
                    (&widget).verify_text(&needle).is_ok()
                );
            }

            #[test]
            fn prop_repeated_presence_checks_are_idempotent(
                child_classes in proptest::collection::vec("[a-c]", 0..6),
                wanted in "[a-d]",
            ) {
                let dom = snapshot(&child_classes);
                let locator = Locator::class_name(wanted.as_str());
                let expected = child_classes.contains(&wanted);

                for _ in 0..2 {
                    prop_assert_eq!((&dom).verify_present(&locator).is_ok(), expected);
                    prop_assert_eq!((&dom).verify_absent(&locator).is_ok(), !expected);
                }
                let first = outcome((&dom).verify_present(&locator));
                let second = outcome((&dom).verify_present(&locator));
                prop_assert_eq!(first, second);
            }

            #[test]
            fn prop_repeated_class_checks_are_idempotent(expected in proptest::collection::vec("[a-d]", 0..5)) {
                let widget = Widget::new("x");
                let first = outcome((&widget).verify_classes(&expected));
                let second = outcome((&widget).verify_classes(&expected));
                prop_assert_eq!(first, second);
            }

            #[test]
            fn prop_repeated_selection_checks_are_idempotent(actual in any::<bool>(), expected in any::<bool>()) {
                let dom = DomNode::new("option").with_selected(actual);
                let first = outcome((&dom).verify_selected(expected));
                let second = outcome((&dom).verify_selected(expected));
                prop_assert_eq!(first, second);
                prop_assert_eq!(dom.selected, actual);
            }
        }

        fn outcome<T>(result: VerifyResult<T>) -> Result<(), String> {
            result.map(|_| ()).map_err(|e| e.message().to_string())
        }

        fn snapshot(child_classes: &[String]) -> DomNode {
            child_classes
                .iter()
                .fold(DomNode::new("ul"), |ul, class| {
                    ul.with_child(DomNode::new("li").with_class(class.as_str()))
                })
        }
    }
}
