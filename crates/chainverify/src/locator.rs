//! Locator abstraction for element selection.
//!
//! A [`Locator`] only describes *how* to find descendant elements. Finding
//! them is the job of whatever implements [`Block`](crate::Block): a live
//! driver, or the [`DomNode`](crate::DomNode) snapshot adapter.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selector type for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// CSS selector (e.g., "div.k-grid tr.k-master-row")
    Css(String),
    /// Element id attribute
    Id(String),
    /// Single class name
    ClassName(String),
    /// Tag name
    TagName(String),
    /// Test ID selector (data-testid attribute)
    TestId(String),
    /// Text content selector (element text contains the value)
    Text(String),
    /// XPath expression
    XPath(String),
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an id selector
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Create a class name selector
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::ClassName(class.into())
    }

    /// Create a tag name selector
    #[must_use]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::TagName(tag.into())
    }

    /// Create a test ID selector
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::TestId(id.into())
    }

    /// Create a text selector
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an XPath selector
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Name of the strategy, as used in failure messages
    #[must_use]
    pub const fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "CssSelector",
            Self::Id(_) => "Id",
            Self::ClassName(_) => "ClassName",
            Self::TagName(_) => "TagName",
            Self::TestId(_) => "TestId",
            Self::Text(_) => "Text",
            Self::XPath(_) => "XPath",
        }
    }

    /// The raw selector value
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v)
            | Self::Id(v)
            | Self::ClassName(v)
            | Self::TagName(v)
            | Self::TestId(v)
            | Self::Text(v)
            | Self::XPath(v) => v,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "By.{}: {}", self.strategy(), self.value())
    }
}

/// A locator for finding elements, with an optional human description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    selector: Selector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl Locator {
    /// Create a new locator with a CSS selector
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self::from_selector(Selector::Css(selector.into()))
    }

    /// Create a locator from a selector
    #[must_use]
    pub const fn from_selector(selector: Selector) -> Self {
        Self {
            selector,
            description: None,
        }
    }

    /// Locate by element id
    #[must_use]
    pub fn id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::id(id))
    }

    /// Locate by class name
    #[must_use]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::from_selector(Selector::class_name(class))
    }

    /// Locate by tag name
    #[must_use]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::from_selector(Selector::tag_name(tag))
    }

    /// Locate by data-testid
    #[must_use]
    pub fn test_id(id: impl Into<String>) -> Self {
        Self::from_selector(Selector::test_id(id))
    }

    /// Locate by contained text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_selector(Selector::text(text))
    }

    /// Locate by XPath
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::from_selector(Selector::xpath(expr))
    }

    /// Attach a human-readable description
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Get the selector
    #[must_use]
    pub const fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Get the description, if any
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl From<Selector> for Locator {
    fn from(selector: Selector) -> Self {
        Self::from_selector(selector)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{} ({description})", self.selector),
            None => write!(f, "{}", self.selector),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_constructors() {
            assert_eq!(Selector::css("div"), Selector::Css("div".into()));
            assert_eq!(Selector::id("main"), Selector::Id("main".into()));
            assert_eq!(Selector::test_id("grid"), Selector::TestId("grid".into()));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css("div.k-grid").to_string(), "By.CssSelector: div.k-grid");
            assert_eq!(Selector::id("orders").to_string(), "By.Id: orders");
            assert_eq!(Selector::xpath("//li").to_string(), "By.XPath: //li");
        }

        #[test]
        fn test_value() {
            assert_eq!(Selector::class_name("k-item").value(), "k-item");
            assert_eq!(Selector::text("Save").value(), "Save");
        }
    }

    mod locator_tests {
        use super::*;

        #[test]
        fn test_new_is_css() {
            let locator = Locator::new("button.k-button");
            assert_eq!(locator.selector(), &Selector::css("button.k-button"));
            assert!(locator.description().is_none());
        }

        #[test]
        fn test_describe() {
            let locator = Locator::id("grid").describe("orders grid");
            assert_eq!(locator.description(), Some("orders grid"));
            assert_eq!(locator.to_string(), "By.Id: grid (orders grid)");
        }

        #[test]
        fn test_from_selector() {
            let locator: Locator = Selector::tag_name("li").into();
            assert_eq!(locator.to_string(), "By.TagName: li");
        }

        #[test]
        fn test_serde_roundtrip_keeps_description() {
            let locator = Locator::class_name("k-tabstrip").describe("tabs");
            let json = serde_json::to_string(&locator).unwrap();
            let back: Locator = serde_json::from_str(&json).unwrap();
            assert_eq!(back, locator);
        }
    }
}
