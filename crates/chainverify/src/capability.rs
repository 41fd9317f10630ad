//! Capabilities a wrapped value may expose to the verification chain.
//!
//! Live drivers implement these on their page/element types; the
//! [`DomNode`](crate::DomNode) snapshot implements all four.

use crate::locator::Locator;
use std::collections::BTreeSet;

/// Lazy sequence of descendant matches.
pub type Matches<'a, M> = Box<dyn Iterator<Item = M> + 'a>;

/// Exposes a boolean "is selected" state (checkboxes, options, list items).
pub trait Selectable {
    /// Current selected state
    fn is_selected(&self) -> bool;
}

/// Exposes the element's visible text.
pub trait HasText {
    /// Current text
    fn text(&self) -> String;
}

/// A page, region or element that can search its descendants.
pub trait Block {
    /// Handle produced for each match
    type Match<'a>
    where
        Self: 'a;

    /// Find descendants matching `locator`, in document order.
    ///
    /// The returned iterator is lazy: callers that only need to know whether
    /// anything matched pull at most one item.
    fn find_all<'a>(&'a self, locator: &'a Locator) -> Matches<'a, Self::Match<'a>>;
}

/// Access to an underlying browser element's CSS classes.
pub trait Element {
    /// The set of class names currently on the element
    fn class_names(&self) -> BTreeSet<String>;
}

impl<T: Selectable + ?Sized> Selectable for &T {
    fn is_selected(&self) -> bool {
        (**self).is_selected()
    }
}

impl<T: HasText + ?Sized> HasText for &T {
    fn text(&self) -> String {
        (**self).text()
    }
}

impl<T: Element + ?Sized> Element for &T {
    fn class_names(&self) -> BTreeSet<String> {
        (**self).class_names()
    }
}

impl<T: Block + ?Sized> Block for &T {
    type Match<'a> = T::Match<'a>
    where
        Self: 'a;

    fn find_all<'a>(&'a self, locator: &'a Locator) -> Matches<'a, Self::Match<'a>> {
        (**self).find_all(locator)
    }
}

impl<T: Selectable + ?Sized> Selectable for Box<T> {
    fn is_selected(&self) -> bool {
        (**self).is_selected()
    }
}

impl<T: HasText + ?Sized> HasText for Box<T> {
    fn text(&self) -> String {
        (**self).text()
    }
}

impl<T: Element + ?Sized> Element for Box<T> {
    fn class_names(&self) -> BTreeSet<String> {
        (**self).class_names()
    }
}

impl<T: Block + ?Sized> Block for Box<T> {
    type Match<'a> = T::Match<'a>
    where
        Self: 'a;

    fn find_all<'a>(&'a self, locator: &'a Locator) -> Matches<'a, Self::Match<'a>> {
        (**self).find_all(locator)
    }
}
