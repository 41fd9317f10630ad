//! chainverify: chainable verifications for browser-automation element models
//!
//! Every check takes the value it verifies and hands it back on success, so
//! checks read as one chain and the first failure stops it:
//!
//! ```
//! use chainverify::{verify_classes, DomNode, Locator, Verify, VerifyResult};
//!
//! fn active_tab(tab: &DomNode) -> VerifyResult<String> {
//!     let tab = tab.verify_selected(true)?.verify_text_not("")?;
//!     let (tab, title) = verify_classes!(tab, "k-item", "k-state-active")?.capture(|t| t.text.clone());
//!     tab.verify_absent(&Locator::class_name("k-state-disabled"))?;
//!     Ok(title)
//! }
//!
//! let tab = DomNode::new("li")
//!     .with_class("k-item")
//!     .with_class("k-state-active")
//!     .with_selected(true)
//!     .with_text("Overview");
//! assert_eq!(active_tab(&tab).unwrap(), "Overview");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Verify    ┌────────────────────────────────┐
//! │  test code   │────────────►│ capability traits              │
//! │  page objects│             │ Selectable HasText Block Element│
//! └──────────────┘             └───────────────┬────────────────┘
//!                                              │ implemented by
//!                              ┌───────────────┴────────────────┐
//!                              │ live driver types │ DomNode     │
//!                              └────────────────────────────────┘
//! ```

// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

// Lets the derive macro's `::chainverify::` paths resolve inside this crate.
extern crate self as chainverify;

mod capability;
mod dom;
mod locator;
mod page_object;
mod result;
mod verify;

/// KendoUI page objects and class names
#[cfg(feature = "derive")]
pub mod kendo;

/// Declarative verification plans run against DOM snapshots
pub mod plan;

pub use capability::{Block, Element, HasText, Matches, Selectable};
pub use dom::{DomNode, Matching};
pub use locator::{Locator, Selector};
pub use page_object::{short_type_name, PageObject};
pub use result::{BoxError, ChainError, ChainResult, VerificationError, VerifyResult};
pub use verify::Verify;

#[cfg(feature = "derive")]
pub use chainverify_derive::PageObject;

/// Everything a test usually needs
pub mod prelude {
    pub use crate::{
        verify_classes, Block, DomNode, Element, HasText, Locator, PageObject, Selectable,
        Selector, Verify, VerificationError, VerifyResult,
    };
}
