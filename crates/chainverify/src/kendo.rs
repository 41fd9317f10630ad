//! Page objects for the KendoUI widget demos.
//!
//! These only declare locators. Verify them against a [`Block`](crate::Block):
//!
//! ```
//! use chainverify::kendo::{classes, GridPage};
//! use chainverify::{DomNode, Verify};
//!
//! let grid = GridPage::new();
//! let dom = DomNode::new("body").with_child(
//!     DomNode::new("div")
//!         .with_class(classes::WIDGET)
//!         .with_class(classes::GRID)
//!         .with_child(DomNode::new("div").with_class(classes::GRID_HEADER)),
//! );
//! assert!((&dom)
//!     .verify_present_as::<GridPage>(&grid.grid)
//!     .and_then(|d| d.verify_absent(&grid.no_records))
//!     .is_ok());
//! ```

use crate::locator::Locator;
use crate::PageObject;

/// KendoUI CSS class names.
pub mod classes {
    use crate::locator::Locator;

    pub const WIDGET: &str = "k-widget";
    pub const ITEM: &str = "k-item";
    pub const HEADER: &str = "k-header";
    pub const INPUT: &str = "k-input";
    pub const STATE_SELECTED: &str = "k-state-selected";
    pub const STATE_ACTIVE: &str = "k-state-active";
    pub const STATE_DISABLED: &str = "k-state-disabled";
    pub const STATE_FOCUSED: &str = "k-state-focused";
    pub const GRID: &str = "k-grid";
    pub const GRID_HEADER: &str = "k-grid-header";
    pub const GRID_CONTENT: &str = "k-grid-content";
    pub const GRID_NO_RECORDS: &str = "k-grid-norecords";
    pub const MASTER_ROW: &str = "k-master-row";
    pub const PAGER: &str = "k-pager-wrap";
    pub const DROPDOWN: &str = "k-dropdown";
    pub const LIST: &str = "k-list";
    pub const TABSTRIP: &str = "k-tabstrip";
    pub const TABSTRIP_ITEMS: &str = "k-tabstrip-items";
    pub const CONTENT: &str = "k-content";
    pub const PANELBAR: &str = "k-panelbar";
    pub const DATEPICKER: &str = "k-datepicker";
    pub const CALENDAR: &str = "k-calendar";

    /// Locate by a Kendo class
    #[must_use]
    pub fn locator(class: &str) -> Locator {
        Locator::class_name(class)
    }
}

/// Grid demo: rows, selection, paging.
#[derive(Debug, Clone, PartialEq, Eq, PageObject)]
#[page(url = "/kendo-ui/grid/index", name = "Grid")]
pub struct GridPage {
    #[locate(css = "div.k-grid", desc = "grid")]
    pub grid: Locator,
    #[locate(class = "k-grid-header")]
    pub header: Locator,
    #[locate(css = "div.k-grid-content tr.k-master-row", desc = "data rows")]
    pub rows: Locator,
    #[locate(css = "tr.k-master-row.k-state-selected", desc = "selected rows")]
    pub selected_rows: Locator,
    #[locate(class = "k-pager-wrap")]
    pub pager: Locator,
    #[locate(class = "k-grid-norecords", desc = "no records message")]
    pub no_records: Locator,
}

/// DropDownList demo.
#[derive(Debug, Clone, PartialEq, Eq, PageObject)]
#[page(url = "/kendo-ui/dropdownlist/index", name = "DropDownList")]
pub struct DropDownListPage {
    #[locate(css = "span.k-dropdown", desc = "dropdown")]
    pub widget: Locator,
    #[locate(css = "span.k-dropdown span.k-input", desc = "displayed value")]
    pub value: Locator,
    #[locate(css = "ul.k-list", desc = "popup list")]
    pub list: Locator,
    #[locate(css = "ul.k-list li.k-item")]
    pub items: Locator,
    #[locate(css = "ul.k-list li.k-item.k-state-selected", desc = "selected item")]
    pub selected_item: Locator,
}

/// TabStrip demo.
#[derive(Debug, Clone, PartialEq, Eq, PageObject)]
#[page(url = "/kendo-ui/tabstrip/index", name = "TabStrip")]
pub struct TabStripPage {
    #[locate(class = "k-tabstrip")]
    pub tabstrip: Locator,
    #[locate(css = "ul.k-tabstrip-items li.k-item", desc = "tabs")]
    pub tabs: Locator,
    #[locate(css = "li.k-item.k-state-active", desc = "active tab")]
    pub active_tab: Locator,
    #[locate(css = "li.k-item.k-state-disabled", desc = "disabled tab")]
    pub disabled_tab: Locator,
    #[locate(css = "div.k-content.k-state-active", desc = "active content")]
    pub active_content: Locator,
}

/// PanelBar demo.
#[derive(Debug, Clone, PartialEq, Eq, PageObject)]
#[page(url = "/kendo-ui/panelbar/index", name = "PanelBar")]
pub struct PanelBarPage {
    #[locate(id = "panelbar")]
    pub panelbar: Locator,
    #[locate(css = "ul.k-panelbar li.k-item", desc = "panel items")]
    pub items: Locator,
    #[locate(css = "li.k-item.k-state-active", desc = "expanded panel")]
    pub expanded: Locator,
    #[locate(class = "k-header", desc = "panel headers")]
    pub headers: Locator,
}

/// DatePicker demo.
#[derive(Debug, Clone, PartialEq, Eq, PageObject)]
#[page(url = "/kendo-ui/datepicker/index", name = "DatePicker")]
pub struct DatePickerPage {
    #[locate(css = "span.k-datepicker")]
    pub picker: Locator,
    #[locate(id = "datepicker", desc = "date input")]
    pub input: Locator,
    #[locate(class = "k-calendar")]
    pub calendar: Locator,
    #[locate(css = "div.k-calendar td.k-state-selected", desc = "selected day")]
    pub selected_day: Locator,
}
