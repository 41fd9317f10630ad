//! Page Object Model support.
//!
//! Page objects are plain data: a URL pattern and a set of named locators.
//! They never search for anything themselves; pair them with a
//! [`Block`](crate::Block) and the [`Verify`](crate::Verify) chain.

use crate::locator::Locator;

/// A page or component in the UI, described by its locators.
///
/// Usually derived:
///
/// ```
/// use chainverify::{Locator, PageObject};
///
/// #[derive(PageObject)]
/// #[page(url = "/login")]
/// struct LoginPage {
///     #[locate(css = "input[name='username']")]
///     username: Locator,
///     #[locate(id = "login", desc = "submit button")]
///     submit: Locator,
/// }
///
/// let page = LoginPage::new();
/// assert_eq!(page.url_pattern(), "/login");
/// assert_eq!(page.submit.to_string(), "By.Id: login (submit button)");
/// assert_eq!(page.locators().len(), 2);
/// ```
pub trait PageObject {
    /// URL pattern that matches this page (e.g., "/login", "/grid/*")
    fn url_pattern(&self) -> &str;

    /// Every named locator the page declares, in declaration order
    fn locators(&self) -> Vec<(&'static str, &Locator)>;

    /// Page name for messages
    fn page_name(&self) -> &str {
        short_type_name::<Self>()
    }

    /// Look up a declared locator by field name
    fn locator(&self, name: &str) -> Option<&Locator> {
        self.locators()
            .into_iter()
            .find(|(field, _)| *field == name)
            .map(|(_, locator)| locator)
    }
}

/// The last path segment of a type's name, without generic arguments.
///
/// `short_type_name::<kendo::GridPage>()` is `"GridPage"`, and so is
/// `short_type_name::<&kendo::GridPage>()`. Types that are not a single path
/// (tuples, arrays, slices, fn pointers) keep their full name.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let short = base.rsplit("::").next().unwrap_or(base);
    if !short.is_empty() && short.chars().all(|c| c.is_alphanumeric() || c == '_') {
        short
    } else {
        full
    }
}
