//! Derive macro for chainverify page objects.
//!
//! Page objects declare their locators as annotated `Locator` fields instead
//! of building them by hand:
//!
//! ```ignore
//! use chainverify::{Locator, PageObject};
//!
//! #[derive(PageObject)]
//! #[page(url = "/grid/index", name = "Orders grid")]
//! struct GridPage {
//!     #[locate(css = "div.k-grid")]
//!     grid: Locator,
//!     #[locate(class = "k-pager-wrap", desc = "pager")]
//!     pager: Locator,
//! }
//!
//! let page = GridPage::new();
//! assert_eq!(page.url_pattern(), "/grid/index");
//! ```
//!
//! # Attributes
//!
//! - `#[page(url = "...")]`: URL pattern (defaults to `""`)
//! - `#[page(name = "...")]`: page name (defaults to the type name)
//! - `#[locate(<strategy> = "...")]` on a field, where strategy is one of
//!   `css`, `id`, `class`, `tag`, `test_id`, `text`, `xpath`
//! - `#[locate(..., desc = "...")]`: locator description
//!
//! Fields without `#[locate]` are filled with `Default::default()`.
//! The macro generates `new()`, a `Default` impl and the `PageObject` impl.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive `chainverify::PageObject` from `#[page]` and `#[locate]` attributes.
#[proc_macro_derive(PageObject, attributes(page, locate))]
pub fn derive_page_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_page_object(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct PageAttrs {
    url: Option<LitStr>,
    name: Option<LitStr>,
}

struct LocateAttr {
    variant: &'static str,
    value: LitStr,
    desc: Option<LitStr>,
}

fn expand_page_object(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "PageObject cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "PageObject requires a struct with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "PageObject can only be derived for structs",
            ))
        }
    };

    let page = parse_page_attrs(&input.attrs)?;
    let url = page.url.map_or_else(String::new, |lit| lit.value());

    let mut inits = Vec::new();
    let mut listed = Vec::new();
    for field in fields {
        let ident = field
            .ident
            .as_ref()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

        match parse_locate_attr(&field.attrs)? {
            Some(locate) => {
                let variant = format_ident!("{}", locate.variant);
                let value = &locate.value;
                let describe = locate.desc.map(|desc| quote!(.describe(#desc)));
                inits.push(quote! {
                    #ident: ::chainverify::Locator::from_selector(
                        ::chainverify::Selector::#variant(::std::string::String::from(#value))
                    )#describe
                });
                let key = ident.to_string();
                listed.push(quote!((#key, &self.#ident)));
            }
            None => inits.push(quote!(#ident: ::core::default::Default::default())),
        }
    }

    let page_name = page.name.map(|lit| {
        quote! {
            fn page_name(&self) -> &str {
                #lit
            }
        }
    });

    Ok(quote! {
        impl #name {
            /// Build the page with its declared locators
            #[must_use]
            pub fn new() -> Self {
                Self {
                    #(#inits),*
                }
            }
        }

        impl ::core::default::Default for #name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl ::chainverify::PageObject for #name {
            fn url_pattern(&self) -> &str {
                #url
            }

            fn locators(&self) -> ::std::vec::Vec<(&'static str, &::chainverify::Locator)> {
                ::std::vec![#(#listed),*]
            }

            #page_name
        }
    })
}

fn parse_page_attrs(attrs: &[Attribute]) -> syn::Result<PageAttrs> {
    let mut page = PageAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("page")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("url") {
                page.url = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("name") {
                page.name = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown page attribute; expected `url` or `name`"))
            }
        })?;
    }
    Ok(page)
}

fn parse_locate_attr(attrs: &[Attribute]) -> syn::Result<Option<LocateAttr>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("locate")) else {
        return Ok(None);
    };

    let mut strategy: Option<(&'static str, LitStr)> = None;
    let mut desc = None;
    attr.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .map(ToString::to_string)
            .unwrap_or_default();

        if key == "desc" {
            desc = Some(meta.value()?.parse()?);
            return Ok(());
        }

        let Some(variant) = selector_variant(&key) else {
            return Err(meta.error(
                "unknown locate key; expected css, id, class, tag, test_id, text, xpath or desc",
            ));
        };
        if strategy.is_some() {
            return Err(meta.error("only one locator strategy per field"));
        }
        strategy = Some((variant, meta.value()?.parse()?));
        Ok(())
    })?;

    let (variant, value) = strategy
        .ok_or_else(|| syn::Error::new_spanned(attr, "#[locate] needs a locator strategy"))?;
    Ok(Some(LocateAttr {
        variant,
        value,
        desc,
    }))
}

/// Map a `#[locate]` key to its `Selector` variant
fn selector_variant(key: &str) -> Option<&'static str> {
    match key {
        "css" => Some("Css"),
        "id" => Some("Id"),
        "class" => Some("ClassName"),
        "tag" => Some("TagName"),
        "test_id" => Some("TestId"),
        "text" => Some("Text"),
        "xpath" => Some("XPath"),
        _ => None,
    }
}
