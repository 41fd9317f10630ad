//! DOM snapshot adapter.
//!
//! A [`DomNode`] is an element tree captured from a page (or built in code).
//! It implements every capability, so the verification chain can run against
//! a snapshot without a live driver.
//!
//! Locator support is deliberately small:
//!
//! - `Id`, `ClassName`, `TagName` (ASCII case-insensitive), `TestId`
//! - `Text`: the element's text contains the value
//! - `Css`: compound selectors (`tag#id.class[attr][attr=value]`) joined by
//!   descendant whitespace. Other combinators and pseudo-classes never match.
//! - `XPath` never matches.
//!
//! Descendant selectors only consider ancestors inside the searched subtree.

use crate::capability::{Block, Element, HasText, Matches, Selectable};
use crate::locator::{Locator, Selector};
use crate::result::ChainResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// A captured element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomNode {
    /// Tag name
    pub tag: String,
    /// Element id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// CSS classes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    /// Other attributes
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// The element's own text (excluding children)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
    /// Selected/checked state
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
    /// Child elements
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

impl DomNode {
    /// Create an empty element
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the element's own text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set the selected state
    #[must_use]
    pub const fn with_selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    /// Append a child
    #[must_use]
    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    /// Parse a snapshot from JSON
    pub fn from_json(json: &str) -> ChainResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a snapshot from a reader
    pub fn from_reader(reader: impl Read) -> ChainResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Load a snapshot file
    pub fn load(path: impl AsRef<Path>) -> ChainResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Serialize to pretty JSON
    pub fn to_json_pretty(&self) -> ChainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Attribute value, including `id` and `class`
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "id" => self.id.clone(),
            "class" if !self.classes.is_empty() => Some(self.classes.join(" ")),
            "class" => None,
            _ => self.attributes.get(name).cloned(),
        }
    }

    /// Lazily iterate descendants matching `locator`, in document order
    #[must_use]
    pub fn matching<'a>(&'a self, locator: &Locator) -> Matching<'a> {
        let matcher = Matcher::compile(locator.selector());
        let stack = self.children.iter().rev().map(|child| (child, 1)).collect();
        Matching {
            stack,
            path: vec![self],
            matcher,
        }
    }

    /// First descendant matching `locator`
    #[must_use]
    pub fn first_match(&self, locator: &Locator) -> Option<&DomNode> {
        self.matching(locator).next()
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        let own = self.text.trim();
        if !own.is_empty() {
            parts.push(own);
        }
        for child in &self.children {
            child.collect_text(parts);
        }
    }
}

impl Selectable for DomNode {
    fn is_selected(&self) -> bool {
        self.selected
    }
}

impl HasText for DomNode {
    /// Own text plus every descendant's text, whitespace-joined.
    fn text(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }
}

impl Element for DomNode {
    fn class_names(&self) -> BTreeSet<String> {
        self.classes.iter().cloned().collect()
    }
}

impl Block for DomNode {
    type Match<'a> = &'a DomNode;

    fn find_all<'a>(&'a self, locator: &'a Locator) -> Matches<'a, &'a DomNode> {
        Box::new(self.matching(locator))
    }
}

/// Lazy depth-first search over a subtree.
#[derive(Debug)]
pub struct Matching<'a> {
    stack: Vec<(&'a DomNode, usize)>,
    // ancestors of the node being examined, root first
    path: Vec<&'a DomNode>,
    matcher: Matcher,
}

impl<'a> Iterator for Matching<'a> {
    type Item = &'a DomNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            self.path.truncate(depth);
            let found = self.matcher.matches(node, &self.path);
            self.path.push(node);
            self.stack
                .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
            if found {
                return Some(node);
            }
        }
        None
    }
}

#[derive(Debug, Clone)]
enum Matcher {
    Chain(Vec<Compound>),
    Text(String),
    Never,
}

impl Matcher {
    fn compile(selector: &Selector) -> Self {
        match selector {
            Selector::Id(id) => Self::single(Compound {
                id: Some(id.clone()),
                ..Compound::default()
            }),
            Selector::ClassName(class) => Self::single(Compound {
                classes: vec![class.clone()],
                ..Compound::default()
            }),
            Selector::TagName(tag) => Self::single(Compound {
                tag: Some(tag.clone()),
                ..Compound::default()
            }),
            Selector::TestId(id) => Self::single(Compound {
                attributes: vec![("data-testid".to_string(), Some(id.clone()))],
                ..Compound::default()
            }),
            Selector::Text(text) => Self::Text(text.clone()),
            Selector::Css(css) => match parse_css(css) {
                Some(chain) => Self::Chain(chain),
                None => {
                    tracing::warn!(selector = %css, "unsupported CSS selector for snapshots; it never matches");
                    Self::Never
                }
            },
            Selector::XPath(expr) => {
                tracing::warn!(selector = %expr, "XPath is not supported for snapshots; it never matches");
                Self::Never
            }
        }
    }

    fn single(compound: Compound) -> Self {
        Self::Chain(vec![compound])
    }

    fn matches(&self, node: &DomNode, ancestors: &[&DomNode]) -> bool {
        match self {
            Self::Chain(chain) => chain_matches(chain, node, ancestors),
            Self::Text(text) => node.text().contains(text.as_str()),
            Self::Never => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, node: &DomNode) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&node.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.classes.contains(c)) {
            return false;
        }
        self.attributes
            .iter()
            .all(|(name, expected)| match (node.attribute(name), expected) {
                (Some(actual), Some(expected)) => actual == *expected,
                (Some(_), None) => true,
                (None, _) => false,
            })
    }
}

fn chain_matches(chain: &[Compound], node: &DomNode, ancestors: &[&DomNode]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !last.matches(node) {
        return false;
    }
    // descendant combinators only, so greedy nearest-first matching is exact
    let mut pending = rest.iter().rev().peekable();
    for ancestor in ancestors.iter().rev() {
        match pending.peek() {
            Some(compound) if compound.matches(ancestor) => {
                let _ = pending.next();
            }
            Some(_) => {}
            None => break,
        }
    }
    pending.peek().is_none()
}

/// Split a selector on descendant whitespace, respecting brackets and quotes.
fn split_descendants(css: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_brackets = false;
    let mut quote: Option<char> = None;

    for (i, c) in css.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') if in_brackets => quote = Some(c),
            (None, '[') => in_brackets = true,
            (None, ']') => in_brackets = false,
            (None, '>' | '+' | '~' | ',' | ':') if !in_brackets => return None,
            (None, c) if c.is_whitespace() && !in_brackets => {
                if let Some(s) = start.take() {
                    parts.push(&css[s..i]);
                }
                continue;
            }
            _ => {}
        }
        if start.is_none() {
            start = Some(i);
        }
    }
    if quote.is_some() || in_brackets {
        return None;
    }
    if let Some(s) = start {
        parts.push(&css[s..]);
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

fn parse_css(css: &str) -> Option<Vec<Compound>> {
    split_descendants(css)?
        .into_iter()
        .map(parse_compound)
        .collect()
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        let _ = chars.next();
    }
    if ident.is_empty() {
        None
    } else {
        Some(ident)
    }
}

fn parse_compound(text: &str) -> Option<Compound> {
    let mut compound = Compound::default();
    let mut chars = text.chars().peekable();

    match chars.peek() {
        Some('*') => {
            let _ = chars.next();
        }
        Some(&c) if is_ident_char(c) => compound.tag = take_ident(&mut chars),
        _ => {}
    }

    while let Some(c) = chars.next() {
        match c {
            '#' => compound.id = Some(take_ident(&mut chars)?),
            '.' => compound.classes.push(take_ident(&mut chars)?),
            '[' => {
                let body = take_bracket_body(&mut chars)?;
                compound.attributes.push(parse_attribute(&body)?);
            }
            _ => return None,
        }
    }
    Some(compound)
}

/// Consume up to the closing `]`; a `]` inside quotes is part of the value.
fn take_bracket_body(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Option<String> {
    let mut body = String::new();
    let mut quote: Option<char> = None;
    for c in chars.by_ref() {
        match (quote, c) {
            (None, ']') => return Some(body),
            (None, '\'' | '"') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            _ => {}
        }
        body.push(c);
    }
    None
}

fn parse_attribute(body: &str) -> Option<(String, Option<String>)> {
    match body.split_once('=') {
        None => {
            let name = body.trim();
            (!name.is_empty() && name.chars().all(is_ident_char))
                .then(|| (name.to_string(), None))
        }
        Some((name, value)) => {
            let name = name.trim();
            if name.is_empty() || !name.chars().all(is_ident_char) {
                // ~=, ^=, $=, *=, |= land here
                return None;
            }
            let value = value.trim();
            let unquoted = value
                .strip_prefix('\'')
                .and_then(|v| v.strip_suffix('\''))
                .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')))
                .unwrap_or(value);
            Some((name.to_string(), Some(unquoted.to_string())))
        }
    }
}
