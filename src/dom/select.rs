//! Simple selector matching for insertion targets.
//!
//! Supports the compound simple selectors the page glue actually uses:
//! `tag`, `#id`, `.class`, and combinations such as `nav#main.sticky`.
//! Combinators, attribute selectors, and pseudo-classes are not supported;
//! an unsupported selector matches nothing.

use super::NodeRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Selector {
    /// Parse a compound simple selector. Returns `None` for empty input or
    /// syntax outside the supported subset.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() || !input.chars().all(is_selector_char) {
            return None;
        }

        let mut selector = Selector::default();
        const MARKERS: &[char] = &['#', '.'];
        let mut rest = input;
        if !rest.starts_with(MARKERS) {
            let end = rest.find(MARKERS).unwrap_or(rest.len());
            selector.tag = Some(rest[..end].to_ascii_lowercase());
            rest = &rest[end..];
        }
        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let part = &rest[1..];
            let end = part.find(MARKERS).unwrap_or(part.len());
            let name = &part[..end];
            if name.is_empty() {
                return None;
            }
            match marker {
                b'#' => selector.id = Some(name.to_string()),
                b'.' => selector.classes.push(name.to_string()),
                _ => return None,
            }
            rest = &part[end..];
        }
        Some(selector)
    }

    pub fn matches(&self, node: &NodeRef) -> bool {
        let Some(el) = node.as_element() else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if el.name != *tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.attribute("id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.is_empty() {
            let class_attr = node.attribute("class").unwrap_or_default();
            let classes: Vec<&str> = class_attr.split_ascii_whitespace().collect();
            if !self.classes.iter().all(|c| classes.contains(&c.as_str())) {
                return false;
            }
        }
        true
    }
}

fn is_selector_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '#' | '.' | '-' | '_' | ':')
}

/// First node under `root` (document order) matching `selector`, like
/// `querySelector`. `None` when nothing matches or the selector is
/// unsupported.
pub fn select_first(root: &NodeRef, selector: &str) -> Option<NodeRef> {
    let selector = Selector::parse(selector)?;
    root.descendants().into_iter().find(|n| selector.matches(n))
}
