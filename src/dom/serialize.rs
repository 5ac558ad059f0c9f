//! HTML serialization of the node tree.

use super::{NodeData, NodeRef, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

/// Serialize a node (itself plus its subtree). A document node serializes as
/// its children only.
pub fn to_html(node: &NodeRef) -> String {
    let mut out = String::new();
    write_node(node, false, &mut out);
    out
}

/// Serialize a node's children only (the `innerHTML` view).
pub fn inner_html(node: &NodeRef) -> String {
    let mut out = String::new();
    let raw = is_raw_text_container(node);
    for child in node.children() {
        write_node(&child, raw, &mut out);
    }
    out
}

fn is_raw_text_container(node: &NodeRef) -> bool {
    node.as_element()
        .map_or(false, |el| RAW_TEXT_ELEMENTS.contains(&el.name.as_str()))
}

fn write_node(node: &NodeRef, raw_text: bool, out: &mut String) {
    match node.data() {
        NodeData::Document => {
            for child in node.children() {
                write_node(&child, false, out);
            }
        }
        NodeData::Text(text) => {
            let text = text.borrow();
            if raw_text {
                out.push_str(&text);
            } else {
                escape_text(&text, out);
            }
        }
        NodeData::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for attr in el.attributes.borrow().iter() {
                out.push(' ');
                out.push_str(&attr.name);
                out.push_str("=\"");
                escape_attr(&attr.value, out);
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&el.name.as_str()) {
                return;
            }
            let raw = RAW_TEXT_ELEMENTS.contains(&el.name.as_str());
            for child in node.children() {
                write_node(&child, raw, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}
