//! Script re-materialization after fragment insertion.
//!
//! Parsed script nodes are inert: splicing them into the tree does not execute
//! anything. For each script under the inserted nodes we build a fresh clone
//! (attributes and inline text preserved) and substitute it in place, then
//! return the live nodes in document order so the loader can hand each one to
//! the caller's script sink exactly once.

use crate::dom::{NodeData, NodeRef};

/// Replace every inert script under `inserted` with a live clone, preserving
/// relative order. Returns the live script nodes.
pub fn activate_scripts(inserted: &[NodeRef]) -> Vec<NodeRef> {
    let mut scripts = Vec::new();
    for node in inserted {
        if node.is_element("script") {
            scripts.push(node.clone());
        }
        for descendant in node.descendants() {
            if descendant.is_element("script") {
                scripts.push(descendant);
            }
        }
    }

    let mut live = Vec::with_capacity(scripts.len());
    for inert in scripts {
        let attributes = inert
            .as_element()
            .map(|el| el.attributes.borrow().clone())
            .unwrap_or_default();
        let clone = NodeRef::new_element("script", attributes);
        let text = script_text(&inert);
        if !text.is_empty() {
            clone.append(NodeRef::new_text(&text));
        }
        inert.replace_with(clone.clone());
        live.push(clone);
    }
    live
}

/// Inline text of a script node (concatenation of its text children).
pub fn script_text(script: &NodeRef) -> String {
    let mut out = String::new();
    for child in script.children() {
        if let NodeData::Text(text) = child.data() {
            out.push_str(&text.borrow());
        }
    }
    out
}
