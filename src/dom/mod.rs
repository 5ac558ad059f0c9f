//! In-memory HTML tree the loader splices fragments into.
//!
//! Small `Rc`-based node structure: enough DOM surface for fragment insertion
//! (append/prepend/replace, attribute access, node substitution for script
//! re-materialization) without a full browser engine behind it.

pub mod images;
pub mod parse;
pub mod select;
pub mod serialize;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Elements whose content model is raw text: children are emitted verbatim by
/// the serializer and parsed without markup interpretation.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Void elements: no children, no close tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta",
    "param", "source", "track", "wbr",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[derive(Debug)]
pub struct ElementData {
    /// Tag name, lowercased at parse/construction time.
    pub name: String,
    /// Attributes in source order; names lowercased.
    pub attributes: RefCell<Vec<Attribute>>,
}

#[derive(Debug)]
pub enum NodeData {
    Document,
    Element(ElementData),
    Text(RefCell<String>),
    Comment(String),
}

#[derive(Debug)]
pub struct Node {
    data: NodeData,
    parent: RefCell<Weak<Node>>,
    children: RefCell<Vec<NodeRef>>,
}

/// Shared handle to a node. Cheap to clone; equality is pointer identity.
#[derive(Clone)]
pub struct NodeRef(pub(crate) Rc<Node>);

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({:?})", self.0.data)
    }
}

impl NodeRef {
    fn new(data: NodeData) -> Self {
        Self(Rc::new(Node {
            data,
            parent: RefCell::new(Weak::new()),
            children: RefCell::new(Vec::new()),
        }))
    }

    pub fn new_document() -> Self {
        Self::new(NodeData::Document)
    }

    pub fn new_element(name: &str, attributes: Vec<Attribute>) -> Self {
        Self::new(NodeData::Element(ElementData {
            name: name.to_ascii_lowercase(),
            attributes: RefCell::new(attributes),
        }))
    }

    pub fn new_text(text: &str) -> Self {
        Self::new(NodeData::Text(RefCell::new(text.to_string())))
    }

    pub fn new_comment(text: &str) -> Self {
        Self::new(NodeData::Comment(text.to_string()))
    }

    pub fn data(&self) -> &NodeData {
        &self.0.data
    }

    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.0.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// True for an element with the given (lowercase) tag name.
    pub fn is_element(&self, name: &str) -> bool {
        self.as_element().map_or(false, |el| el.name == name)
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.0.parent.borrow().upgrade().map(NodeRef)
    }

    /// Snapshot of the current children, in order.
    pub fn children(&self) -> Vec<NodeRef> {
        self.0.children.borrow().clone()
    }

    pub fn child_count(&self) -> usize {
        self.0.children.borrow().len()
    }

    /// Detach from the current parent, if any.
    pub fn detach(&self) {
        if let Some(parent) = self.parent() {
            let mut siblings = parent.0.children.borrow_mut();
            if let Some(idx) = siblings.iter().position(|c| c == self) {
                siblings.remove(idx);
            }
        }
        *self.0.parent.borrow_mut() = Weak::new();
    }

    /// Append `child` as the last child, detaching it from any previous parent.
    pub fn append(&self, child: NodeRef) {
        child.detach();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        self.0.children.borrow_mut().push(child);
    }

    /// Insert `child` at `index` (clamped to the child count).
    pub fn insert_child(&self, index: usize, child: NodeRef) {
        child.detach();
        *child.0.parent.borrow_mut() = Rc::downgrade(&self.0);
        let mut children = self.0.children.borrow_mut();
        let index = index.min(children.len());
        children.insert(index, child);
    }

    /// Replace this node with `new` in the parent's child list, keeping the
    /// position. No-op if this node has no parent.
    pub fn replace_with(&self, new: NodeRef) {
        let Some(parent) = self.parent() else { return };
        new.detach();
        let mut siblings = parent.0.children.borrow_mut();
        if let Some(idx) = siblings.iter().position(|c| c == self) {
            *new.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
            siblings[idx] = new;
            *self.0.parent.borrow_mut() = Weak::new();
        }
    }

    /// Remove all children.
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut *self.0.children.borrow_mut());
        for child in children {
            *child.0.parent.borrow_mut() = Weak::new();
        }
    }

    /// All descendants in document (preorder) order, excluding `self`.
    pub fn descendants(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        collect_descendants(self, &mut out);
        out
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_contents(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        let el = self.as_element()?;
        let name = name.to_ascii_lowercase();
        el.attributes
            .borrow()
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.clone())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Set (or replace) an attribute. No-op on non-element nodes.
    pub fn set_attribute(&self, name: &str, value: &str) {
        let Some(el) = self.as_element() else { return };
        let name = name.to_ascii_lowercase();
        let mut attrs = el.attributes.borrow_mut();
        if let Some(attr) = attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            attrs.push(Attribute {
                name,
                value: value.to_string(),
            });
        }
    }
}

fn collect_descendants(node: &NodeRef, out: &mut Vec<NodeRef>) {
    for child in node.children() {
        out.push(child.clone());
        collect_descendants(&child, out);
    }
}

fn collect_text(node: &NodeRef, out: &mut String) {
    if let NodeData::Text(text) = node.data() {
        out.push_str(&text.borrow());
    }
    for child in node.children() {
        collect_text(&child, out);
    }
}
