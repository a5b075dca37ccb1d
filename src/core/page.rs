// page model - the elements a form handler reads and writes
//
// elements are shared handles: cloning one gives another view of the same
// node, so a spawned submission and the renderer see the same state.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::Error;

#[derive(Debug, Default)]
struct Node {
    classes: BTreeSet<String>,
    value: String,
    inner_html: String,
}

#[derive(Debug, Clone)]
pub struct Element {
    id: String,
    node: Arc<Mutex<Node>>,
}

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node: Arc::new(Mutex::new(Node::default())),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    // a panic while holding the lock leaves plain strings behind, still usable
    fn node(&self) -> MutexGuard<'_, Node> {
        self.node.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Current value of a text input.
    pub fn value(&self) -> String {
        self.node().value.clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.node().value = value.into();
    }

    /// Raw markup held by the element, exactly as it was written.
    pub fn inner_html(&self) -> String {
        self.node().inner_html.clone()
    }

    pub fn set_inner_html(&self, markup: impl Into<String>) {
        self.node().inner_html = markup.into();
    }

    pub fn add_class(&self, class: &str) {
        self.node().classes.insert(class.to_string());
    }

    pub fn remove_class(&self, class: &str) {
        self.node().classes.remove(class);
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.node().classes.contains(class)
    }

    /// True when both handles point at the same node.
    pub fn same_node(&self, other: &Element) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// The page the question form lives on: `form`, `input`, `output` and `loading`.
    pub fn form_page() -> Self {
        let mut doc = Self::new();
        for id in ["form", "input", "output", "loading"] {
            doc.append(Element::new(id));
        }
        doc
    }

    pub fn append(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Only `#id` selectors are supported; anything else matches nothing.
    pub fn query_selector(&self, selector: &str) -> Option<Element> {
        let id = selector.strip_prefix('#')?;
        self.elements.iter().find(|e| e.id == id).cloned()
    }

    pub fn require(&self, selector: &str) -> Result<Element, Error> {
        self.query_selector(selector)
            .ok_or_else(|| Error::MissingElement(selector.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let doc = Document::form_page();
        let a = doc.query_selector("#output").unwrap();
        let b = doc.query_selector("#output").unwrap();

        a.set_inner_html("<i>x</i>");
        assert_eq!(b.inner_html(), "<i>x</i>");
        assert!(a.same_node(&b));
    }

    #[test]
    fn selector_needs_hash() {
        let doc = Document::form_page();
        assert!(doc.query_selector("form").is_none());
        assert!(doc.query_selector("#missing").is_none());
        assert!(matches!(
            doc.require("#missing"),
            Err(Error::MissingElement(s)) if s == "#missing"
        ));
    }

    #[test]
    fn class_toggle_is_a_set() {
        let form = Element::new("form");
        form.add_class("loading");
        form.add_class("loading");
        assert!(form.has_class("loading"));

        // one remove clears it no matter how many adds came before
        form.remove_class("loading");
        assert!(!form.has_class("loading"));
    }
}
