use std::cell::RefCell;
use std::rc::{Rc, Weak};

mod parse;
pub use parse::parse;

/// Void elements that never have closing tags.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A synthetic event delivered to listeners registered on an element.
pub struct Event {
    pub name: String,
    pub target: NodeRef,
}

impl Event {
    /// The live `value` of the event's target element.
    pub fn value(&self) -> String {
        self.target.value()
    }
}

/// Boxed, shared event callback.
pub type Listener = Rc<dyn Fn(&Event)>;

enum NodeKind {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        listeners: Vec<(String, Listener)>,
        // The live `value` property, distinct from the `value` attribute.
        value: Option<String>,
    },
    Text(String),
    Comment(String),
}

struct NodeData {
    kind: NodeKind,
    parent: Weak<RefCell<NodeData>>,
    children: Vec<NodeRef>,
}

/// Shared handle to one live node. Clones are identity-preserving: two
/// handles compare equal iff they point at the same node.
pub struct NodeRef(Rc<RefCell<NodeData>>);

impl Clone for NodeRef {
    fn clone(&self) -> Self {
        NodeRef(self.0.clone())
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
impl Eq for NodeRef {}

impl std::fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Element { tag, attrs, value, .. } => f
                .debug_struct("Element")
                .field("tag", tag)
                .field("attrs", attrs)
                .field("value", value)
                .field("children", &data.children.len())
                .finish(),
            NodeKind::Text(text) => f.debug_tuple("Text").field(text).finish(),
            NodeKind::Comment(text) => f.debug_tuple("Comment").field(text).finish(),
        }
    }
}

impl NodeRef {
    fn new(kind: NodeKind) -> Self {
        NodeRef(Rc::new(RefCell::new(NodeData {
            kind,
            parent: Weak::new(),
            children: Vec::new(),
        })))
    }

    pub fn element(tag: impl Into<String>) -> Self {
        NodeRef::new(NodeKind::Element {
            tag: tag.into(),
            attrs: Vec::new(),
            listeners: Vec::new(),
            value: None,
        })
    }

    pub fn text(text: impl Into<String>) -> Self {
        NodeRef::new(NodeKind::Text(text.into()))
    }

    pub fn comment(text: impl Into<String>) -> Self {
        NodeRef::new(NodeKind::Comment(text.into()))
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.0.borrow().kind, NodeKind::Comment(_))
    }

    /// Tag name for elements, `None` otherwise.
    pub fn tag(&self) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { tag, .. } => Some(tag.clone()),
            _ => None,
        }
    }

    // ── attributes ──────────────────────────────────────────────────────

    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone()),
            _ => None,
        }
    }

    pub fn set_attr(&self, name: &str, value: impl Into<String>) {
        if let NodeKind::Element { attrs, .. } = &mut self.0.borrow_mut().kind {
            let value = value.into();
            match attrs.iter_mut().find(|(k, _)| k == name) {
                Some(entry) => entry.1 = value,
                None => attrs.push((name.to_string(), value)),
            }
        }
    }

    pub fn remove_attr(&self, name: &str) {
        if let NodeKind::Element { attrs, .. } = &mut self.0.borrow_mut().kind {
            attrs.retain(|(k, _)| k != name);
        }
    }

    pub fn attr_names(&self) -> Vec<String> {
        match &self.0.borrow().kind {
            NodeKind::Element { attrs, .. } => attrs.iter().map(|(k, _)| k.clone()).collect(),
            _ => Vec::new(),
        }
    }

    // ── class list ──────────────────────────────────────────────────────

    fn class_tokens(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class_tokens().iter().any(|c| c == class)
    }

    pub fn add_class(&self, class: &str) {
        let mut tokens = self.class_tokens();
        if !tokens.iter().any(|c| c == class) {
            tokens.push(class.to_string());
        }
        self.set_attr("class", tokens.join(" "));
    }

    pub fn remove_class(&self, class: &str) {
        let mut tokens = self.class_tokens();
        tokens.retain(|c| c != class);
        self.set_attr("class", tokens.join(" "));
    }

    // ── value property ──────────────────────────────────────────────────

    /// The live `value` property; falls back to the `value` attribute when
    /// the property was never written.
    pub fn value(&self) -> String {
        if let NodeKind::Element { value, .. } = &self.0.borrow().kind {
            if let Some(v) = value {
                return v.clone();
            }
        }
        self.attr("value").unwrap_or_default()
    }

    pub fn set_value(&self, new: impl Into<String>) {
        if let NodeKind::Element { value, .. } = &mut self.0.borrow_mut().kind {
            *value = Some(new.into());
        }
    }

    // ── events ──────────────────────────────────────────────────────────

    pub fn add_event_listener(&self, event: &str, listener: impl Fn(&Event) + 'static) {
        self.add_event_listener_rc(event, Rc::new(listener));
    }

    pub fn add_event_listener_rc(&self, event: &str, listener: Listener) {
        if let NodeKind::Element { listeners, .. } = &mut self.0.borrow_mut().kind {
            listeners.push((event.to_string(), listener));
        }
    }

    /// Invoke every listener registered for `event` on this element.
    /// Returns the number of callbacks invoked.
    pub fn dispatch(&self, event: &str) -> usize {
        let matching: Vec<Listener> = match &self.0.borrow().kind {
            NodeKind::Element { listeners, .. } => listeners
                .iter()
                .filter(|(name, _)| name == event)
                .map(|(_, l)| l.clone())
                .collect(),
            _ => Vec::new(),
        };
        let ev = Event {
            name: event.to_string(),
            target: self.clone(),
        };
        for listener in &matching {
            listener(&ev);
        }
        matching.len()
    }

    // ── tree structure ──────────────────────────────────────────────────

    pub fn parent(&self) -> Option<NodeRef> {
        self.0.borrow().parent.upgrade().map(NodeRef)
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0.borrow().children.clone()
    }

    /// Detach `child` from wherever it lives and append it here.
    pub fn append_child(&self, child: NodeRef) {
        child.remove();
        child.0.borrow_mut().parent = Rc::downgrade(&self.0);
        self.0.borrow_mut().children.push(child);
    }

    /// Detach this node from its parent. No-op when already detached.
    pub fn remove(&self) {
        let Some(parent) = self.parent() else { return };
        parent.0.borrow_mut().children.retain(|c| c != self);
        self.0.borrow_mut().parent = Weak::new();
    }

    /// Replace this node with `replacements` at its position in the parent.
    /// No-op when detached. Replacement nodes are moved out of their current
    /// positions first.
    pub fn replace_with(&self, replacements: &[NodeRef]) {
        let Some(parent) = self.parent() else { return };
        let keeps_self = replacements.iter().any(|r| r == self);
        for replacement in replacements {
            if replacement != self {
                replacement.remove();
            }
        }
        {
            let mut parent_data = parent.0.borrow_mut();
            let Some(index) = parent_data.children.iter().position(|c| c == self) else {
                return;
            };
            parent_data
                .children
                .splice(index..index + 1, replacements.iter().cloned());
        }
        for replacement in replacements {
            replacement.0.borrow_mut().parent = Rc::downgrade(&parent.0);
        }
        if !keeps_self {
            self.0.borrow_mut().parent = Weak::new();
        }
    }

    pub fn first_element_child(&self) -> Option<NodeRef> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|c| c.is_element())
            .cloned()
    }

    pub fn next_element_sibling(&self) -> Option<NodeRef> {
        let parent = self.parent()?;
        let siblings = parent.0.borrow();
        let index = siblings.children.iter().position(|c| c == self)?;
        siblings.children[index + 1..]
            .iter()
            .find(|c| c.is_element())
            .cloned()
    }

    /// Every element below this node, in document order (self excluded).
    pub fn descendant_elements(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        fn walk(node: &NodeRef, out: &mut Vec<NodeRef>) {
            for child in node.0.borrow().children.iter() {
                if child.is_element() {
                    out.push(child.clone());
                }
                walk(child, out);
            }
        }
        walk(self, &mut out);
        out
    }

    /// Concatenated text of this node and everything below it.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        fn walk(node: &NodeRef, out: &mut String) {
            let data = node.0.borrow();
            if let NodeKind::Text(t) = &data.kind {
                out.push_str(t);
            }
            for child in data.children.iter() {
                walk(child, out);
            }
        }
        walk(self, &mut out);
        out
    }

    // ── serialization ───────────────────────────────────────────────────

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        let data = self.0.borrow();
        match &data.kind {
            NodeKind::Text(t) => out.push_str(&escape_text(t)),
            NodeKind::Comment(t) => {
                out.push_str("<!--");
                out.push_str(t);
                out.push_str("-->");
            }
            NodeKind::Element { tag, attrs, .. } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if is_void(tag) {
                    return;
                }
                for child in data.children.iter() {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

/// Serialize an ordered node list.
pub fn to_html(nodes: &[NodeRef]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.write_html(&mut out);
    }
    out
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;")
}

fn escape_attr(text: &str) -> String {
    text.replace('&', "&amp;").replace('"', "&quot;")
}
