use std::cell::RefCell;
use std::rc::Rc;

use sprig_core::{Subscription, defer, flush_deferred};
use sprig_dom::NodeRef;

use crate::attribute;
use crate::compile::{compile, placeholder_token};
use crate::content;
use crate::error::TemplateError;
use crate::value::Value;

/// Tag of the wrapper element that delays resolution of the attributes on it
/// until every other binding of the template instance has completed.
pub const DEFER_TAG: &str = "defer-slot";

/// A live-bound template fragment: the root nodes plus the disposer handles
/// of every subscription installed while binding.
///
/// Dropping a `Rendered` does NOT tear its bindings down; call
/// [`Rendered::dispose`] for that. Templates that are never disposed keep
/// their subscriptions registered for the life of their sources.
pub struct Rendered {
    nodes: Vec<NodeRef>,
    bindings: Vec<Subscription>,
}

impl std::fmt::Debug for Rendered {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rendered")
            .field("nodes", &self.nodes)
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl Rendered {
    /// The template's root nodes, in document order.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    /// The single root node, when the template produced exactly one.
    pub fn node(&self) -> Option<NodeRef> {
        if self.nodes.len() == 1 {
            Some(self.nodes[0].clone())
        } else {
            None
        }
    }

    /// Serialize the fragment's current state.
    pub fn to_html(&self) -> String {
        sprig_dom::to_html(&self.nodes)
    }

    /// Tear down every reactive binding this template installed.
    pub fn dispose(self) {
        for binding in self.bindings {
            binding.unsubscribe();
        }
    }
}

impl From<Rendered> for Value {
    /// Nest a rendered template as an interpolation value. The nested
    /// template's bindings stay live but are no longer individually
    /// disposable.
    fn from(rendered: Rendered) -> Value {
        let mut nodes = rendered.nodes;
        if nodes.len() == 1 {
            Value::Node(nodes.remove(0))
        } else {
            Value::List(nodes.into_iter().map(Value::Node).collect())
        }
    }
}

enum Slot {
    Content(NodeRef),
    Attribute(NodeRef, String),
}

/// Instantiate a template: `parts` are the literal markup fragments, `args`
/// the interpolations, exactly one between each pair of fragments
/// (`parts.len() == args.len() + 1`).
pub fn render(parts: &[&str], args: Vec<Value>) -> Result<Rendered, TemplateError> {
    assert_eq!(
        parts.len(),
        args.len() + 1,
        "templates take exactly one argument between each pair of fragments"
    );

    let compiled = compile(parts, args.len());
    tracing::trace!(
        instance = compiled.instance,
        args = args.len(),
        "compiled template"
    );

    // Detached container: gives every root node a parent to splice against.
    let container = NodeRef::element("div");
    for node in sprig_dom::parse(&compiled.markup) {
        container.append_child(node);
    }

    // Locate every placeholder before any binding mutates the skeleton, so a
    // conditional that starts hidden cannot orphan a later placeholder.
    let mut slots = Vec::with_capacity(args.len());
    for index in 0..args.len() {
        let token = placeholder_token(compiled.instance, index);
        let slot = if compiled.content_positions.contains(&index) {
            find_content_marker(&container, &token).map(Slot::Content)
        } else {
            find_attribute_owner(&container, &token)
                .map(|(node, attr)| Slot::Attribute(node, attr))
        };
        slots.push(slot.ok_or(TemplateError::PlaceholderNotFound { index })?);
    }

    let bindings: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));
    let deferred_error: Rc<RefCell<Option<TemplateError>>> = Rc::new(RefCell::new(None));

    for (index, (slot, value)) in slots.into_iter().zip(args).enumerate() {
        match slot {
            Slot::Content(marker) => {
                content::bind(marker, value, index, &mut bindings.borrow_mut())?;
            }
            Slot::Attribute(node, attr) => {
                let token = placeholder_token(compiled.instance, index);
                if node.tag().as_deref() == Some(DEFER_TAG) {
                    // Resolved only after every other binding of this
                    // instance, so the wrapper can be unwrapped once its
                    // subtree is final.
                    let bindings = bindings.clone();
                    let deferred_error = deferred_error.clone();
                    defer(move || {
                        let result = attribute::bind(
                            node,
                            &attr,
                            value,
                            &token,
                            index,
                            &mut bindings.borrow_mut(),
                        );
                        if let Err(error) = result {
                            deferred_error.borrow_mut().get_or_insert(error);
                        }
                    });
                } else {
                    attribute::bind(node, &attr, value, &token, index, &mut bindings.borrow_mut())?;
                }
            }
        }
    }

    flush_deferred();
    if let Some(error) = deferred_error.borrow_mut().take() {
        return Err(error);
    }

    let bindings = bindings.borrow_mut().drain(..).collect();
    Ok(Rendered {
        nodes: container.children(),
        bindings,
    })
}

/// Owned-fragment entry point used by the `html!` macro.
pub fn render_parts(parts: Vec<String>, args: Vec<Value>) -> Result<Rendered, TemplateError> {
    let part_refs: Vec<&str> = parts.iter().map(String::as_str).collect();
    render(&part_refs, args)
}

fn find_content_marker(container: &NodeRef, token: &str) -> Option<NodeRef> {
    container
        .descendant_elements()
        .into_iter()
        .find(|element| element.attr("id").as_deref() == Some(token))
}

fn find_attribute_owner(container: &NodeRef, token: &str) -> Option<(NodeRef, String)> {
    for element in container.descendant_elements() {
        for name in element.attr_names() {
            if let Some(value) = element.attr(&name) {
                if value.contains(token) {
                    return Some((element, name));
                }
            }
        }
    }
    None
}
