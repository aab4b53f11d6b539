use std::cell::RefCell;
use std::rc::Rc;

use sprig_core::{Source, Subscription};
use sprig_dom::NodeRef;

use crate::error::TemplateError;
use crate::value::{Category, Value};

/// Per-binding state: the node set currently rendered for one interpolation.
/// The first node is the stable anchor that future replacements target.
struct ContentBinding {
    elements: Vec<NodeRef>,
}

/// Bind one content-position interpolation to its marker element.
///
/// Non-reactive values resolve once and install no subscription; reactive
/// and derived values re-resolve on every emission, strictly in emission
/// order, one synchronous DOM patch per notification.
pub(crate) fn bind(
    marker: NodeRef,
    value: Value,
    index: usize,
    bindings: &mut Vec<Subscription>,
) -> Result<(), TemplateError> {
    match value {
        Value::Source(source) => bind_source(marker, source, index, bindings),
        Value::Func(f) => bind_source(marker, Source::computed(move || f()), index, bindings),
        other => {
            let nodes = resolve_nodes(&other, index)?;
            marker.replace_with(&nodes);
            Ok(())
        }
    }
}

fn bind_source(
    marker: NodeRef,
    source: Source<Value>,
    index: usize,
    bindings: &mut Vec<Subscription>,
) -> Result<(), TemplateError> {
    // Initial content always comes from the current value; subscribe never
    // fires synchronously with it.
    let initial = resolve_nodes(&source.get(), index)?;
    marker.replace_with(&initial);

    let state = Rc::new(RefCell::new(ContentBinding { elements: initial }));
    let subscription = source.subscribe(move |value| {
        let fresh = resolve_nodes(value, index).unwrap_or_else(|error| panic!("{error}"));
        let mut binding = state.borrow_mut();
        // Remove everything after the anchor, then swap the anchor for the
        // new set; the anchor keeps the binding's tree position stable.
        for node in binding.elements.iter().skip(1) {
            node.remove();
        }
        if let Some(anchor) = binding.elements.first() {
            anchor.replace_with(&fresh);
        }
        tracing::trace!(argument = index, nodes = fresh.len(), "content binding updated");
        binding.elements = fresh;
    });
    bindings.push(subscription);
    Ok(())
}

/// Resolve an already-emitted value to concrete nodes.
///
/// Reactive and derived values are not renderable here: a source may not
/// emit another source. Anything that resolves to no nodes at all yields a
/// single comment so the binding keeps a stable anchor.
fn resolve_nodes(value: &Value, index: usize) -> Result<Vec<NodeRef>, TemplateError> {
    let unsupported = || TemplateError::UnsupportedValue {
        index,
        found: value.kind_name(),
    };
    let mut nodes = match value.classify().ok_or_else(&unsupported)? {
        Category::Absent => Vec::new(),
        Category::Scalar => scalar_nodes(value),
        Category::NodeSeq => {
            let Value::List(items) = value else {
                return Err(unsupported());
            };
            items.iter().flat_map(scalar_nodes).collect()
        }
        Category::Reactive | Category::Derived => return Err(unsupported()),
    };
    if nodes.is_empty() {
        nodes.push(NodeRef::comment(""));
    }
    Ok(nodes)
}

/// Materialize one scalar: strings run through the markup parser (so literal
/// markup in a string renders as elements), everything else becomes text.
fn scalar_nodes(value: &Value) -> Vec<NodeRef> {
    match value {
        Value::Str(s) => sprig_dom::parse(s),
        Value::Int(n) => vec![NodeRef::text(n.to_string())],
        Value::Float(n) => vec![NodeRef::text(n.to_string())],
        Value::Bool(b) => vec![NodeRef::text(b.to_string())],
        Value::Node(node) => vec![node.clone()],
        _ => Vec::new(),
    }
}
