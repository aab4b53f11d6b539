use std::cell::RefCell;
use std::rc::Rc;

use sprig_core::{Source, Subscription};
use sprig_dom::NodeRef;

use crate::conditional;
use crate::error::TemplateError;
use crate::value::Value;

/// Bind one attribute-position interpolation to the element owning it.
///
/// Dispatch order: conditional attributes, `class`, event attributes, then
/// the generic textual splice (which also carries the `value` special case).
pub(crate) fn bind(
    node: NodeRef,
    attr_name: &str,
    value: Value,
    token: &str,
    index: usize,
    bindings: &mut Vec<Subscription>,
) -> Result<(), TemplateError> {
    if attr_name == "if" || attr_name == "if-not" {
        return conditional::bind(node, attr_name, value, index, bindings);
    }

    if attr_name == "class" {
        return bind_class(node, value, token, index, bindings);
    }

    if let Some(event) = attr_name.strip_prefix("on") {
        let Value::Handler(handler) = value else {
            return Err(TemplateError::ExpectedHandler {
                attr: attr_name.to_string(),
                found: value.kind_name(),
            });
        };
        node.add_event_listener_rc(event, handler);
        node.remove_attr(attr_name);
        return Ok(());
    }

    bind_text(node, attr_name, value, token, index, bindings)
}

/// Generic attribute binding: the literal attribute text is split once on
/// the token; prefix and suffix captured here survive every later rewrite.
fn bind_text(
    node: NodeRef,
    attr_name: &str,
    value: Value,
    token: &str,
    index: usize,
    bindings: &mut Vec<Subscription>,
) -> Result<(), TemplateError> {
    let attr_text = node.attr(attr_name).unwrap_or_default();
    let Some((prefix, suffix)) = attr_text
        .split_once(token)
        .map(|(p, s)| (p.to_string(), s.to_string()))
    else {
        return Err(TemplateError::PlaceholderNotFound { index });
    };

    let source = match value {
        Value::Source(source) => {
            if attr_name == "value" {
                // Two-way: user input flows back into the source.
                let writeback = source.clone();
                node.add_event_listener("input", move |event| {
                    writeback.set(Value::Str(event.value()));
                });
            }
            source
        }
        Value::Func(f) => Source::computed(move || f()),
        other => {
            let text = scalar_attr_text(&other, index)?;
            set_node_attribute(&node, attr_name, &format!("{prefix}{text}{suffix}"));
            return Ok(());
        }
    };

    let initial = scalar_attr_text(&source.get(), index)?;
    set_node_attribute(&node, attr_name, &format!("{prefix}{initial}{suffix}"));

    let attr_name = attr_name.to_string();
    let subscription = source.subscribe(move |value| {
        let text = scalar_attr_text(value, index).unwrap_or_else(|error| panic!("{error}"));
        set_node_attribute(&node, &attr_name, &format!("{prefix}{text}{suffix}"));
    });
    bindings.push(subscription);
    Ok(())
}

/// `class` binding: the token must already sit in the live class list; the
/// binding swaps it for the value and tracks the applied class across
/// updates.
fn bind_class(
    node: NodeRef,
    value: Value,
    token: &str,
    index: usize,
    bindings: &mut Vec<Subscription>,
) -> Result<(), TemplateError> {
    if !node.has_class(token) {
        return Err(TemplateError::ClassTokenMissing {
            token: token.to_string(),
        });
    }

    let source = match value {
        Value::Source(source) => source,
        Value::Func(f) => Source::computed(move || f()),
        other => {
            let class = scalar_attr_text(&other, index)?;
            if !class.is_empty() {
                node.add_class(&class);
            }
            node.remove_class(token);
            return Ok(());
        }
    };

    let initial = scalar_attr_text(&source.get(), index)?;
    node.remove_class(token);
    if !initial.is_empty() {
        node.add_class(&initial);
    }

    // Per-binding record of the class applied by the latest update.
    let current: Rc<RefCell<Option<String>>> = Rc::new(RefCell::new(if initial.is_empty() {
        None
    } else {
        Some(initial)
    }));
    let subscription = source.subscribe(move |value| {
        let class = scalar_attr_text(value, index).unwrap_or_else(|error| panic!("{error}"));
        if let Some(previous) = current.borrow_mut().take() {
            node.remove_class(&previous);
        }
        if !class.is_empty() {
            node.add_class(&class);
            *current.borrow_mut() = Some(class);
        }
    });
    bindings.push(subscription);
    Ok(())
}

fn scalar_attr_text(value: &Value, index: usize) -> Result<String, TemplateError> {
    value.scalar_text().ok_or(TemplateError::UnsupportedValue {
        index,
        found: value.kind_name(),
    })
}

/// `value` writes go to the element's live value property so form controls
/// reflect them; everything else is a plain attribute write.
fn set_node_attribute(node: &NodeRef, attr_name: &str, text: &str) {
    if attr_name == "value" {
        node.set_value(text);
    } else {
        node.set_attr(attr_name, text);
    }
}
