use sprig_core::{Source, Subscription};
use sprig_dom::NodeRef;

use crate::error::TemplateError;
use crate::render::DEFER_TAG;
use crate::value::Value;

/// The branch positions of one conditional. Each pair is (element,
/// placeholder comment): exactly one of the pair occupies the position at
/// any time, and the alternate branch is always the complement of the
/// primary.
struct Branches {
    primary: NodeRef,
    primary_placeholder: NodeRef,
    alternate: Option<(NodeRef, NodeRef)>,
    negated: bool,
}

impl Branches {
    fn apply(&self, raw: bool) {
        let shown = raw != self.negated;
        if shown {
            self.primary_placeholder.replace_with(&[self.primary.clone()]);
            if let Some((alternate, placeholder)) = &self.alternate {
                alternate.replace_with(&[placeholder.clone()]);
            }
        } else {
            self.primary.replace_with(&[self.primary_placeholder.clone()]);
            if let Some((alternate, placeholder)) = &self.alternate {
                placeholder.replace_with(&[alternate.clone()]);
            }
        }
        tracing::trace!(shown, "conditional branches toggled");
    }
}

/// Bind an `if`/`if-not` interpolation: swap the owning element (and its
/// adjacent `else` sibling, when present) in and out of the tree behind
/// persistent comment placeholders.
pub(crate) fn bind(
    node: NodeRef,
    attr_name: &str,
    value: Value,
    index: usize,
    bindings: &mut Vec<Subscription>,
) -> Result<(), TemplateError> {
    let mut primary = node;
    let mut alternate = primary
        .next_element_sibling()
        .filter(|sibling| sibling.attr("else").is_some());

    // Delay wrappers only exist to postpone resolution; unwrap them before
    // the state machine runs so they never appear in the output tree.
    if primary.tag().as_deref() == Some(DEFER_TAG) {
        if let Some(child) = primary.first_element_child() {
            primary.replace_with(&[child.clone()]);
            primary = child;
        }
    }
    if let Some(wrapper) = alternate.clone() {
        if wrapper.tag().as_deref() == Some(DEFER_TAG) {
            if let Some(child) = wrapper.first_element_child() {
                wrapper.replace_with(&[child.clone()]);
                alternate = Some(child);
            }
        }
    }

    primary.remove_attr(attr_name);

    let branches = Branches {
        primary,
        primary_placeholder: NodeRef::comment(""),
        alternate: alternate.map(|element| (element, NodeRef::comment(""))),
        negated: attr_name == "if-not",
    };

    match value {
        Value::Source(source) => {
            branches.apply(source.get().truthy());
            bindings.push(source.subscribe(move |value| branches.apply(value.truthy())));
        }
        Value::Func(f) => {
            let source = Source::computed(move || f());
            branches.apply(source.get().truthy());
            bindings.push(source.subscribe(move |value| branches.apply(value.truthy())));
        }
        Value::Handler(_) => {
            return Err(TemplateError::UnsupportedValue {
                index,
                found: "handler",
            });
        }
        other => branches.apply(other.truthy()),
    }
    Ok(())
}
