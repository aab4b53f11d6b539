use std::fmt;
use std::rc::Rc;

use sprig_core::Source;
use sprig_dom::{Event, NodeRef};

/// A derived-function interpolation: re-evaluated whenever any reactive
/// source it reads changes.
pub type DerivedFn = Rc<dyn Fn() -> Value>;

/// An event-handler interpolation, legal only on `on*` attributes.
pub type HandlerFn = Rc<dyn Fn(&Event)>;

/// One interpolated template argument.
///
/// This is the engine's single dynamic-value type: every interpolation,
/// initial or emitted later by a source, is resolved through the same
/// [`Value::classify`] path.
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Node(NodeRef),
    List(Vec<Value>),
    Source(Source<Value>),
    Func(DerivedFn),
    Handler(HandlerFn),
}

/// The classifier's categories. Every binder decides its behavior from one
/// of these, never from ad-hoc type tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Null, empty string, or empty list: renders as a comment anchor.
    Absent,
    /// A reactive source: bind directly.
    Reactive,
    /// A plain function: wrapped in a derived source before binding.
    Derived,
    /// A sequence of scalars and nodes, rendered in order.
    NodeSeq,
    /// A single string, number, boolean, or DOM node.
    Scalar,
}

impl Value {
    /// Build a derived-function value.
    pub fn func(f: impl Fn() -> Value + 'static) -> Value {
        Value::Func(Rc::new(f))
    }

    /// Build an event-handler value.
    pub fn handler(f: impl Fn(&Event) + 'static) -> Value {
        Value::Handler(Rc::new(f))
    }

    /// Assign this value to one of the five categories, or `None` when it is
    /// not a supported placeholder value (e.g. a handler outside an event
    /// attribute, or a list with non-renderable elements).
    pub fn classify(&self) -> Option<Category> {
        match self {
            Value::Null => Some(Category::Absent),
            Value::Str(s) if s.is_empty() => Some(Category::Absent),
            Value::List(items) if items.is_empty() => Some(Category::Absent),
            Value::Source(_) => Some(Category::Reactive),
            Value::Func(_) => Some(Category::Derived),
            Value::List(items) => items
                .iter()
                .all(|item| {
                    matches!(
                        item,
                        Value::Bool(_)
                            | Value::Int(_)
                            | Value::Float(_)
                            | Value::Str(_)
                            | Value::Node(_)
                    )
                })
                .then_some(Category::NodeSeq),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_) | Value::Node(_) => {
                Some(Category::Scalar)
            }
            Value::Handler(_) => None,
        }
    }

    /// The value's display form for attribute text and class names.
    /// `None` for shapes that have no textual form.
    pub(crate) fn scalar_text(&self) -> Option<String> {
        match self {
            Value::Null => Some(String::new()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Int(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::Str(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// Truthiness for conditional attributes.
    pub(crate) fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Node(_) | Value::Source(_) | Value::Func(_) | Value::Handler(_) => true,
        }
    }

    /// Convenience accessor for integer-valued sources.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Convenience accessor for string-valued sources.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Node(_) => "node",
            Value::List(_) => "list",
            Value::Source(_) => "source",
            Value::Func(_) => "function",
            Value::Handler(_) => "handler",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Float(n) => write!(f, "Float({n})"),
            Value::Str(s) => write!(f, "Str({s:?})"),
            Value::Node(n) => write!(f, "Node({})", n.to_html()),
            Value::List(items) => write!(f, "List(len={})", items.len()),
            Value::Source(_) => write!(f, "Source(..)"),
            Value::Func(_) => write!(f, "Func(..)"),
            Value::Handler(_) => write!(f, "Handler(..)"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl From<NodeRef> for Value {
    fn from(node: NodeRef) -> Value {
        Value::Node(node)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::List(items)
    }
}

impl From<Vec<NodeRef>> for Value {
    fn from(nodes: Vec<NodeRef>) -> Value {
        Value::List(nodes.into_iter().map(Value::Node).collect())
    }
}

impl From<Source<Value>> for Value {
    fn from(source: Source<Value>) -> Value {
        Value::Source(source)
    }
}
