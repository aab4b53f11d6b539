//! Reactive HTML templating without a virtual DOM.
//!
//! A template is a sequence of literal markup fragments interleaved with
//! dynamic values: plain scalars, DOM nodes, reactive sources, derived
//! functions, and event handlers. Instantiating it produces a live DOM
//! subtree whose bound regions are patched in place whenever the underlying
//! sources change.
//!
//! ```
//! use sprig_core::Source;
//! use sprig_html::{Value, html};
//!
//! let name = Source::new(Value::from("world"));
//! let rendered = html!("<p>Hello, " (name.clone()) "!</p>")?;
//! assert_eq!(rendered.to_html(), "<p>Hello, world!</p>");
//!
//! name.set(Value::from("sprig"));
//! assert_eq!(rendered.to_html(), "<p>Hello, sprig!</p>");
//! # Ok::<(), sprig_html::TemplateError>(())
//! ```

mod attribute;
mod compile;
mod conditional;
mod content;
pub mod error;
mod macros;
mod render;
pub mod value;

pub use error::TemplateError;
pub use render::{DEFER_TAG, Rendered, render, render_parts};
pub use value::{Category, DerivedFn, HandlerFn, Value};
