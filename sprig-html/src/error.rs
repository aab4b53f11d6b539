use thiserror::Error;

/// Fatal template-construction faults.
///
/// Every variant is a programming error in the calling code, never a runtime
/// condition to tolerate: binding halts at the failing step and nothing is
/// retried. A fault hit inside a later subscription update panics with the
/// same message instead.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A declared interpolation's placeholder could not be located after
    /// parsing the compiled markup.
    #[error("could not locate placeholder for argument {index}")]
    PlaceholderNotFound { index: usize },

    /// An interpolation resolved to a value outside the classifier's
    /// categories for its position.
    #[error("unsupported placeholder value for argument {index}: {found}")]
    UnsupportedValue { index: usize, found: &'static str },

    /// An event attribute was given something other than a handler.
    #[error("attribute {attr} expects an event handler, got {found}")]
    ExpectedHandler { attr: String, found: &'static str },

    /// A `class` interpolation whose token is missing from the live class
    /// list of the owning element.
    #[error("class attribute does not contain its placeholder token {token}")]
    ClassTokenMissing { token: String },
}
