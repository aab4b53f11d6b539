/// Interleave literal markup fragments and interpolated values.
///
/// Fragments are string literals; interpolations are parenthesized
/// expressions convertible into [`Value`](crate::Value).
///
/// ```
/// use sprig_core::Source;
/// use sprig_html::{Value, html};
///
/// let count = Source::new(Value::Int(0));
/// let rendered = html!("<p>Count is: " (count.clone()) "</p>").unwrap();
/// assert_eq!(rendered.to_html(), "<p>Count is: 0</p>");
/// ```
#[macro_export]
macro_rules! html {
    ($($segment:tt)*) => {{
        let mut parts: ::std::vec::Vec<::std::string::String> = ::std::vec::Vec::new();
        let mut args: ::std::vec::Vec<$crate::Value> = ::std::vec::Vec::new();
        $crate::html_segment!(parts, args, $($segment)*);
        if parts.len() == args.len() {
            parts.push(::std::string::String::new());
        }
        $crate::render_parts(parts, args)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! html_segment {
    ($parts:ident, $args:ident,) => {};
    ($parts:ident, $args:ident, $fragment:literal $($rest:tt)*) => {
        if $parts.len() == $args.len() {
            $parts.push(::std::string::String::from($fragment));
        } else if let ::std::option::Option::Some(last) = $parts.last_mut() {
            // two adjacent literals extend the same fragment
            last.push_str($fragment);
        }
        $crate::html_segment!($parts, $args, $($rest)*);
    };
    ($parts:ident, $args:ident, ($value:expr) $($rest:tt)*) => {
        if $parts.len() == $args.len() {
            // adjacent interpolations get an empty fragment between them
            $parts.push(::std::string::String::new());
        }
        $args.push($crate::Value::from($value));
        $crate::html_segment!($parts, $args, $($rest)*);
    };
}
