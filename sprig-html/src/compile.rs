use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

// Process-wide instance counter; makes every placeholder token unique across
// nested and concurrent template instantiations.
static NEXT_INSTANCE: AtomicUsize = AtomicUsize::new(0);

pub(crate) fn next_instance() -> usize {
    NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed)
}

pub(crate) fn placeholder_token(instance: usize, index: usize) -> String {
    format!("_sp_{instance}_{index}_")
}

pub(crate) struct Compiled {
    pub instance: usize,
    pub markup: String,
    /// Argument indices that sit in element content (the rest are attribute
    /// positions).
    pub content_positions: HashSet<usize>,
}

/// Single pass over the literal fragments: decide per interpolation whether
/// it sits in element content or inside an attribute value, and substitute
/// the matching placeholder shape.
///
/// Position detection compares cumulative `<` and `>` counts across
/// everything emitted so far: equal counts mean we are between tags, unequal
/// counts mean an open tag is still unterminated. This is a structural
/// precondition on templates, not a parse: an interpolation must never fall
/// mid-tag-name, and literal fragments must not carry `<` or `>` inside
/// quoted attribute text.
///
/// The first fragment is trimmed at the start and the last at the end so
/// indented template literals do not produce stray text nodes; interior
/// fragments are kept verbatim.
pub(crate) fn compile(parts: &[&str], arg_count: usize) -> Compiled {
    let instance = next_instance();
    let mut markup = String::new();
    let mut content_positions = HashSet::new();
    let mut opens = 0usize;
    let mut closes = 0usize;

    for (i, part) in parts.iter().enumerate() {
        let mut part = *part;
        if i == 0 {
            part = part.trim_start();
        }
        if i == parts.len() - 1 {
            part = part.trim_end();
        }
        markup.push_str(part);
        opens += part.matches('<').count();
        closes += part.matches('>').count();

        if i < arg_count {
            let token = placeholder_token(instance, i);
            if opens == closes {
                // between tags: a dedicated, addressable marker element
                content_positions.insert(i);
                markup.push_str(&format!("<template id=\"{token}\"></template>"));
            } else {
                // inside an unterminated tag: the bare token in attribute text
                markup.push_str(&token);
            }
        }
    }

    Compiled {
        instance,
        markup,
        content_positions,
    }
}
