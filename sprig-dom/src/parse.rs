use crate::{NodeRef, is_void};

/// Minimal hand-rolled HTML-ish parser with support for:
/// - nested elements, void elements, and self-closing tags (`<input/>`)
/// - attributes: quoted (`class="x"`), single-quoted, and boolean (`else`)
/// - comments (`<!-- -->`) and text nodes
///
/// Malformed markup never fails: unclosed tags are drained best-effort, and a
/// stray `<` that does not open a tag is treated as text. The parser is inert:
/// it builds nodes and nothing else, so embedded `<script>` content is just a
/// subtree like any other.
pub fn parse(input: &str) -> Vec<NodeRef> {
    let mut i = 0usize;
    let bytes = input.as_bytes();
    let mut stack: Vec<NodeRef> = Vec::new();
    let mut roots: Vec<NodeRef> = Vec::new();

    fn push_child(stack: &[NodeRef], roots: &mut Vec<NodeRef>, node: NodeRef) {
        if let Some(open) = stack.last() {
            open.append_child(node);
        } else {
            roots.push(node);
        }
    }

    while i < bytes.len() {
        if input[i..].starts_with("<!--") {
            // comment
            i += 4;
            let start = i;
            let end = input[i..].find("-->").map(|p| i + p).unwrap_or(bytes.len());
            push_child(&stack, &mut roots, NodeRef::comment(&input[start..end]));
            i = (end + 3).min(bytes.len());
            continue;
        }

        if bytes[i] == b'<' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            // closing tag
            i += 2;
            let tag = read_ident(bytes, &mut i);
            skip_ws(bytes, &mut i);
            if i < bytes.len() && bytes[i] == b'>' {
                i += 1;
            }
            // pop until matching tag; unclosed inner elements attach to the
            // then-current open element (best-effort recovery)
            while let Some(node) = stack.pop() {
                let matches = node.tag().as_deref() == Some(tag.as_str());
                push_child(&stack, &mut roots, node);
                if matches {
                    break;
                }
            }
            continue;
        }

        if bytes[i] == b'<' && i + 1 < bytes.len() && (bytes[i + 1] as char).is_ascii_alphabetic()
        {
            // opening or self-closing tag
            i += 1;
            let tag = read_ident(bytes, &mut i);
            let element = NodeRef::element(&tag);
            let mut self_closing = false;

            loop {
                skip_ws(bytes, &mut i);
                if i >= bytes.len() {
                    break;
                }
                match bytes[i] {
                    b'/' => {
                        // possible "/>"
                        self_closing = true;
                        i += 1;
                        skip_ws(bytes, &mut i);
                        if i < bytes.len() && bytes[i] == b'>' {
                            i += 1;
                        }
                        break;
                    }
                    b'>' => {
                        i += 1;
                        break;
                    }
                    _ => {
                        // attribute
                        if let Some((name, value)) = read_attribute(input, bytes, &mut i) {
                            element.set_attr(&name, value);
                        } else {
                            // skip unknown token
                            i += 1;
                        }
                    }
                }
            }

            if self_closing || is_void(&tag) {
                push_child(&stack, &mut roots, element);
            } else {
                stack.push(element);
            }
            continue;
        }

        // text until the next markup construct
        let start = i;
        i += 1;
        while i < bytes.len() {
            if bytes[i] == b'<'
                && (input[i..].starts_with("<!--")
                    || (i + 1 < bytes.len()
                        && (bytes[i + 1] == b'/' || (bytes[i + 1] as char).is_ascii_alphabetic())))
            {
                break;
            }
            i += 1;
        }
        push_child(&stack, &mut roots, NodeRef::text(&input[start..i]));
    }

    // Unclosed tags: drain stack to parents (best-effort)
    while let Some(node) = stack.pop() {
        push_child(&stack, &mut roots, node);
    }

    // Drop whitespace-only text nodes at the root level
    roots.retain(|n| !(n.is_text() && n.text_content().chars().all(char::is_whitespace)));

    roots
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && (bytes[*i] as char).is_whitespace() {
        *i += 1;
    }
}

fn read_ident(bytes: &[u8], i: &mut usize) -> String {
    let start = *i;
    while *i < bytes.len() {
        let c = bytes[*i] as char;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            *i += 1;
        } else {
            break;
        }
    }
    String::from_utf8(bytes[start..*i].to_vec()).unwrap_or_default()
}

fn read_attribute(input: &str, bytes: &[u8], i: &mut usize) -> Option<(String, String)> {
    let name_start = *i;
    while *i < bytes.len() {
        let c = bytes[*i] as char;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ':' {
            *i += 1;
        } else {
            break;
        }
    }
    if *i == name_start {
        return None;
    }
    let name = input[name_start..*i].to_string();

    skip_ws(bytes, i);
    let mut value = String::new();
    if *i < bytes.len() && bytes[*i] == b'=' {
        *i += 1;
        skip_ws(bytes, i);
        value = read_quoted(input, bytes, i).unwrap_or_default();
    }
    Some((name, value))
}

fn read_quoted(input: &str, bytes: &[u8], i: &mut usize) -> Option<String> {
    if *i >= bytes.len() {
        return None;
    }
    let quote = bytes[*i];
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    *i += 1;
    let start = *i;
    while *i < bytes.len() && bytes[*i] != quote {
        *i += 1;
    }
    let value = input[start..*i].to_string();
    if *i < bytes.len() {
        *i += 1; // consume closing quote
    }
    Some(value)
}
