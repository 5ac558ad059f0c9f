//! Lenient HTML fragment parser.
//!
//! Parses the markup shapes real component fragments contain: elements with
//! quoted/unquoted attributes, text with basic entity references, comments,
//! void elements, and raw-text content for `<script>`/`<style>`. Doctype and
//! bogus `<!`/`<?` markup is skipped; unmatched close tags are ignored. The
//! parser never fails: malformed input degrades to text.

use super::{Attribute, NodeRef, RAW_TEXT_ELEMENTS, VOID_ELEMENTS};

/// Parse `input` into a document node whose children are the fragment's
/// top-level nodes. Empty or whitespace-only input yields a valid fragment
/// (a lone text child, or none at all).
pub fn parse_fragment(input: &str) -> NodeRef {
    let root = NodeRef::new_document();
    let mut stack: Vec<NodeRef> = vec![root.clone()];
    let mut pos = 0;

    while pos < input.len() {
        let rest = &input[pos..];
        if !rest.starts_with('<') {
            let end = rest.find('<').map_or(input.len(), |i| pos + i);
            append_text(&stack, &input[pos..end]);
            pos = end;
            continue;
        }

        if rest.starts_with("<!--") {
            pos = parse_comment(input, pos, &stack);
        } else if rest.starts_with("</") {
            pos = parse_close_tag(input, pos, &mut stack);
        } else if rest.starts_with("<!") || rest.starts_with("<?") {
            // Doctype / processing instruction / bogus comment: skip to '>'.
            pos = match rest.find('>') {
                Some(i) => pos + i + 1,
                None => input.len(),
            };
        } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            pos = parse_open_tag(input, pos, &mut stack);
        } else {
            // Literal '<' that opens no tag: treat as text.
            let end = rest[1..].find('<').map_or(input.len(), |i| pos + 1 + i);
            append_text(&stack, &input[pos..end]);
            pos = end;
        }
    }

    root
}

fn top(stack: &[NodeRef]) -> NodeRef {
    stack.last().expect("stack holds the root").clone()
}

fn append_text(stack: &[NodeRef], raw: &str) {
    if raw.is_empty() {
        return;
    }
    top(stack).append(NodeRef::new_text(&decode_entities(raw)));
}

fn parse_comment(input: &str, pos: usize, stack: &[NodeRef]) -> usize {
    let body_start = pos + 4;
    match input[body_start..].find("-->") {
        Some(i) => {
            top(stack).append(NodeRef::new_comment(&input[body_start..body_start + i]));
            body_start + i + 3
        }
        None => {
            top(stack).append(NodeRef::new_comment(&input[body_start..]));
            input.len()
        }
    }
}

fn parse_close_tag(input: &str, pos: usize, stack: &mut Vec<NodeRef>) -> usize {
    let name_start = pos + 2;
    let end = match input[name_start..].find('>') {
        Some(i) => name_start + i,
        None => return input.len(),
    };
    let name = input[name_start..end].trim().to_ascii_lowercase();
    // Pop to the nearest matching open element; ignore a stray close tag.
    if let Some(idx) = stack.iter().rposition(|n| n.is_element(&name)) {
        stack.truncate(idx.max(1));
    }
    end + 1
}

fn parse_open_tag(input: &str, pos: usize, stack: &mut Vec<NodeRef>) -> usize {
    let bytes = input.as_bytes();
    let mut cursor = pos + 1;

    let name_start = cursor;
    while cursor < input.len() && is_name_byte(bytes[cursor]) {
        cursor += 1;
    }
    let name = input[name_start..cursor].to_ascii_lowercase();

    let mut attributes = Vec::new();
    let mut self_closing = false;
    loop {
        while cursor < input.len() && bytes[cursor].is_ascii_whitespace() {
            cursor += 1;
        }
        if cursor >= input.len() {
            break;
        }
        match bytes[cursor] {
            b'>' => {
                cursor += 1;
                break;
            }
            b'/' => {
                cursor += 1;
                if cursor < input.len() && bytes[cursor] == b'>' {
                    self_closing = true;
                    cursor += 1;
                    break;
                }
            }
            _ => {
                cursor = parse_attribute(input, cursor, &mut attributes);
            }
        }
    }

    let element = NodeRef::new_element(&name, attributes);
    top(stack).append(element.clone());

    if VOID_ELEMENTS.contains(&name.as_str()) || self_closing {
        return cursor;
    }
    if RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
        return parse_raw_text(input, cursor, &name, &element);
    }
    stack.push(element);
    cursor
}

/// Collect raw text until the matching close tag (case-insensitive); the text
/// becomes a single child and is never entity-decoded.
fn parse_raw_text(input: &str, pos: usize, name: &str, element: &NodeRef) -> usize {
    let close = format!("</{}", name);
    let lower = input[pos..].to_ascii_lowercase();
    let Some(idx) = lower.find(&close) else {
        if pos < input.len() {
            element.append(NodeRef::new_text(&input[pos..]));
        }
        return input.len();
    };
    if idx > 0 {
        element.append(NodeRef::new_text(&input[pos..pos + idx]));
    }
    let after = pos + idx;
    match input[after..].find('>') {
        Some(i) => after + i + 1,
        None => input.len(),
    }
}

fn parse_attribute(input: &str, pos: usize, attributes: &mut Vec<Attribute>) -> usize {
    let bytes = input.as_bytes();
    let mut cursor = pos;

    let name_start = cursor;
    while cursor < input.len() {
        let b = bytes[cursor];
        if b.is_ascii_whitespace() || b == b'=' || b == b'>' || b == b'/' {
            break;
        }
        cursor += 1;
    }
    let name = input[name_start..cursor].to_ascii_lowercase();
    if name.is_empty() {
        // Stray byte; consume it so the caller makes progress.
        return cursor + 1;
    }

    while cursor < input.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }
    if cursor >= input.len() || bytes[cursor] != b'=' {
        attributes.push(Attribute {
            name,
            value: String::new(),
        });
        return cursor;
    }
    cursor += 1;
    while cursor < input.len() && bytes[cursor].is_ascii_whitespace() {
        cursor += 1;
    }

    let value = if cursor < input.len() && (bytes[cursor] == b'"' || bytes[cursor] == b'\'') {
        let quote = bytes[cursor];
        cursor += 1;
        let value_start = cursor;
        while cursor < input.len() && bytes[cursor] != quote {
            cursor += 1;
        }
        let raw = &input[value_start..cursor];
        if cursor < input.len() {
            cursor += 1;
        }
        decode_entities(raw)
    } else {
        let value_start = cursor;
        while cursor < input.len() {
            let b = bytes[cursor];
            if b.is_ascii_whitespace() || b == b'>' {
                break;
            }
            cursor += 1;
        }
        decode_entities(&input[value_start..cursor])
    };

    attributes.push(Attribute { name, value });
    cursor
}

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b':' || b == b'_'
}

/// Decode the entity references fragments actually use; anything unrecognized
/// is left verbatim.
pub(crate) fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let semi = rest.bytes().take(12).position(|b| b == b';');
        let Some(semi) = semi else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => decode_numeric(entity),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_numeric(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::serialize::inner_html;

    #[test]
    fn parses_nested_elements_and_text() {
        let doc = parse_fragment("<nav class=\"main\"><a href=\"/\">Home</a></nav>");
        let nav = &doc.children()[0];
        assert!(nav.is_element("nav"));
        assert_eq!(nav.attribute("class").as_deref(), Some("main"));
        let a = &nav.children()[0];
        assert!(a.is_element("a"));
        assert_eq!(a.text_contents(), "Home");
    }

    #[test]
    fn top_level_siblings_stay_ordered() {
        let doc = parse_fragment("<header>h</header><main>m</main><footer>f</footer>");
        let names: Vec<String> = doc
            .children()
            .iter()
            .map(|n| n.as_element().unwrap().name.clone())
            .collect();
        assert_eq!(names, ["header", "main", "footer"]);
    }

    #[test]
    fn void_elements_take_no_children() {
        let doc = parse_fragment("<div><img src=\"a.png\"><span>after</span></div>");
        let div = &doc.children()[0];
        let children = div.children();
        assert!(children[0].is_element("img"));
        assert_eq!(children[0].child_count(), 0);
        assert!(children[1].is_element("span"));
    }

    #[test]
    fn script_content_is_raw_text() {
        let doc = parse_fragment("<script>if (a < b && c) { go(); }</script>");
        let script = &doc.children()[0];
        assert!(script.is_element("script"));
        assert_eq!(script.text_contents(), "if (a < b && c) { go(); }");
    }

    #[test]
    fn unquoted_and_bare_attributes() {
        let doc = parse_fragment("<input type=checkbox checked>");
        let input = &doc.children()[0];
        assert_eq!(input.attribute("type").as_deref(), Some("checkbox"));
        assert_eq!(input.attribute("checked").as_deref(), Some(""));
    }

    #[test]
    fn comments_and_doctype_are_handled() {
        let doc = parse_fragment("<!DOCTYPE html><!-- note --><p>x</p>");
        let children = doc.children();
        assert_eq!(children.len(), 2);
        assert!(matches!(
            children[0].data(),
            crate::dom::NodeData::Comment(c) if c.as_str() == " note "
        ));
        assert!(children[1].is_element("p"));
    }

    #[test]
    fn stray_close_tag_is_ignored() {
        let doc = parse_fragment("</div><span>ok</span>");
        let children = doc.children();
        assert_eq!(children.len(), 1);
        assert!(children[0].is_element("span"));
    }

    #[test]
    fn unclosed_element_still_captures_text() {
        let doc = parse_fragment("<div><p>dangling");
        assert_eq!(doc.text_contents(), "dangling");
    }

    #[test]
    fn whitespace_only_input_is_valid() {
        let doc = parse_fragment("  \n\t ");
        assert_eq!(doc.children().len(), 1);
        assert_eq!(doc.text_contents(), "  \n\t ");
    }

    #[test]
    fn empty_input_is_valid() {
        let doc = parse_fragment("");
        assert_eq!(doc.children().len(), 0);
    }

    #[test]
    fn entities_are_decoded_in_text_and_attributes() {
        let doc = parse_fragment("<a title=\"A &amp; B\">&lt;tag&gt; &#169;</a>");
        let a = &doc.children()[0];
        assert_eq!(a.attribute("title").as_deref(), Some("A & B"));
        assert_eq!(a.text_contents(), "<tag> \u{a9}");
    }

    #[test]
    fn self_closing_foreign_element() {
        let doc = parse_fragment("<div><svg-icon name=\"x\"/><b>t</b></div>");
        let div = &doc.children()[0];
        let children = div.children();
        assert!(children[0].is_element("svg-icon"));
        assert_eq!(children[0].child_count(), 0);
        assert!(children[1].is_element("b"));
    }

    #[test]
    fn round_trips_typical_fragment() {
        let html = "<nav id=\"main-nav\" class=\"nav\"><ul><li><a href=\"/about\">About</a></li></ul></nav>";
        let doc = parse_fragment(html);
        assert_eq!(inner_html(&doc), html);
    }
}
