//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)

use tinct_dom::{DomTree, NodeId, NodeType};

use crate::{is_raw_text_element, is_void_element};

/// "The algorithm for serializing an HTML fragment": the markup of the
/// children of `node`, as `innerHTML` would return it.
#[must_use]
pub fn serialize_children(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    let raw = tree
        .as_element(node)
        .is_some_and(|e| is_raw_text_element(&e.tag_name));
    for &child in tree.children(node) {
        write_node(tree, child, raw, &mut out);
    }
    out
}

/// The markup of `node` itself, as `outerHTML` would return it.
#[must_use]
pub fn serialize_node(tree: &DomTree, node: NodeId) -> String {
    let mut out = String::new();
    let raw = tree
        .parent(node)
        .and_then(|p| tree.as_element(p))
        .is_some_and(|e| is_raw_text_element(&e.tag_name));
    write_node(tree, node, raw, &mut out);
    out
}

fn write_node(tree: &DomTree, id: NodeId, parent_is_raw: bool, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        // "If current node is an Element ... Append a U+003C LESS-THAN SIGN
        // character (<), followed by tagname."
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            // "For each attribute that the element has, append a U+0020 SPACE
            // character, the attribute's serialized name, a U+003D EQUALS SIGN
            // character (=), a U+0022 QUOTATION MARK character ("), the
            // attribute's value, escaped as described below in attribute mode,
            // and a second U+0022 QUOTATION MARK character (")."
            for (name, value) in data.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            // "If current node serializes as void, then continue on to the
            // next child node at this point."
            if is_void_element(&data.tag_name) {
                return;
            }
            let raw = is_raw_text_element(&data.tag_name);
            for &child in tree.children(id) {
                write_node(tree, child, raw, out);
            }
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        // "If the parent of current node is a style, script, xmp, iframe,
        // noembed, noframes, or plaintext element ... then append the value of
        // current node's data literally. Otherwise, append the value of current
        // node's data, escaped as described below."
        NodeType::Text(text) if parent_is_raw => out.push_str(text),
        NodeType::Text(text) => escape_into(text, false, out),
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
        NodeType::Document | NodeType::DocumentFragment => {
            for &child in tree.children(id) {
                write_node(tree, child, false, out);
            }
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
///
/// 1. "Replace any occurrence of the "&" character by the string "&amp;"."
/// 2. "Replace any occurrences of the U+00A0 NO-BREAK SPACE character by the
///    string "&nbsp;"."
/// 3. "Replace any occurrences of the "<" character by the string "&lt;"."
/// 4. "Replace any occurrences of the ">" character by the string "&gt;"."
/// 5. "If the algorithm was invoked in the attribute mode, then replace any
///    occurrences of the """ character by the string "&quot;"."
///
/// Current browsers escape `<` and `>` in attribute mode as well, which keeps
/// attribute values inert when markup is pasted elsewhere.
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{A0}' => out.push_str("&nbsp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

/// Escape `text` for use in a text node.
#[must_use]
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, false, &mut out);
    out
}
