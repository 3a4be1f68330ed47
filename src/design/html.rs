//! Markup rendering with text and attribute encoding.

use super::node::ElementId;
use super::tree::Design;

const INDENT: &str = "  ";

/// Render the subtree at `root` as indented markup.
///
/// Attributes with an empty value render bare (`<vaadin-check-box checked>`).
/// Elements without children render on one line.
pub fn to_html(design: &Design, root: ElementId) -> String {
    let mut out = String::new();
    write_element(design, root, 0, &mut out);
    out
}

fn write_element(design: &Design, id: ElementId, depth: usize, out: &mut String) {
    let Some(data) = design.get(id) else {
        return;
    };
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push('<');
    out.push_str(&data.tag);
    for (name, value) in &data.attributes {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&encode_attribute(value));
            out.push('"');
        }
    }
    out.push('>');
    if let Some(text) = &data.text {
        out.push_str(&encode_text(text));
    }

    let children = design.children(id);
    if !children.is_empty() {
        out.push('\n');
        for &child in children {
            write_element(design, child, depth + 1, out);
            out.push('\n');
        }
        for _ in 0..depth {
            out.push_str(INDENT);
        }
    }
    out.push_str("</");
    out.push_str(&data.tag);
    out.push('>');
}

/// Encode text content: `&`, `<`, `>` and non-breaking spaces.
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            other => out.push(other),
        }
    }
    out
}

/// Encode an attribute value: text encoding plus `"`.
pub fn encode_attribute(value: &str) -> String {
    encode_text(value).replace('"', "&quot;")
}

/// Inverse of [`encode_text`] and [`encode_attribute`].
///
/// `&amp;` is decoded last so that `&amp;lt;` yields `&lt;`, not `<`.
pub fn decode_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}
