//! Lookup of inline markup spans inside a field body.
//!
//! Field handlers only care about two kinds of span: `C{...}` (`code`) and
//! `L{...}` (`link`). `@ptype items: C{list} of L{Widget}` is read by asking
//! for the first `code` span and the first `link` span of the body.

use crate::markup::{Markup, MarkupNode};

/// Returns the text of the first element named `name` in `body`.
///
/// The search is depth-first in document order. Elements with no text are
/// skipped.
///
/// # Arguments
///
/// * `body` - Parsed field body, if the field has one
/// * `name` - Element kind, such as `"code"` or `"link"`
///
/// # Returns
///
/// The trimmed plaintext of the matching element, or `None` when the body is
/// absent or nothing matches.
///
/// # Example
///
/// ```
/// use docstring_swagger::inline::find_inline;
/// use docstring_swagger::markup::parse_docstring;
///
/// let doc = parse_docstring(Some("@ptype tags: C{list} of L{Tag}"));
/// let body = doc.fields[0].body.as_ref();
/// assert_eq!(find_inline(body, "code").as_deref(), Some("list"));
/// assert_eq!(find_inline(body, "link").as_deref(), Some("Tag"));
/// assert_eq!(find_inline(body, "bold"), None);
/// ```
pub fn find_inline(body: Option<&Markup>, name: &str) -> Option<String> {
    body?.nodes.iter().find_map(|node| find_in_node(node, name))
}

fn find_in_node(node: &MarkupNode, name: &str) -> Option<String> {
    match node {
        MarkupNode::Text(_) => None,
        MarkupNode::Element {
            name: element,
            children,
        } => {
            if *element == name {
                let text = node.to_plaintext();
                let text = text.trim();
                if !text.is_empty() {
                    return Some(text.to_string());
                }
            }
            children.iter().find_map(|child| find_in_node(child, name))
        }
        MarkupNode::Group(children) => children.iter().find_map(|child| find_in_node(child, name)),
    }
}
