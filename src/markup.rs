//! Epytext-style documentation markup parser.
//!
//! Doc comments are split into an optional free-text description followed by
//! tagged fields of the form `@tag [argument]: body`. Field bodies may carry
//! inline markup such as `C{list}` (code) or `L{Widget}` (link), which is parsed
//! into a small node tree so that later stages can look inside it.
//!
//! The parser is best-effort: malformed markup is recorded as a [`Diagnostic`]
//! and the offending text is kept as plain text. Parsing never fails.
//!
//! # Example
//!
//! ```
//! use docstring_swagger::markup::parse_docstring;
//!
//! let doc = parse_docstring(Some("Fetch a widget.\n\n@param id: The C{Widget} id"));
//! assert_eq!(doc.fields.len(), 1);
//! assert_eq!(doc.fields[0].tag, "param");
//! assert_eq!(doc.fields[0].arg.as_deref(), Some("id"));
//! assert_eq!(doc.fields[0].body_text().as_deref(), Some("The Widget id"));
//! ```

use log::debug;

/// A node of parsed inline markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    /// Literal text
    Text(String),
    /// An inline element such as `code` or `link`
    Element {
        name: &'static str,
        children: Vec<MarkupNode>,
    },
    /// A bare `{...}` group, rendered with its braces
    Group(Vec<MarkupNode>),
}

/// Parsed markup for a field body or the free-text description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub nodes: Vec<MarkupNode>,
}

/// One `@tag arg: body` unit from a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocField {
    pub tag: String,
    pub arg: Option<String>,
    pub body: Option<Markup>,
}

/// A markup problem found while parsing. Collected, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line number within the doc text
    pub line: usize,
    pub message: String,
}

/// Result of parsing a whole doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocstring {
    /// Text before the first field
    pub description: Option<Markup>,
    /// Fields in document order
    pub fields: Vec<DocField>,
    pub diagnostics: Vec<Diagnostic>,
}

impl MarkupNode {
    fn write_plaintext(&self, out: &mut String) {
        match self {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element { children, .. } => {
                for child in children {
                    child.write_plaintext(out);
                }
            }
            MarkupNode::Group(children) => {
                out.push('{');
                for child in children {
                    child.write_plaintext(out);
                }
                out.push('}');
            }
        }
    }

    /// Plain-text content of this node
    pub fn to_plaintext(&self) -> String {
        let mut out = String::new();
        self.write_plaintext(&mut out);
        out
    }
}

impl Markup {
    /// Renders the markup as plain text, trimmed.
    pub fn to_plaintext(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_plaintext(&mut out);
        }
        out.trim().to_string()
    }
}

impl DocField {
    /// Plain-text body, or `None` when the body is absent or blank.
    pub fn body_text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(Markup::to_plaintext)
            .filter(|text| !text.is_empty())
    }
}

/// Parses documentation text into a description and an ordered list of fields.
///
/// Absent or empty input yields an empty result.
pub fn parse_docstring(text: Option<&str>) -> ParsedDocstring {
    let mut parsed = ParsedDocstring::default();
    let Some(text) = text else {
        return parsed;
    };

    let mut description_lines: Vec<&str> = Vec::new();
    // (tag, arg, body lines, first line number)
    let mut pending: Vec<(String, Option<String>, Vec<&str>, usize)> = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();

        if line.starts_with('@') {
            match split_field_line(line) {
                Ok((tag, arg, first)) => {
                    pending.push((tag.to_string(), arg.map(str::to_string), vec![first], line_no));
                    continue;
                }
                Err(message) => parsed.diagnostics.push(Diagnostic {
                    line: line_no,
                    message,
                }),
            }
        }

        match pending.last_mut() {
            Some((_, _, body, _)) => body.push(line),
            None => description_lines.push(line),
        }
    }

    parsed.description = markup_from_lines(&description_lines, 1, &mut parsed.diagnostics);
    for (tag, arg, body_lines, line_no) in pending {
        let body = markup_from_lines(&body_lines, line_no, &mut parsed.diagnostics);
        parsed.fields.push(DocField { tag, arg, body });
    }

    for diagnostic in &parsed.diagnostics {
        debug!("Markup diagnostic at line {}: {}", diagnostic.line, diagnostic.message);
    }

    parsed
}

/// Splits `@tag arg: body` into its parts.
fn split_field_line(line: &str) -> Result<(&str, Option<&str>, &str), String> {
    let rest = &line[1..];
    let tag_len = rest
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(rest.len());
    if tag_len == 0 {
        return Err(format!("missing field tag in `{}`", line));
    }
    let (tag, rest) = rest.split_at(tag_len);

    let Some(colon) = rest.find(':') else {
        return Err(format!("field `@{}` has no colon", tag));
    };
    let arg = rest[..colon].trim();
    let body = rest[colon + 1..].trim();

    let arg = if arg.is_empty() { None } else { Some(arg) };
    Ok((tag, arg, body))
}

fn markup_from_lines(
    lines: &[&str],
    first_line: usize,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Markup> {
    let joined = lines.join("\n");
    let joined = joined.trim();
    if joined.is_empty() {
        return None;
    }
    Some(parse_inline(joined, first_line, diagnostics))
}

/// Maps an epytext inline marker letter to its element name.
fn element_name(marker: char) -> Option<&'static str> {
    match marker {
        'C' => Some("code"),
        'L' => Some("link"),
        'B' => Some("bold"),
        'I' => Some("italic"),
        'U' => Some("uri"),
        'M' => Some("math"),
        'E' => Some("escape"),
        'X' => Some("index"),
        'S' => Some("symbol"),
        'G' => Some("graph"),
        _ => None,
    }
}

struct Frame {
    name: Option<&'static str>,
    opener: String,
    children: Vec<MarkupNode>,
    line: usize,
}

impl Frame {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(MarkupNode::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(MarkupNode::Text(text.to_string()));
        }
    }

    fn push_node(&mut self, node: MarkupNode) {
        match node {
            MarkupNode::Text(text) => self.push_text(&text),
            other => self.children.push(other),
        }
    }
}

/// Parses inline markup in `text`, starting at `line` for diagnostics.
pub(crate) fn parse_inline(text: &str, line: usize, diagnostics: &mut Vec<Diagnostic>) -> Markup {
    let chars: Vec<char> = text.chars().collect();
    let mut stack = vec![Frame {
        name: None,
        opener: String::new(),
        children: Vec::new(),
        line,
    }];
    let mut current_line = line;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let next_is_brace = chars.get(i + 1) == Some(&'{');
        let word_start = i == 0 || !chars[i - 1].is_alphanumeric();

        if c.is_ascii_uppercase() && next_is_brace && word_start {
            match element_name(c) {
                Some(name) => {
                    stack.push(Frame {
                        name: Some(name),
                        opener: format!("{}{{", c),
                        children: Vec::new(),
                        line: current_line,
                    });
                    i += 2;
                    continue;
                }
                // The letter stays text and the braces become a bare group.
                None => diagnostics.push(Diagnostic {
                    line: current_line,
                    message: format!("unknown inline markup `{}{{`", c),
                }),
            }
        }

        match c {
            '{' => stack.push(Frame {
                name: None,
                opener: "{".to_string(),
                children: Vec::new(),
                line: current_line,
            }),
            '}' if stack.len() > 1 => {
                if let Some(frame) = stack.pop() {
                    let node = close_frame(frame, diagnostics);
                    if let Some(parent) = stack.last_mut() {
                        parent.push_node(node);
                    }
                }
            }
            '}' => {
                diagnostics.push(Diagnostic {
                    line: current_line,
                    message: "unbalanced `}`".to_string(),
                });
                push_char(&mut stack, c);
            }
            _ => {
                if c == '\n' {
                    current_line += 1;
                }
                push_char(&mut stack, c);
            }
        }
        i += 1;
    }

    // Unclosed spans degrade to their literal text.
    while stack.len() > 1 {
        if let Some(frame) = stack.pop() {
            diagnostics.push(Diagnostic {
                line: frame.line,
                message: format!("unclosed `{}`", frame.opener),
            });
            if let Some(parent) = stack.last_mut() {
                parent.push_text(&frame.opener);
                for child in frame.children {
                    parent.push_node(child);
                }
            }
        }
    }

    let nodes = stack.pop().map(|frame| frame.children).unwrap_or_default();
    Markup { nodes }
}

fn push_char(stack: &mut [Frame], c: char) {
    if let Some(frame) = stack.last_mut() {
        let mut buf = [0u8; 4];
        frame.push_text(c.encode_utf8(&mut buf));
    }
}

fn close_frame(frame: Frame, diagnostics: &mut Vec<Diagnostic>) -> MarkupNode {
    match frame.name {
        Some("escape") => {
            let content = Markup {
                nodes: frame.children,
            }
            .to_plaintext();
            let escaped = match content.as_str() {
                "lb" => "{".to_string(),
                "rb" => "}".to_string(),
                other => {
                    diagnostics.push(Diagnostic {
                        line: frame.line,
                        message: format!("unknown escape `E{{{}}}`", other),
                    });
                    other.to_string()
                }
            };
            MarkupNode::Text(escaped)
        }
        Some(name) => MarkupNode::Element {
            name,
            children: frame.children,
        },
        None => MarkupNode::Group(frame.children),
    }
}
