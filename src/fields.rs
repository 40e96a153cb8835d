//! Dispatch of parsed doc fields onto an in-progress metadata accumulator.
//!
//! The set of supported tags is fixed; every other tag is ignored. Fields are
//! applied in document order, so an `@rtype` must come before the `@return`
//! or `@raise` that refers to the same code for the response model to be
//! attached. There is no back-patching.
//!
//! | Tag | Argument | Effect |
//! |-----|----------|--------|
//! | `@param` | parameter | description; `paramType` defaults to `query` |
//! | `@type` | parameter | `dataType` |
//! | `@in` | parameter | `paramType` |
//! | `@required` | parameter | `false`/`False` clear it, anything else sets it |
//! | `@rtype` | response code | model for later responses with that code |
//! | `@return`, `@raise` | response code | appends a response message |
//! | `@property` | property | description |
//! | `@ptype` | property | plain type, or `array` for `C{list} of L{X}`; other code spans change nothing |
//! | `@notes`, `@description` | none | notes and summary, joined onto one line |
//!
//! # Example
//!
//! ```
//! use docstring_swagger::fields::DocAccumulator;
//!
//! let mut acc = DocAccumulator::new();
//! acc.parse_docstring(Some("@param id: Widget id\n@in id: path\n@rtype 200: Widget\n@return 200: OK"));
//!
//! assert_eq!(acc.parameters["id"].param_type.as_deref(), Some("path"));
//! assert_eq!(acc.responses[0].response_model.as_deref(), Some("Widget"));
//! ```

use crate::descriptor::{Items, ParameterDescriptor, PropertyDescriptor, ResponseDescriptor};
use crate::inline::find_inline;
use crate::markup::{parse_docstring, DocField, ParsedDocstring};
use indexmap::IndexMap;
use log::debug;

/// `paramType` given to a documented parameter that has no explicit `@in`
pub const DEFAULT_PARAM_TYPE: &str = "query";

/// Tags understood by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Param,
    Type,
    In,
    Required,
    Rtype,
    Property,
    Ptype,
    Return,
    Raise,
    Notes,
    Description,
}

impl Tag {
    /// Looks up a tag by its markup name (`param`, `rtype`, ...)
    pub fn from_name(name: &str) -> Option<Tag> {
        match name {
            "param" => Some(Tag::Param),
            "type" => Some(Tag::Type),
            "in" => Some(Tag::In),
            "required" => Some(Tag::Required),
            "rtype" => Some(Tag::Rtype),
            "property" => Some(Tag::Property),
            "ptype" => Some(Tag::Ptype),
            "return" => Some(Tag::Return),
            "raise" => Some(Tag::Raise),
            "notes" => Some(Tag::Notes),
            "description" => Some(Tag::Description),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tag::Param => "param",
            Tag::Type => "type",
            Tag::In => "in",
            Tag::Required => "required",
            Tag::Rtype => "rtype",
            Tag::Property => "property",
            Tag::Ptype => "ptype",
            Tag::Return => "return",
            Tag::Raise => "raise",
            Tag::Notes => "notes",
            Tag::Description => "description",
        }
    }
}

/// Metadata collected from doc fields.
///
/// Shared by the operation and model builders; each builder seeds it from a
/// signature and then feeds it the parsed doc comment.
#[derive(Debug, Clone, Default)]
pub struct DocAccumulator {
    pub parameters: IndexMap<String, ParameterDescriptor>,
    pub properties: IndexMap<String, PropertyDescriptor>,
    /// `@rtype` bodies keyed by response code
    pub response_classes: IndexMap<String, String>,
    pub responses: Vec<ResponseDescriptor>,
    pub notes: Option<String>,
    pub summary: Option<String>,
}

impl DocAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `text` and applies every field in document order.
    ///
    /// # Arguments
    ///
    /// * `text` - Raw doc comment text, `None` for an undocumented declaration
    ///
    /// # Returns
    ///
    /// The parsed docstring, so callers can use its description or report its
    /// diagnostics.
    pub fn parse_docstring(&mut self, text: Option<&str>) -> ParsedDocstring {
        let parsed = parse_docstring(text);
        for field in &parsed.fields {
            self.apply(field);
        }
        parsed
    }

    /// Applies a single field. Unsupported tags are ignored.
    ///
    /// Keyed tags without an argument are dropped with a debug message.
    pub fn apply(&mut self, field: &DocField) {
        let Some(tag) = Tag::from_name(&field.tag) else {
            debug!("Ignoring unsupported tag @{}", field.tag);
            return;
        };

        match tag {
            Tag::Return | Tag::Raise => self.apply_response(field),
            Tag::Notes => self.notes = field.body_text().map(|body| join_lines(&body)),
            Tag::Description => self.summary = field.body_text().map(|body| join_lines(&body)),
            _ => {
                let Some(arg) = field.arg.as_deref() else {
                    debug!("Ignoring @{} without an argument", tag.name());
                    return;
                };
                self.apply_keyed(tag, arg, field);
            }
        }
    }

    fn apply_keyed(&mut self, tag: Tag, arg: &str, field: &DocField) {
        let body = field.body_text();
        match tag {
            Tag::Param => {
                let param = self.parameter(arg);
                param.description = body;
                if param.param_type.is_none() {
                    param.param_type = Some(DEFAULT_PARAM_TYPE.to_string());
                }
            }
            Tag::Type => self.parameter(arg).data_type = body,
            Tag::In => self.parameter(arg).param_type = body,
            Tag::Required => {
                let required = !matches!(body.as_deref(), Some("false") | Some("False"));
                self.parameter(arg).required = Some(required);
            }
            Tag::Rtype => match body {
                Some(class) => {
                    self.response_classes.insert(arg.to_string(), class);
                }
                None => {
                    self.response_classes.shift_remove(arg);
                }
            },
            Tag::Property => self.property(arg).description = body,
            Tag::Ptype => {
                let code = find_inline(field.body.as_ref(), "code");
                let link = find_inline(field.body.as_ref(), "link");
                let property = self.property(arg);
                match (code.as_deref(), link) {
                    (None, _) => {
                        if let Some(body) = body {
                            property.property_type = body;
                            property.items = None;
                        }
                    }
                    (Some("list"), Some(element)) => {
                        property.property_type = "array".to_string();
                        property.items = Some(Items {
                            item_type: element,
                        });
                    }
                    // Other code spans, or a list with no element link
                    (Some(code), _) => {
                        debug!("Leaving property {} untouched by C{{{}}}", arg, code);
                    }
                }
            }
            Tag::Return | Tag::Raise | Tag::Notes | Tag::Description => {}
        }
    }

    fn apply_response(&mut self, field: &DocField) {
        let response_model = field
            .arg
            .as_deref()
            .and_then(|code| self.response_classes.get(code))
            .cloned();
        self.responses.push(ResponseDescriptor {
            code: field.arg.clone(),
            message: field.body_text(),
            response_model,
        });
    }

    /// Entry for `name`, created as required when the docs mention it first.
    fn parameter(&mut self, name: &str) -> &mut ParameterDescriptor {
        self.parameters
            .entry(name.to_string())
            .or_insert_with(|| ParameterDescriptor {
                required: Some(true),
                ..ParameterDescriptor::named(name)
            })
    }

    fn property(&mut self, name: &str) -> &mut PropertyDescriptor {
        self.properties.entry(name.to_string()).or_default()
    }
}

/// Undoes hard wrapping: stored notes and summaries read as one line.
fn join_lines(text: &str) -> String {
    text.replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn accumulate(doc: &str) -> DocAccumulator {
        let mut acc = DocAccumulator::new();
        acc.parse_docstring(Some(doc));
        acc
    }

    #[test]
    fn test_tag_names_round_trip() {
        for name in [
            "param", "type", "in", "required", "rtype", "property", "ptype", "return", "raise",
            "notes", "description",
        ] {
            assert_eq!(Tag::from_name(name).map(Tag::name), Some(name));
        }
        assert_eq!(Tag::from_name("author"), None);
    }

    #[test]
    fn test_param_defaults_to_query() {
        let acc = accumulate("@param x: some text");
        let param = &acc.parameters["x"];
        assert_eq!(param.name, "x");
        assert_eq!(param.description.as_deref(), Some("some text"));
        assert_eq!(param.param_type.as_deref(), Some("query"));
    }

    #[test]
    fn test_documented_only_param_is_required() {
        let acc = accumulate("@param q: search\n@type n: integer");
        assert_eq!(acc.parameters["q"].required, Some(true));
        assert_eq!(acc.parameters["n"].required, Some(true));
        assert_eq!(
            serde_json::to_value(&acc.parameters["q"]).unwrap(),
            serde_json::json!({
                "name": "q",
                "description": "search",
                "paramType": "query",
                "required": true
            })
        );
    }

    #[test]
    fn test_in_overrides_param_type() {
        let acc = accumulate("@param x: text\n@in x: header\n@type x: integer");
        let param = &acc.parameters["x"];
        assert_eq!(param.param_type.as_deref(), Some("header"));
        assert_eq!(param.data_type.as_deref(), Some("integer"));
    }

    #[test]
    fn test_in_before_param_is_kept() {
        let acc = accumulate("@in x: body\n@param x: text");
        assert_eq!(acc.parameters["x"].param_type.as_deref(), Some("body"));
    }

    #[test]
    fn test_required_literals() {
        let acc = accumulate(
            "@required a: false\n@required b: False\n@required c: true\n@required d: nope\n@required e:",
        );
        assert_eq!(acc.parameters["a"].required, Some(false));
        assert_eq!(acc.parameters["b"].required, Some(false));
        assert_eq!(acc.parameters["c"].required, Some(true));
        assert_eq!(acc.parameters["d"].required, Some(true));
        assert_eq!(acc.parameters["e"].required, Some(true));
    }

    #[test]
    fn test_required_is_case_sensitive() {
        let acc = accumulate("@required a: FALSE");
        assert_eq!(acc.parameters["a"].required, Some(true));
    }

    #[test]
    fn test_same_name_merges() {
        let acc = accumulate("@param x: first\n@param x: second\n@type x: int");
        assert_eq!(acc.parameters.len(), 1);
        assert_eq!(acc.parameters["x"].description.as_deref(), Some("second"));
        assert_eq!(acc.parameters["x"].data_type.as_deref(), Some("int"));
    }

    #[test]
    fn test_parameter_order_follows_document() {
        let acc = accumulate("@param b: b\n@param a: a\n@param c: c");
        let names: Vec<_> = acc.parameters.keys().cloned().collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_ptype_list_of_link() {
        let acc = accumulate("@property widgets: all widgets\n@ptype widgets: C{list} of L{Widget}");
        let property = &acc.properties["widgets"];
        assert_eq!(property.property_type, "array");
        assert_eq!(
            property.items,
            Some(Items {
                item_type: "Widget".to_string()
            })
        );
        assert_eq!(property.description.as_deref(), Some("all widgets"));
    }

    #[test]
    fn test_ptype_list_without_link_leaves_property() {
        let acc = accumulate("@ptype tags: C{list}");
        assert_eq!(acc.properties["tags"].property_type, "string");
        assert_eq!(acc.properties["tags"].items, None);
    }

    #[test]
    fn test_ptype_other_code_span_leaves_property() {
        let acc = accumulate(
            "@property x: thing\n@ptype x: C{int}\n@ptype parts: C{list} of L{Part}\n@ptype parts: C{dict}",
        );
        assert_eq!(acc.properties["x"].property_type, "string");
        assert_eq!(acc.properties["x"].description.as_deref(), Some("thing"));
        assert_eq!(acc.properties["parts"].property_type, "array");
        assert_eq!(
            acc.properties["parts"].items,
            Some(Items {
                item_type: "Part".to_string()
            })
        );
    }

    #[test]
    fn test_ptype_plain() {
        let acc = accumulate("@ptype count: integer");
        assert_eq!(acc.properties["count"].property_type, "integer");
    }

    #[test]
    fn test_property_defaults_type() {
        let acc = accumulate("@property name: the name");
        assert_eq!(acc.properties["name"].property_type, "string");
    }

    #[test]
    fn test_rtype_before_return() {
        let acc = accumulate("@rtype 200: Widget\n@return 200: OK");
        assert_eq!(
            acc.responses,
            vec![ResponseDescriptor {
                code: Some("200".to_string()),
                message: Some("OK".to_string()),
                response_model: Some("Widget".to_string()),
            }]
        );
    }

    #[test]
    fn test_rtype_after_return_is_dropped() {
        let acc = accumulate("@return 200: OK\n@rtype 200: Widget");
        assert_eq!(acc.responses.len(), 1);
        assert_eq!(acc.responses[0].response_model, None);
    }

    #[test]
    fn test_raise_uses_response_classes() {
        let acc = accumulate("@rtype NotFound: Error\n@raise NotFound: no such widget\n@raise Conflict: taken");
        assert_eq!(acc.responses[0].response_model.as_deref(), Some("Error"));
        assert_eq!(acc.responses[1].code.as_deref(), Some("Conflict"));
        assert_eq!(acc.responses[1].response_model, None);
    }

    #[test]
    fn test_notes_and_description_are_single_line() {
        let acc = accumulate("@notes: wrapped\n  notes text\n@description: a\n  summary");
        assert_eq!(acc.notes.as_deref(), Some("wrapped notes text"));
        assert_eq!(acc.summary.as_deref(), Some("a summary"));
    }

    #[test]
    fn test_free_text_does_not_set_summary() {
        let acc = accumulate("Lead-in text.\n\n@param x: y");
        assert_eq!(acc.summary, None);
    }

    #[test]
    fn test_unsupported_tags_are_ignored() {
        let acc = accumulate("@author: someone\n@since 1.0: forever");
        assert!(acc.parameters.is_empty());
        assert!(acc.properties.is_empty());
        assert!(acc.responses.is_empty());
        assert_eq!(acc.notes, None);
    }

    #[test]
    fn test_keyed_tag_without_argument_is_ignored() {
        let acc = accumulate("@param: orphan\n@rtype: Widget");
        assert!(acc.parameters.is_empty());
        assert!(acc.response_classes.is_empty());
    }

    #[test]
    fn test_absent_body_is_tolerated() {
        let acc = accumulate("@param x:\n@return 204:");
        assert_eq!(acc.parameters["x"].description, None);
        assert_eq!(acc.responses[0].message, None);
    }
}
