//! docstring-swagger - Swagger metadata from epytext-style doc comments.
//!
//! Handlers and data models are documented with tagged fields in their doc
//! comments (`@param`, `@type`, `@in`, `@required`, `@rtype`, `@return`,
//! `@raise`, `@property`, `@ptype`, `@notes`, `@description`). This library
//! parses that markup, merges it with what the declaration's signature says,
//! and assembles the result into a Swagger-style document.
//!
//! # Architecture
//!
//! 1. [`markup`] - Parses doc text into tagged fields with inline markup
//! 2. [`inline`] - Finds inline spans such as `C{list}` and `L{Widget}`
//! 3. [`fields`] - Dispatches fields onto a metadata accumulator
//! 4. [`signature`] - Reflects parameter names and defaults
//! 5. [`operation`] - Builds operation metadata and wraps handlers
//! 6. [`model`] - Builds model metadata and keeps the model registry
//! 7. [`settings`] - Document settings with last-write-wins merging
//! 8. [`source`] / [`extractor`] - Finds documented declarations in Rust source
//! 9. [`document`] / [`serializer`] - Assembles and renders the document
//!
//! # Example Usage
//!
//! ```
//! use docstring_swagger::{
//!     document::DocumentBuilder,
//!     extractor::HttpMethod,
//!     model::{ModelBuilder, ModelRegistry},
//!     operation::OperationBuilder,
//!     settings::Settings,
//!     signature::{Declaration, Signature, SignatureParam},
//! };
//!
//! struct Widget;
//!
//! let mut registry = ModelRegistry::new();
//! let widget_decl = Declaration::new("Widget")
//!     .with_signature(Signature::new(vec![
//!         SignatureParam::required("name"),
//!         SignatureParam::with_default("size", 5),
//!     ]))
//!     .with_doc("@property name: Display name\n@ptype tags: C{list} of L{Tag}");
//! let _widget = ModelBuilder::new().decorate(Widget, &widget_decl, &mut registry);
//!
//! let get_decl = Declaration::new("get_widget")
//!     .with_signature(Signature::new(vec![SignatureParam::required("id")]))
//!     .with_doc("@param id: Widget id\n@rtype 200: Widget\n@return 200: The widget");
//! let get_widget = OperationBuilder::new().decorate(|id: u32| id, &get_decl);
//! assert_eq!(get_widget(7), 7);
//!
//! let mut settings = Settings::new();
//! settings.merge([("title", serde_json::json!("Widget API"))]);
//!
//! let mut builder = DocumentBuilder::new(&settings);
//! builder.add_operation("/widgets/{id}", HttpMethod::Get, get_widget.descriptor());
//! let document = builder.build(&registry);
//!
//! assert_eq!(document.info.title, "Widget API");
//! assert_eq!(document.models["Widget"].required, vec!["name".to_string()]);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fields;
pub mod inline;
pub mod markup;
pub mod model;
pub mod operation;
pub mod serializer;
pub mod settings;
pub mod signature;
pub mod source;
