//! Extraction of documented declarations from parsed source.
//!
//! Operations are functions or methods marked with an attribute whose last
//! path segment is `operation`:
//!
//! ```ignore
//! /// @param id: Widget id
//! /// @return 200: OK
//! #[swagger::operation(path = "/widgets/{id}", method = "get", nickname = "getWidget")]
//! pub fn get_widget(id: u32) -> Widget { ... }
//! ```
//!
//! Models are structs marked with an attribute whose last segment is `model`.
//! A model's constructor is its inherent `fn new`, or its named fields when it
//! has none.
//!
//! Every declaration is extracted independently: a malformed signature or
//! attribute yields an `Err` for that declaration only.

use crate::error::{Error, Result};
use crate::signature::{Declaration, Signature};
use crate::source::SourceFile;
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, Lit, Meta};

/// HTTP methods an operation can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Parses a method name, case-insensitively
    pub fn from_name(name: &str) -> Option<HttpMethod> {
        match name.to_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    /// Lower-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

/// A function or method marked as an operation
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDecl {
    pub declaration: Declaration,
    /// URL path from the attribute, if given
    pub path: Option<String>,
    pub method: HttpMethod,
    pub nickname: Option<String>,
    /// Implementing type for methods
    pub owner: Option<String>,
    pub file: PathBuf,
}

/// A struct marked as a model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDecl {
    pub declaration: Declaration,
    pub file: PathBuf,
}

/// Everything found in a set of source files
#[derive(Debug, Default)]
pub struct Extraction {
    pub operations: Vec<Result<OperationDecl>>,
    pub models: Vec<Result<ModelDecl>>,
}

/// Finds operation and model declarations across all `files`.
///
/// Constructors are looked up across files, so a model's `impl` block may live
/// in a different file from the struct itself.
pub fn extract_declarations(files: &[SourceFile]) -> Extraction {
    let mut visitor = DeclarationVisitor::default();
    for file in files {
        visitor.file = file.path.clone();
        visitor.visit_file(&file.syntax_tree);
    }

    let DeclarationVisitor {
        operations,
        models,
        constructors,
        ..
    } = visitor;

    let models = models
        .into_iter()
        .map(|(item, file)| build_model_decl(&item, file, &constructors))
        .collect();

    Extraction { operations, models }
}

/// Joins `#[doc = "..."]` attributes (`///` comments) into one text.
///
/// Returns `None` when there are no doc comments or they are blank.
pub fn doc_text(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                Expr::Lit(syn::ExprLit {
                    lit: Lit::Str(lit_str),
                    ..
                }) => Some(lit_str.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|chunk| {
            chunk
                .lines()
                .map(|line| line.strip_prefix(' ').unwrap_or(line).to_string())
                .collect::<Vec<_>>()
        })
        .collect();

    let text = lines.join("\n");
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn find_marker<'a>(attrs: &'a [Attribute], marker: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| {
        attr.path()
            .segments
            .last()
            .map(|segment| segment.ident == marker)
            .unwrap_or(false)
    })
}

#[derive(Default)]
struct OperationArgs {
    path: Option<String>,
    method: Option<String>,
    nickname: Option<String>,
}

/// Reads `path`, `method` and `nickname` from an operation attribute.
fn parse_operation_args(attr: &Attribute) -> syn::Result<OperationArgs> {
    let mut args = OperationArgs::default();
    if matches!(attr.meta, Meta::Path(_)) {
        return Ok(args);
    }

    attr.parse_nested_meta(|meta| {
        let value: syn::LitStr = meta.value()?.parse()?;
        if meta.path.is_ident("path") {
            args.path = Some(value.value());
        } else if meta.path.is_ident("method") {
            args.method = Some(value.value());
        } else if meta.path.is_ident("nickname") {
            args.nickname = Some(value.value());
        } else {
            return Err(meta.error("expected `path`, `method` or `nickname`"));
        }
        Ok(())
    })?;
    Ok(args)
}

#[derive(Default)]
struct DeclarationVisitor {
    file: PathBuf,
    self_type: Option<String>,
    operations: Vec<Result<OperationDecl>>,
    models: Vec<(syn::ItemStruct, PathBuf)>,
    constructors: HashMap<String, syn::Signature>,
}

impl DeclarationVisitor {
    fn record_operation(&mut self, attrs: &[Attribute], sig: &syn::Signature) {
        let Some(attr) = find_marker(attrs, "operation") else {
            return;
        };
        debug!("Found operation {} in {}", sig.ident, self.file.display());
        let result = self.operation_decl(attr, attrs, sig);
        self.operations.push(result);
    }

    fn operation_decl(
        &self,
        attr: &Attribute,
        attrs: &[Attribute],
        sig: &syn::Signature,
    ) -> Result<OperationDecl> {
        let args = parse_operation_args(attr).map_err(|e| parse_error(&self.file, e))?;
        let name = sig.ident.to_string();

        let method = match args.method.as_deref() {
            Some(method) => HttpMethod::from_name(method).ok_or_else(|| Error::ParseError {
                file: self.file.clone(),
                message: format!("unknown HTTP method `{}` on `{}`", method, name),
            })?,
            None => HttpMethod::from_name(&name).unwrap_or(HttpMethod::Get),
        };

        let signature = Signature::from_fn(sig)?;
        let mut declaration = Declaration::new(name).with_signature(signature);
        declaration.doc = doc_text(attrs);

        Ok(OperationDecl {
            declaration,
            path: args.path,
            method,
            nickname: args.nickname,
            owner: self.self_type.clone(),
            file: self.file.clone(),
        })
    }
}

impl<'ast> Visit<'ast> for DeclarationVisitor {
    fn visit_item_fn(&mut self, item: &'ast syn::ItemFn) {
        self.record_operation(&item.attrs, &item.sig);
        visit::visit_item_fn(self, item);
    }

    fn visit_item_impl(&mut self, item: &'ast syn::ItemImpl) {
        let type_name = match item.self_ty.as_ref() {
            syn::Type::Path(type_path) => type_path
                .path
                .segments
                .last()
                .map(|segment| segment.ident.to_string()),
            _ => None,
        };

        if item.trait_.is_none() {
            if let Some(type_name) = &type_name {
                for impl_item in &item.items {
                    if let syn::ImplItem::Fn(method) = impl_item {
                        if method.sig.ident == "new" {
                            self.constructors
                                .entry(type_name.clone())
                                .or_insert_with(|| method.sig.clone());
                        }
                    }
                }
            }
        }

        let outer = std::mem::replace(&mut self.self_type, type_name);
        visit::visit_item_impl(self, item);
        self.self_type = outer;
    }

    fn visit_impl_item_fn(&mut self, item: &'ast syn::ImplItemFn) {
        self.record_operation(&item.attrs, &item.sig);
        visit::visit_impl_item_fn(self, item);
    }

    fn visit_item_struct(&mut self, item: &'ast syn::ItemStruct) {
        if find_marker(&item.attrs, "model").is_some() {
            debug!("Found model {} in {}", item.ident, self.file.display());
            self.models.push((item.clone(), self.file.clone()));
        }
        visit::visit_item_struct(self, item);
    }
}

fn build_model_decl(
    item: &syn::ItemStruct,
    file: PathBuf,
    constructors: &HashMap<String, syn::Signature>,
) -> Result<ModelDecl> {
    let name = item.ident.to_string();
    let signature = match constructors.get(&name) {
        Some(sig) => Some(Signature::from_fn(sig)?),
        None => Signature::from_struct(item)?,
    };

    let mut declaration = Declaration::new(name);
    declaration.signature = signature;
    declaration.doc = doc_text(&item.attrs);
    Ok(ModelDecl { declaration, file })
}

fn parse_error(file: &Path, err: syn::Error) -> Error {
    Error::ParseError {
        file: file.to_path_buf(),
        message: err.to_string(),
    }
}
