//! Signature reflection for documented declarations.
//!
//! A [`Signature`] is the ordered list of a callable's parameters, each with an
//! optional default value. It can be written out by hand or reflected from Rust
//! source through `syn`:
//!
//! - the `self` receiver is excluded
//! - `#[default = <literal>]` on a parameter or field supplies its default
//! - an `Option<T>` parameter without an explicit default defaults to `null`
//! - a struct field with `#[serde(default)]` defaults to `null`

use crate::error::{Error, Result};
use log::debug;
use serde_json::{Number, Value};
use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, FnArg, Lit, Meta, Pat, Type, UnOp};

/// One reflected parameter
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureParam {
    pub name: String,
    pub default: Option<Value>,
}

impl SignatureParam {
    /// A parameter without a default value
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// A parameter with a default value
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Ordered parameter list of a callable or constructor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    pub params: Vec<SignatureParam>,
    /// Whether a `self` receiver was present and left out of `params`
    pub has_receiver: bool,
}

/// A documented item as seen by the builders: its name, its reflected
/// signature (if it has one) and its raw doc text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub signature: Option<Signature>,
    pub doc: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_signature(mut self, signature: Signature) -> Self {
        self.signature = Some(signature);
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

impl Signature {
    pub fn new(params: Vec<SignatureParam>) -> Self {
        Self {
            params,
            has_receiver: false,
        }
    }

    /// Parameters that have no default, in declaration order
    pub fn required(&self) -> impl Iterator<Item = &SignatureParam> {
        self.params.iter().filter(|p| !p.has_default())
    }

    /// Parameters that carry a default, in declaration order
    pub fn defaulted(&self) -> impl Iterator<Item = &SignatureParam> {
        self.params.iter().filter(|p| p.has_default())
    }

    /// Reflects a function or method signature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SignatureError`] when a parameter does not bind a plain
    /// identifier or its `#[default]` value is not a literal.
    pub fn from_fn(sig: &syn::Signature) -> Result<Signature> {
        let owner = sig.ident.to_string();
        let mut signature = Signature::default();

        for input in &sig.inputs {
            match input {
                FnArg::Receiver(_) => signature.has_receiver = true,
                FnArg::Typed(pat_type) => {
                    let name = match pat_type.pat.as_ref() {
                        Pat::Ident(pat_ident) => pat_ident.ident.to_string(),
                        Pat::Wild(_) => {
                            return Err(Error::signature(&owner, "parameter `_` has no name"))
                        }
                        _ => {
                            return Err(Error::signature(
                                &owner,
                                "destructuring parameters cannot be documented",
                            ))
                        }
                    };
                    let default = default_from_attrs(&owner, &pat_type.attrs)?
                        .or_else(|| is_option(&pat_type.ty).then_some(Value::Null));
                    signature.params.push(SignatureParam { name, default });
                }
            }
        }

        Ok(signature)
    }

    /// Reflects a struct's named fields as constructor parameters.
    ///
    /// Returns `Ok(None)` for tuple and unit structs.
    pub fn from_struct(item: &syn::ItemStruct) -> Result<Option<Signature>> {
        let syn::Fields::Named(fields) = &item.fields else {
            return Ok(None);
        };
        let owner = item.ident.to_string();

        let mut params = Vec::new();
        for field in &fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let default = match default_from_attrs(&owner, &field.attrs)? {
                Some(value) => Some(value),
                None if has_serde_default(&field.attrs) || is_option(&field.ty) => Some(Value::Null),
                None => None,
            };
            params.push(SignatureParam {
                name: ident.to_string(),
                default,
            });
        }

        Ok(Some(Signature::new(params)))
    }
}

/// Reads `#[default = <literal>]`.
fn default_from_attrs(owner: &str, attrs: &[Attribute]) -> Result<Option<Value>> {
    let Some(attr) = attrs.iter().find(|a| a.path().is_ident("default")) else {
        return Ok(None);
    };
    let Meta::NameValue(meta) = &attr.meta else {
        return Err(Error::signature(owner, "expected `#[default = <literal>]`"));
    };
    literal_value(&meta.value)
        .map(Some)
        .ok_or_else(|| Error::signature(owner, "default value must be a literal"))
}

fn literal_value(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Some(Value::String(s.value())),
            Lit::Bool(b) => Some(Value::Bool(b.value)),
            Lit::Int(i) => i.base10_parse::<i64>().ok().map(Value::from),
            Lit::Float(f) => f
                .base10_parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number),
            Lit::Char(c) => Some(Value::String(c.value().to_string())),
            _ => None,
        },
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match literal_value(&unary.expr)? {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Value::from(-i))
                } else {
                    n.as_f64().and_then(|f| Number::from_f64(-f)).map(Value::Number)
                }
            }
            _ => None,
        },
        _ => None,
    }
}

/// Whether any `#[serde(...)]` attribute lists `default`.
///
/// Nested lists such as `rename(serialize = "..")` are skipped. An attribute
/// that does not parse at all is logged and treated as having no `default`.
fn has_serde_default(attrs: &[Attribute]) -> bool {
    let mut found = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                found = true;
            }
            skip_meta_value(&meta)
        });
        if let Err(e) = parsed {
            debug!("Unreadable serde attribute, ignoring it: {}", e);
        }
    }
    found
}

fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(|inner| skip_meta_value(&inner))?;
    }
    Ok(())
}

fn is_option(ty: &Type) -> bool {
    match ty {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == "Option")
            .unwrap_or(false),
        _ => false,
    }
}
