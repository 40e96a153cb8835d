//! Operation metadata: merges a handler's signature with its doc comment.
//!
//! Signature parameters are seeded first as required-unless-defaulted `path`
//! parameters of type `string`. The doc comment is applied on top, so the
//! documentation wins wherever it says something and the signature only fills
//! in what the documentation leaves out.
//!
//! # Example
//!
//! ```
//! use docstring_swagger::operation::OperationBuilder;
//! use docstring_swagger::signature::{Declaration, Signature, SignatureParam};
//!
//! let declaration = Declaration::new("get_widget")
//!     .with_signature(Signature::new(vec![SignatureParam::required("id")]))
//!     .with_doc("@description: Fetch one widget\n@rtype 200: Widget\n@return 200: OK");
//!
//! let mut builder = OperationBuilder::new();
//! let handler = builder.decorate(|id: u32| id * 2, &declaration);
//!
//! assert_eq!(handler(21), 42);
//! assert_eq!(handler.descriptor().summary.as_deref(), Some("Fetch one widget"));
//! ```

use crate::descriptor::{OperationDescriptor, ParameterDescriptor};
use crate::fields::DocAccumulator;
use crate::signature::Declaration;
use log::debug;
use std::ops::Deref;
use std::rc::Rc;

/// `paramType` of parameters taken from the signature
pub const SIGNATURE_PARAM_TYPE: &str = "path";
/// `dataType` of parameters taken from the signature
pub const SIGNATURE_DATA_TYPE: &str = "string";

/// A handler carrying its operation metadata.
///
/// Dereferences to the wrapped handler, so calling through the wrapper is the
/// same as calling the handler itself.
#[derive(Debug)]
pub struct Operation<F> {
    handler: F,
    descriptor: OperationDescriptor,
}

impl<F> Operation<F> {
    /// The metadata attached to this handler
    pub fn descriptor(&self) -> &OperationDescriptor {
        &self.descriptor
    }

    pub fn handler(&self) -> &F {
        &self.handler
    }

    pub fn into_handler(self) -> F {
        self.handler
    }
}

impl<F> Deref for Operation<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.handler
    }
}

/// Builds operation metadata for one handler, exactly once.
#[derive(Debug)]
pub struct OperationBuilder<F> {
    nickname: Option<String>,
    decorated: Option<Rc<Operation<F>>>,
}

impl<F> Default for OperationBuilder<F> {
    fn default() -> Self {
        Self {
            nickname: None,
            decorated: None,
        }
    }
}

impl<F> OperationBuilder<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nickname recorded on the descriptor
    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Wraps `handler` and attaches the metadata built from `declaration`.
    ///
    /// Only the first call does any work. Later calls drop their arguments and
    /// return the wrapper produced by the first one.
    pub fn decorate(&mut self, handler: F, declaration: &Declaration) -> Rc<Operation<F>> {
        if let Some(existing) = &self.decorated {
            debug!(
                "Operation {} already built, reusing it",
                existing.descriptor.name
            );
            return Rc::clone(existing);
        }

        let descriptor = build_operation(declaration, self.nickname.clone());
        let operation = Rc::new(Operation {
            handler,
            descriptor,
        });
        self.decorated = Some(Rc::clone(&operation));
        operation
    }

    pub fn is_built(&self) -> bool {
        self.decorated.is_some()
    }

    /// Metadata of the decorated handler, if any
    pub fn descriptor(&self) -> Option<&OperationDescriptor> {
        self.decorated.as_deref().map(Operation::descriptor)
    }
}

/// Merges a declaration's signature and doc comment into an operation descriptor.
pub fn build_operation(declaration: &Declaration, nickname: Option<String>) -> OperationDescriptor {
    debug!("Building operation metadata for {}", declaration.name);
    let mut acc = DocAccumulator::new();

    if let Some(signature) = &declaration.signature {
        for param in &signature.params {
            acc.parameters
                .entry(param.name.clone())
                .or_insert_with(|| ParameterDescriptor {
                    name: param.name.clone(),
                    description: None,
                    data_type: Some(SIGNATURE_DATA_TYPE.to_string()),
                    param_type: Some(SIGNATURE_PARAM_TYPE.to_string()),
                    required: Some(!param.has_default()),
                });
        }
    }

    acc.parse_docstring(declaration.doc.as_deref());

    OperationDescriptor {
        name: declaration.name.clone(),
        nickname,
        parameters: acc.parameters,
        responses: acc.responses,
        summary: acc.summary,
        notes: acc.notes,
    }
}
