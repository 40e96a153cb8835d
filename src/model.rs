//! Model metadata and the registry that collects it.
//!
//! A model's constructor parameters become `string` properties; parameters
//! without a default are also listed as required. The doc comment is applied
//! afterwards and may retype or describe any property.

use crate::descriptor::{ModelDescriptor, PropertyDescriptor};
use crate::fields::DocAccumulator;
use crate::signature::Declaration;
use log::debug;
use std::rc::Rc;

/// Ordered, append-only collection of registered models.
///
/// Filled while declarations are processed, then handed to the document
/// assembler.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: Vec<Rc<ModelDescriptor>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model: Rc<ModelDescriptor>) {
        debug!("Registering model {}", model.id);
        self.models.push(model);
    }

    /// Models in registration order
    pub fn models(&self) -> &[Rc<ModelDescriptor>] {
        &self.models
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.iter().map(|m| m.as_ref())
    }

    /// First model registered under `id`
    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.iter().find(|m| m.id == id)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Ends the registration phase
    pub fn into_models(self) -> Vec<Rc<ModelDescriptor>> {
        self.models
    }
}

/// Builds and registers model metadata for one type, exactly once.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    built: Option<Rc<ModelDescriptor>>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the model described by `declaration` and hands `model` back
    /// untouched.
    ///
    /// Repeated calls on the same builder do not register again.
    pub fn decorate<T>(&mut self, model: T, declaration: &Declaration, registry: &mut ModelRegistry) -> T {
        if self.built.is_some() {
            debug!("Model {} already registered", declaration.name);
            return model;
        }

        let descriptor = Rc::new(build_model(declaration));
        registry.register(Rc::clone(&descriptor));
        self.built = Some(descriptor);
        model
    }

    pub fn is_built(&self) -> bool {
        self.built.is_some()
    }

    pub fn descriptor(&self) -> Option<&ModelDescriptor> {
        self.built.as_deref()
    }
}

/// Merges a model's constructor signature and doc comment into a descriptor.
pub fn build_model(declaration: &Declaration) -> ModelDescriptor {
    debug!("Building model metadata for {}", declaration.name);
    let mut acc = DocAccumulator::new();
    let mut required = Vec::new();

    if let Some(signature) = &declaration.signature {
        for param in signature.required() {
            required.push(param.name.clone());
            acc.properties.entry(param.name.clone()).or_default();
        }
        for param in signature.defaulted() {
            acc.properties
                .entry(param.name.clone())
                .or_insert_with(|| PropertyDescriptor {
                    default: param.default.clone(),
                    ..PropertyDescriptor::default()
                });
        }
    }

    acc.parse_docstring(declaration.doc.as_deref());

    ModelDescriptor {
        id: declaration.name.clone(),
        properties: acc.properties,
        required,
        summary: acc.summary,
        notes: acc.notes,
    }
}
