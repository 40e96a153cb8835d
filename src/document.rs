//! Assembly of a Swagger 1.2-style document from built metadata.
//!
//! The builder receives operation descriptors together with the path and HTTP
//! method they are served under, and the model registry once declarations have
//! all been processed. Settings control the document header and which
//! operations are published.

use crate::descriptor::{ModelDescriptor, OperationDescriptor, ParameterDescriptor, ResponseDescriptor};
use crate::extractor::HttpMethod;
use crate::model::ModelRegistry;
use crate::settings::Settings;
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

pub const SWAGGER_VERSION: &str = "1.2";

/// Document header info
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
}

/// One operation as published in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationEntry {
    /// Upper-case HTTP method
    pub method: String,
    pub nickname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(rename = "responseMessages")]
    pub response_messages: Vec<ResponseDescriptor>,
}

/// All operations served under one path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEntry {
    pub path: String,
    pub operations: Vec<OperationEntry>,
}

/// The assembled document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwaggerDocument {
    #[serde(rename = "swaggerVersion")]
    pub swagger_version: String,
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    #[serde(rename = "basePath")]
    pub base_path: String,
    pub info: Info,
    pub apis: Vec<ApiEntry>,
    pub models: IndexMap<String, ModelDescriptor>,
}

/// Collects operations and produces a [`SwaggerDocument`]
pub struct DocumentBuilder {
    settings: Settings,
    apis: IndexMap<String, Vec<OperationEntry>>,
}

impl DocumentBuilder {
    pub fn new(settings: &Settings) -> Self {
        debug!("Initializing DocumentBuilder");
        Self {
            settings: settings.clone(),
            apis: IndexMap::new(),
        }
    }

    /// Adds an operation served at `path` with `method`.
    ///
    /// `:name` path segments are rewritten to `{name}`. Operations sharing a
    /// path are grouped under one API entry in the order they were added.
    ///
    /// # Arguments
    ///
    /// * `path` - URL path, in either `/a/{id}` or `/a/:id` form
    /// * `method` - HTTP method the handler serves
    /// * `descriptor` - Metadata built from the handler's declaration
    ///
    /// # Returns
    ///
    /// `false` when settings exclude the operation, either because the method
    /// is not enabled or the path lies in an excluded namespace.
    pub fn add_operation(
        &mut self,
        path: &str,
        method: HttpMethod,
        operation: &OperationDescriptor,
    ) -> bool {
        if !self
            .settings
            .enabled_methods()
            .iter()
            .any(|m| m == method.as_str())
        {
            debug!(
                "Skipping {} {}: method not enabled",
                method.as_str(),
                path
            );
            return false;
        }
        if self
            .settings
            .exclude_namespaces()
            .iter()
            .any(|ns| path.starts_with(ns.as_str()))
        {
            debug!("Skipping {} {}: excluded namespace", method.as_str(), path);
            return false;
        }

        let path = Self::convert_path_format(path);
        debug!("Adding operation: {} {}", method.as_str(), path);

        let entry = OperationEntry {
            method: method.as_str().to_uppercase(),
            nickname: operation
                .nickname
                .clone()
                .unwrap_or_else(|| operation.name.clone()),
            summary: operation.summary.clone(),
            notes: operation.notes.clone(),
            parameters: operation.parameters.values().cloned().collect(),
            response_messages: operation.responses.clone(),
        };
        self.apis.entry(path).or_default().push(entry);
        true
    }

    /// Converts `:param` segments to `{param}`
    fn convert_path_format(path: &str) -> String {
        path.split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => format!("{{{}}}", name),
                None => part.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Builds the final document with every model in `registry`.
    ///
    /// When two models share an id the first registered one is kept.
    pub fn build(self, registry: &ModelRegistry) -> SwaggerDocument {
        debug!("Building final document");

        let mut models = IndexMap::new();
        for model in registry.iter() {
            models
                .entry(model.id.clone())
                .or_insert_with(|| model.clone());
        }

        SwaggerDocument {
            swagger_version: SWAGGER_VERSION.to_string(),
            api_version: self.settings.api_version(),
            base_path: self.settings.base_url(),
            info: Info {
                title: self.settings.title(),
            },
            apis: self
                .apis
                .into_iter()
                .map(|(path, operations)| ApiEntry { path, operations })
                .collect(),
            models,
        }
    }
}
