//! Document settings: defaults plus last-write-wins overrides.
//!
//! Option names are not validated; unknown options are stored and carried
//! along. Typed accessors fall back to the built-in default when an option
//! holds a value of the wrong JSON type.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde_json::{json, Value};

pub const TITLE: &str = "title";
pub const BASE_URL: &str = "base_url";
pub const API_VERSION: &str = "api_version";
pub const SWAGGER_PREFIX: &str = "swagger_prefix";
pub const API_KEY: &str = "api_key";
pub const ENABLED_METHODS: &str = "enabled_methods";
pub const EXCLUDE_NAMESPACES: &str = "exclude_namespaces";

/// Option name → value map consumed by the document assembler
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    options: IndexMap<String, Value>,
}

fn defaults() -> IndexMap<String, Value> {
    IndexMap::from([
        (TITLE.to_string(), json!("API")),
        (BASE_URL.to_string(), json!("/")),
        (API_VERSION.to_string(), json!("v1.0")),
        (SWAGGER_PREFIX.to_string(), json!("/swagger")),
        (API_KEY.to_string(), json!("")),
        (
            ENABLED_METHODS.to_string(),
            json!(["get", "post", "put", "patch", "delete"]),
        ),
        (EXCLUDE_NAMESPACES.to_string(), json!([])),
    ])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            options: defaults(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `options` over the current values, last write wins per key.
    pub fn merge<I, K>(&mut self, options: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        for (key, value) in options {
            let key = key.into();
            debug!("Setting {} = {}", key, value);
            self.options.insert(key, value);
        }
    }

    /// Merges a JSON object, e.g. the contents of a settings file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `value` is not an object.
    pub fn merge_json(&mut self, value: Value) -> Result<()> {
        match value {
            Value::Object(map) => {
                self.merge(map);
                Ok(())
            }
            other => Err(Error::InvalidArgument(format!(
                "settings must be a JSON object, got {}",
                other
            ))),
        }
    }

    /// Merges one `key=value` assignment. The value is read as JSON when it
    /// parses, otherwise taken as a plain string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] when there is no `=` or the key is
    /// empty.
    pub fn merge_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((key, raw)) = assignment.split_once('=') else {
            return Err(Error::InvalidArgument(format!(
                "expected KEY=VALUE, got `{}`",
                assignment
            )));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "missing option name in `{}`",
                assignment
            )));
        }
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        self.merge([(key, value)]);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn options(&self) -> &IndexMap<String, Value> {
        &self.options
    }

    pub fn title(&self) -> String {
        self.string_or_default(TITLE)
    }

    pub fn base_url(&self) -> String {
        self.string_or_default(BASE_URL)
    }

    pub fn api_version(&self) -> String {
        self.string_or_default(API_VERSION)
    }

    pub fn swagger_prefix(&self) -> String {
        self.string_or_default(SWAGGER_PREFIX)
    }

    /// Lower-cased HTTP methods the document may contain
    pub fn enabled_methods(&self) -> Vec<String> {
        self.strings_or_default(ENABLED_METHODS)
            .into_iter()
            .map(|m| m.to_lowercase())
            .collect()
    }

    /// Path prefixes left out of the document
    pub fn exclude_namespaces(&self) -> Vec<String> {
        self.strings_or_default(EXCLUDE_NAMESPACES)
    }

    fn string_or_default(&self, key: &str) -> String {
        match self.options.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => defaults()
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        }
    }

    fn strings_or_default(&self, key: &str) -> Vec<String> {
        let from = |value: &Value| -> Option<Vec<String>> {
            value
                .as_array()?
                .iter()
                .map(|v| v.as_str().map(str::to_string))
                .collect()
        };
        self.options
            .get(key)
            .and_then(from)
            .or_else(|| defaults().get(key).and_then(from))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let settings = Settings::new();
        assert_eq!(settings.title(), "API");
        assert_eq!(settings.base_url(), "/");
        assert_eq!(settings.api_version(), "v1.0");
        assert_eq!(settings.swagger_prefix(), "/swagger");
        assert_eq!(
            settings.enabled_methods(),
            vec!["get", "post", "put", "patch", "delete"]
        );
        assert!(settings.exclude_namespaces().is_empty());
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut settings = Settings::new();
        settings.merge([("title", json!("Widgets")), ("base_url", json!("/v1"))]);
        settings.merge([("title", json!("Gadgets"))]);

        assert_eq!(settings.title(), "Gadgets");
        assert_eq!(settings.base_url(), "/v1");
    }

    #[test]
    fn test_unknown_options_are_kept() {
        let mut settings = Settings::new();
        settings.merge([("whatever", json!(42))]);
        assert_eq!(settings.get("whatever"), Some(&json!(42)));
        // Keeps defaults order, new keys appended
        assert_eq!(settings.options().keys().last().map(String::as_str), Some("whatever"));
    }

    #[test]
    fn test_wrong_type_falls_back_to_default() {
        let mut settings = Settings::new();
        settings.merge([("title", json!(7)), ("enabled_methods", json!("get"))]);
        assert_eq!(settings.title(), "API");
        assert_eq!(settings.enabled_methods().len(), 5);
    }

    #[test]
    fn test_merge_json() {
        let mut settings = Settings::new();
        settings
            .merge_json(json!({"api_version": "2.0", "enabled_methods": ["GET"]}))
            .unwrap();
        assert_eq!(settings.api_version(), "2.0");
        assert_eq!(settings.enabled_methods(), vec!["get"]);

        assert!(settings.merge_json(json!([1, 2])).is_err());
    }

    #[test]
    fn test_merge_assignment() {
        let mut settings = Settings::new();
        settings.merge_assignment("title=Widget API").unwrap();
        settings.merge_assignment("exclude_namespaces=[\"/internal\"]").unwrap();

        assert_eq!(settings.title(), "Widget API");
        assert_eq!(settings.exclude_namespaces(), vec!["/internal"]);
        assert!(settings.merge_assignment("no-equals").is_err());
        assert!(settings.merge_assignment("=value").is_err());
    }
}
