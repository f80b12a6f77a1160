//! Named message schemas.
//!
//! This module provides the [`SchemaRegistry`] type that stores message
//! schemas by name (typically one per protocol version or component catalog)
//! and validates payloads against them.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::conformance::{ConformanceChecker, JsonSchemaChecker};
use crate::error::Violation;
use crate::traverse::Limits;
use crate::validator::Validator;
use crate::ValidationResult;

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<HashMap<String, Arc<Value>>>>;

/// A thread-safe registry of named message schemas.
///
/// Only the schema documents are stored. Every validation derives its
/// reference map afresh, so registering a schema never changes the outcome
/// of validations already running.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>`:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// # Example
///
/// ```rust
/// use a2ui_guard::{SchemaRegistry, SkipConformance};
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new().with_conformance(SkipConformance);
/// registry.register("v0.9", json!({"type": "object"})).unwrap();
///
/// let result = registry
///     .validate("v0.9", &json!({"components": [{"id": "root"}]}))
///     .unwrap();
/// assert!(result.is_ok());
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
    limits: Limits,
    conformance: Arc<dyn ConformanceChecker>,
}

impl SchemaRegistry {
    /// Creates a new empty registry with default limits and JSON Schema conformance.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            limits: Limits::default(),
            conformance: Arc::new(JsonSchemaChecker),
        }
    }

    /// Sets the structural depth bound used by every validation (default 50).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.limits = self.limits.with_max_depth(depth);
        self
    }

    /// Sets the function-call depth bound used by every validation (default 5).
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.limits = self.limits.with_max_call_depth(depth);
        self
    }

    /// Sets the schema conformance collaborator used by every validation.
    pub fn with_conformance<C>(mut self, checker: C) -> Self
    where
        C: ConformanceChecker + 'static,
    {
        self.conformance = Arc::new(checker);
        self
    }

    /// Registers a schema under the given name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use a2ui_guard::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("v0.8", json!({})).unwrap();
    ///
    /// // Duplicate registration fails
    /// assert!(registry.register("v0.8", json!({})).is_err());
    /// ```
    pub fn register(&self, name: impl Into<String>, schema: Value) -> Result<(), RegistryError> {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(schema = %name, "registered message schema");
        schemas.insert(name, Arc::new(schema));
        Ok(())
    }

    /// Retrieves a schema by name.
    pub fn get(&self, name: &str) -> Option<Arc<Value>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns the registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds a [`Validator`] for a named schema with this registry's settings.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if the name doesn't exist.
    pub fn validator(&self, name: &str) -> Result<Validator, RegistryError> {
        let schema = self
            .get(name)
            .ok_or_else(|| RegistryError::SchemaNotFound(name.to_string()))?;

        let mut validator = Validator::from_shared(schema).with_limits(self.limits);
        validator.set_conformance(Arc::clone(&self.conformance));
        Ok(validator)
    }

    /// Validates a payload against a named schema.
    ///
    /// The outer `Result` reports registry problems; the inner one is the
    /// validation outcome as returned by [`Validator::validate`].
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if the name doesn't exist.
    pub fn validate(
        &self,
        name: &str,
        payload: &Value,
    ) -> Result<Result<(), Violation>, RegistryError> {
        Ok(self.validator(name)?.validate(payload))
    }

    /// Validates messages independently against a named schema.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SchemaNotFound` if the name doesn't exist.
    pub fn validate_batch(
        &self,
        name: &str,
        messages: &[Value],
    ) -> Result<ValidationResult<()>, RegistryError> {
        Ok(self.validator(name)?.validate_batch(messages))
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
            limits: self.limits,
            conformance: Arc::clone(&self.conformance),
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to validate with a schema name that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),
}
