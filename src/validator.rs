//! Validate input data against schemas.
//!
//! This module contains logic related to *validation*, the process of
//! taking a piece of input data (called an "instance") and checking if it's
//! valid according to a schema in a registry.
//!
//! See the docs for [`Validator`](struct.Validator.html) for more.

use crate::errors::JsonValidateError;
use crate::registry::Registry;
use crate::vm;
use failure::Error;
use json_pointer::JsonPointer;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use url::Url;

/// Validates instances against the schemas of a registry.
pub struct Validator<'a> {
    registry: &'a Registry,
    config: Config,
}

impl<'a> Validator<'a> {
    /// Constructs a new validator using the default configuration.
    pub fn new(registry: &'a Registry) -> Self {
        Self::new_with_config(registry, Config::new())
    }

    /// Constructs a new validator using a configuration.
    pub fn new_with_config(registry: &'a Registry, config: Config) -> Self {
        Self { registry, config }
    }

    /// Validate an instance against the default schema of the registry.
    ///
    /// The default schema is the root registered under the empty URI, that
    /// is, the root that did not declare an `id`.
    ///
    /// The generated validation errors borrow from the instance and the
    /// registry rather than copying data out of them. Despite having
    /// "Error" in their name, they are not Rust errors: a list of
    /// validation errors is the *successful* result of validating.
    pub fn validate<'b>(
        &'b self,
        instance: &'b Value,
    ) -> Result<Vec<ValidationError<'b>>, Error> {
        static EMPTY_URI: Option<Url> = None;
        self.validate_by_uri(&EMPTY_URI, instance)
    }

    /// Validate an instance against the root schema with the given URI.
    ///
    /// Returns
    /// [`NoSuchSchema`](../errors/enum.JsonValidateError.html#variant.NoSuchSchema)
    /// if no root with that URI is registered, and
    /// [`MaxDepth`](../errors/enum.JsonValidateError.html#variant.MaxDepth)
    /// if the configured maximum reference depth is exceeded (see
    /// [`Config::max_depth`](struct.Config.html#method.max_depth)).
    pub fn validate_by_uri<'b>(
        &'b self,
        uri: &'b Option<Url>,
        instance: &'b Value,
    ) -> Result<Vec<ValidationError<'b>>, Error> {
        let schema = match self.registry.get(uri) {
            Some(schema) => schema,
            None => return Err(JsonValidateError::NoSuchSchema.into()),
        };

        vm::validate(
            self.config.max_errors,
            self.config.max_depth,
            self.registry,
            uri,
            schema,
            instance,
        )
    }
}

/// Configuration for how validation should proceed.
#[derive(Debug, Eq, PartialEq, Clone, Hash)]
pub struct Config {
    max_errors: usize,
    max_depth: usize,
}

impl Config {
    /// Create a new, default `Config`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of errors to produce before stopping
    /// validation. 0, the default value, indicates that all errors should
    /// be produced.
    ///
    /// If your use-case doesn't care about errors, and you just want to
    /// abort on the first problem, you should set this value to 1.
    pub fn max_errors(&mut self, max_errors: usize) -> &mut Self {
        self.max_errors = max_errors;
        self
    }

    /// Sets the maximum schema stack depth before aborting evaluation. The
    /// default value is to follow 32 cross-references before aborting; 0
    /// removes the bound entirely.
    ///
    /// When evaluation is aborted because of this maximum depth, validation
    /// *fails*. No validation errors are returned.
    ///
    /// This functionality exists to support detecting infinite loops in
    /// schemas, for example in circularly-defined schemas.
    pub fn max_depth(&mut self, max_depth: usize) -> &mut Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_errors: 0,
            max_depth: 32,
        }
    }
}

/// Contains a single problem with an instance when evaluated against a
/// schema.
///
/// The two paths are standardized: any implementation of the dialect
/// produces the same pointers for the same schema and instance, making
/// errors portable across platforms.
///
/// `ValidationError` uses `Cow` instead of `String` for its path tokens.
/// That's because this crate makes every effort not to copy data out of
/// your instances; only tokens that must be fabricated (such as the
/// stringified indices of an array) are owned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError<'a> {
    instance_path: JsonPointer<Cow<'a, str>, Vec<Cow<'a, str>>>,
    schema_path: JsonPointer<Cow<'a, str>, Vec<Cow<'a, str>>>,
    schema_uri: &'a Option<Url>,
}

impl<'a> ValidationError<'a> {
    pub(crate) fn new(
        instance_path: JsonPointer<Cow<'a, str>, Vec<Cow<'a, str>>>,
        schema_path: JsonPointer<Cow<'a, str>, Vec<Cow<'a, str>>>,
        schema_uri: &'a Option<Url>,
    ) -> Self {
        ValidationError {
            instance_path,
            schema_path,
            schema_uri,
        }
    }

    /// A pointer into the part of the instance (input) which was rejected.
    pub fn instance_path(&self) -> &JsonPointer<Cow<'a, str>, Vec<Cow<'a, str>>> {
        &self.instance_path
    }

    /// A pointer into the part of the schema which rejected the instance.
    ///
    /// The pointer is relative to the root schema that owns the failing
    /// constraint; see [`schema_uri`](#method.schema_uri).
    pub fn schema_path(&self) -> &JsonPointer<Cow<'a, str>, Vec<Cow<'a, str>>> {
        &self.schema_path
    }

    /// The identifier of the root schema which rejected the instance;
    /// `None` is the empty URI.
    pub fn schema_uri(&self) -> &'a Option<Url> {
        self.schema_uri
    }
}

impl<'a> Serialize for ValidationError<'a> {
    /// Serializes into the interchange form: `instancePath` and
    /// `schemaPath` as JSON-Pointer strings, `schemaURI` as a string (empty
    /// for the empty URI).
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ValidationError", 3)?;
        state.serialize_field("instancePath", &self.instance_path.to_string())?;
        state.serialize_field("schemaPath", &self.schema_path.to_string())?;
        state.serialize_field(
            "schemaURI",
            self.schema_uri.as_ref().map(Url::as_str).unwrap_or(""),
        )?;
        state.end()
    }
}
