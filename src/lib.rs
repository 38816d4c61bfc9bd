//! `json-validate` checks JSON instances against schemas written in a
//! portable, JSON-based schema dialect.
//!
//! Schemas live in a [`Registry`](registry/struct.Registry.html), keyed by
//! URI, and may refer to one another — including circularly. Validating an
//! instance produces a list of
//! [`ValidationError`](validator/struct.ValidationError.html)s, each
//! carrying a pair of standardized JSON Pointers (into the instance and
//! into the schema) plus the URI of the schema that rejected the instance,
//! so errors are portable across implementations of the dialect.
//!
//! # Validating data
//!
//! The most common use-case for this crate is checking that some JSON input
//! really is valid against a schema:
//!
//! ```
//! use failure::Error;
//! use json_validate::{Registry, SerdeSchema, Validator};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Error> {
//!     // The SerdeSchema type is a serde-friendly format for representing
//!     // schemas.
//!     let demo_schema: SerdeSchema = serde_json::from_value(json!({
//!         "properties": {
//!             "name": { "type": "string" },
//!             "age": { "type": "number" },
//!             "phones": {
//!                 "elements": { "type": "string" }
//!             }
//!         }
//!     }))?;
//!
//!     // Building a registry checks the schemas structurally and resolves
//!     // all cross-references.
//!     let registry = Registry::build(vec![demo_schema])?;
//!     let validator = Validator::new(&registry);
//!
//!     let input_ok = json!({
//!         "name": "John Doe",
//!         "age": 43,
//!         "phones": [
//!             "+44 1234567",
//!             "+44 2345678"
//!         ]
//!     });
//!
//!     assert!(validator.validate(&input_ok)?.is_empty());
//!
//!     let input_bad = json!({
//!         "age": "43",
//!         "phones": [
//!             "+44 1234567",
//!             442345678
//!         ]
//!     });
//!
//!     // Each ValidationError holds paths to the bad part of the input, as
//!     // well as the part of the schema which rejected it.
//!     //
//!     // For testing purposes, we'll sort the errors so that their order
//!     // is predictable.
//!     let mut errors = validator.validate(&input_bad)?;
//!     errors.sort_by_key(|err| err.schema_path().to_string());
//!     assert_eq!(errors.len(), 3);
//!
//!     // "age" has the wrong type
//!     assert_eq!(errors[0].instance_path().to_string(), "/age");
//!     assert_eq!(errors[0].schema_path().to_string(), "/properties/age/type");
//!
//!     // "name" is required
//!     assert_eq!(errors[1].instance_path().to_string(), "");
//!     assert_eq!(errors[1].schema_path().to_string(), "/properties/name");
//!
//!     // "phones[1]" has the wrong type
//!     assert_eq!(errors[2].instance_path().to_string(), "/phones/1");
//!     assert_eq!(errors[2].schema_path().to_string(), "/properties/phones/elements/type");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Multiple schemas
//!
//! Schemas can declare an `id` and refer to each other by URI; a registry
//! holds the whole set and fails to build if any reference does not
//! resolve. See [`Registry::build`](registry/struct.Registry.html#method.build).

mod vm;

pub mod errors;
pub mod registry;
pub mod schema;
pub mod serde_schema;
pub mod validator;

pub use crate::errors::JsonValidateError;
pub use crate::registry::Registry;
pub use crate::schema::{Form, RootData, Schema, Type};
pub use crate::serde_schema::{SerdeDiscriminator, SerdeSchema};
pub use crate::validator::{Config, ValidationError, Validator};
