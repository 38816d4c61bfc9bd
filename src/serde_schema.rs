//! A serde-friendly representation of schemas, mirroring the wire format.
//!
//! Nothing in this module checks schemas for structural validity; a
//! [`SerdeSchema`](struct.SerdeSchema.html) is just the JSON object, keyword
//! for keyword. Converting into a [`Schema`](../schema/struct.Schema.html)
//! is where the rules are enforced.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The wire form of a schema.
///
/// All recognised keywords are optional. Keys outside the recognised set are
/// collected into `extra`, so deserialising and reserialising a schema
/// preserves the document verbatim.
#[derive(Debug, PartialEq, Deserialize, Serialize, Default, Clone)]
pub struct SerdeSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "ref")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub definitions: Option<HashMap<String, SerdeSchema>>,

    #[serde(rename = "type")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub elements: Option<Box<SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, SerdeSchema>>,

    #[serde(rename = "optionalProperties")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optional_properties: Option<HashMap<String, SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Box<SerdeSchema>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<SerdeDiscriminator>,

    #[serde(flatten)]
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, Value>,
}

/// The wire form of the `discriminator` keyword's payload.
#[derive(Debug, PartialEq, Deserialize, Serialize, Default, Clone)]
pub struct SerdeDiscriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,

    pub mapping: HashMap<String, SerdeSchema>,
}
