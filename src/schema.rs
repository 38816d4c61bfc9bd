//! Compiled schemas, and the structural rules for building them.
//!
//! A [`Schema`](struct.Schema.html) is the checked, tagged counterpart of
//! the free-form [`SerdeSchema`](../serde_schema/struct.SerdeSchema.html):
//! exactly one [`Form`](enum.Form.html) per schema, root-only data split
//! out, and every `ref` already resolved against its root's base URI.

use crate::errors::JsonValidateError;
use crate::serde_schema::SerdeSchema;
use failure::Error;
use serde_json::Value;
use std::collections::HashMap;
use url::Url;

/// A compiled schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    root: Option<RootData>,
    form: Form,
    extra: HashMap<String, Value>,
}

/// Data that only root schemas carry.
#[derive(Clone, Debug, PartialEq)]
pub struct RootData {
    id: Option<Url>,
    definitions: HashMap<String, Schema>,
}

/// The form a schema takes on, with the payload of its keywords.
///
/// The variant is the single source of truth for which keywords the schema
/// used; no other slot is populated.
#[derive(Clone, Debug, PartialEq)]
pub enum Form {
    /// No kind-selecting keyword. Validates everything.
    Empty,

    /// A reference to another schema in the registry.
    ///
    /// `uri` is the fragmentless identifier of the target root, already
    /// resolved against the containing root's base (`None` is the empty
    /// URI). `definition` is the fragment, naming an entry of the target's
    /// definitions; absent, the target is the root itself.
    Ref {
        uri: Option<Url>,
        definition: Option<String>,
    },

    /// A primitive type check.
    Type(Type),

    /// An array whose elements all satisfy one sub-schema.
    Elements(Box<Schema>),

    /// An object with required and optional named members.
    ///
    /// The presence flags record which of the two keywords appeared in the
    /// raw schema; evaluation of non-objects blames only the keywords that
    /// were actually present.
    Properties {
        required: HashMap<String, Schema>,
        optional: HashMap<String, Schema>,
        required_present: bool,
        optional_present: bool,
    },

    /// An object whose member values all satisfy one sub-schema.
    Values(Box<Schema>),

    /// A tagged union: the named member selects a schema from the mapping.
    Discriminator {
        property_name: String,
        mapping: HashMap<String, Schema>,
    },
}

/// The primitive types of the dialect.
///
/// `Number` matches any JSON number; integers and floats are not
/// distinguished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Type {
    Null,
    Boolean,
    Number,
    String,
}

impl Schema {
    /// Compile a raw schema into a root schema, enforcing every structural
    /// rule along the way.
    ///
    /// References are resolved against the schema's own `id` here, but not
    /// checked for existence; that is the registry's job.
    pub fn from_serde(serde_schema: SerdeSchema) -> Result<Self, Error> {
        let base = match serde_schema.id {
            Some(ref id) if !id.is_empty() => match Url::parse(id) {
                Ok(mut id) => {
                    // Identifiers are fragmentless.
                    id.set_fragment(None);
                    Some(id)
                }
                Err(_) => return Err(JsonValidateError::BadUri { uri: id.clone() }.into()),
            },
            _ => None,
        };

        Self::compile(serde_schema, true, &base)
    }

    /// Whether this is a root schema.
    pub fn root_data(&self) -> &Option<RootData> {
        &self.root
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// The unrecognised keywords of the raw schema, carried verbatim.
    pub fn extra(&self) -> &HashMap<String, Value> {
        &self.extra
    }

    fn compile(serde_schema: SerdeSchema, is_root: bool, base: &Option<Url>) -> Result<Self, Error> {
        let SerdeSchema {
            id,
            ref_,
            definitions,
            type_,
            elements,
            properties,
            optional_properties,
            values,
            discriminator,
            extra,
        } = serde_schema;

        if !is_root && (id.is_some() || definitions.is_some()) {
            return Err(JsonValidateError::BadSubSchema.into());
        }

        let root = if is_root {
            let mut compiled_definitions = HashMap::new();
            for (name, sub_schema) in definitions.unwrap_or_default() {
                compiled_definitions.insert(name, Self::compile(sub_schema, false, base)?);
            }

            Some(RootData {
                id: base.clone(),
                definitions: compiled_definitions,
            })
        } else {
            None
        };

        let kind_keywords = [
            ref_.is_some(),
            type_.is_some(),
            elements.is_some(),
            properties.is_some() || optional_properties.is_some(),
            values.is_some(),
            discriminator.is_some(),
        ];

        if kind_keywords.iter().filter(|&&present| present).count() > 1 {
            return Err(JsonValidateError::BadSchemaKind.into());
        }

        let form = if let Some(ref_) = ref_ {
            resolve_ref(base, &ref_)?
        } else if let Some(type_) = type_ {
            Form::Type(match type_.as_str() {
                "null" => Type::Null,
                "boolean" => Type::Boolean,
                "number" => Type::Number,
                "string" => Type::String,
                _ => {
                    return Err(JsonValidateError::BadType {
                        value: type_.clone(),
                    }
                    .into())
                }
            })
        } else if let Some(elements) = elements {
            Form::Elements(Box::new(Self::compile(*elements, false, base)?))
        } else if properties.is_some() || optional_properties.is_some() {
            let required_present = properties.is_some();
            let optional_present = optional_properties.is_some();

            let mut required = HashMap::new();
            for (name, sub_schema) in properties.unwrap_or_default() {
                required.insert(name, Self::compile(sub_schema, false, base)?);
            }

            let mut optional = HashMap::new();
            for (name, sub_schema) in optional_properties.unwrap_or_default() {
                optional.insert(name, Self::compile(sub_schema, false, base)?);
            }

            Form::Properties {
                required,
                optional,
                required_present,
                optional_present,
            }
        } else if let Some(values) = values {
            Form::Values(Box::new(Self::compile(*values, false, base)?))
        } else if let Some(discriminator) = discriminator {
            let mut mapping = HashMap::new();
            for (name, sub_schema) in discriminator.mapping {
                mapping.insert(name, Self::compile(sub_schema, false, base)?);
            }

            Form::Discriminator {
                property_name: discriminator.property_name,
                mapping,
            }
        } else {
            Form::Empty
        };

        Ok(Schema { root, form, extra })
    }
}

impl RootData {
    /// The identifier of this root; `None` is the empty URI.
    pub fn id(&self) -> &Option<Url> {
        &self.id
    }

    pub fn definitions(&self) -> &HashMap<String, Schema> {
        &self.definitions
    }
}

fn resolve_ref(base: &Option<Url>, reference: &str) -> Result<Form, Error> {
    let resolved = match base {
        Some(base) => base.join(reference),
        None => Url::parse(reference),
    };

    match resolved {
        Ok(mut uri) => {
            let definition = match uri.fragment() {
                Some(fragment) if !fragment.is_empty() => Some(fragment.to_owned()),
                _ => None,
            };

            uri.set_fragment(None);
            Ok(Form::Ref {
                uri: Some(uri),
                definition,
            })
        }

        // Without a base there is nothing to resolve a relative reference
        // against; only the empty and fragment-only references (the
        // anonymous root itself) are meaningful.
        Err(url::ParseError::RelativeUrlWithoutBase) => match reference.strip_prefix('#') {
            Some("") => Ok(Form::Ref {
                uri: None,
                definition: None,
            }),
            Some(fragment) => Ok(Form::Ref {
                uri: None,
                definition: Some(fragment.to_owned()),
            }),
            None if reference.is_empty() => Ok(Form::Ref {
                uri: None,
                definition: None,
            }),
            None => Err(JsonValidateError::BadUri {
                uri: reference.to_owned(),
            }
            .into()),
        },

        Err(_) => Err(JsonValidateError::BadUri {
            uri: reference.to_owned(),
        }
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn compile(value: Value) -> Result<Schema, Error> {
        Schema::from_serde(serde_json::from_value(value).unwrap())
    }

    fn compile_err(value: Value) -> JsonValidateError {
        compile(value).unwrap_err().downcast().unwrap()
    }

    #[test]
    fn empty_form() {
        let schema = compile(json!({})).unwrap();
        assert_eq!(schema.form(), &Form::Empty);

        let root = schema.root_data().as_ref().unwrap();
        assert_eq!(root.id(), &None);
        assert!(root.definitions().is_empty());
    }

    #[test]
    fn type_form() {
        for (name, type_) in [
            ("null", Type::Null),
            ("boolean", Type::Boolean),
            ("number", Type::Number),
            ("string", Type::String),
        ] {
            let schema = compile(json!({ "type": name })).unwrap();
            assert_eq!(schema.form(), &Form::Type(type_));
        }

        assert_eq!(
            compile_err(json!({ "type": "integer" })),
            JsonValidateError::BadType {
                value: "integer".to_owned()
            }
        );
    }

    #[test]
    fn elements_form() {
        let schema = compile(json!({ "elements": { "type": "string" } })).unwrap();
        assert_eq!(
            schema.form(),
            &Form::Elements(Box::new(Schema {
                root: None,
                form: Form::Type(Type::String),
                extra: HashMap::new(),
            }))
        );
    }

    #[test]
    fn properties_form() {
        let schema = compile(json!({ "properties": { "a": {} } })).unwrap();
        match schema.form() {
            Form::Properties {
                required,
                optional,
                required_present,
                optional_present,
            } => {
                assert!(required.contains_key("a"));
                assert!(optional.is_empty());
                assert!(*required_present);
                assert!(!*optional_present);
            }
            form => panic!("wrong form: {:?}", form),
        }

        // The one keyword pair that may coexist.
        let schema = compile(json!({
            "properties": { "a": {} },
            "optionalProperties": { "b": {} },
        }))
        .unwrap();
        match schema.form() {
            Form::Properties {
                required_present,
                optional_present,
                ..
            } => {
                assert!(*required_present);
                assert!(*optional_present);
            }
            form => panic!("wrong form: {:?}", form),
        }
    }

    #[test]
    fn discriminator_form() {
        let schema = compile(json!({
            "discriminator": {
                "propertyName": "kind",
                "mapping": { "a": { "type": "null" } },
            },
        }))
        .unwrap();

        match schema.form() {
            Form::Discriminator {
                property_name,
                mapping,
            } => {
                assert_eq!(property_name, "kind");
                assert_eq!(mapping["a"].form(), &Form::Type(Type::Null));
            }
            form => panic!("wrong form: {:?}", form),
        }
    }

    #[test]
    fn bad_schema_kind() {
        for value in [
            json!({ "ref": "", "type": "null" }),
            json!({ "type": "null", "elements": {} }),
            json!({ "elements": {}, "properties": {}, "optionalProperties": {} }),
            json!({ "properties": {}, "optionalProperties": {}, "values": {} }),
            json!({ "values": {}, "discriminator": { "propertyName": "", "mapping": {} } }),
        ] {
            assert_eq!(compile_err(value), JsonValidateError::BadSchemaKind);
        }
    }

    #[test]
    fn bad_sub_schema() {
        for value in [
            json!({ "definitions": { "a": { "id": "" } } }),
            json!({ "elements": { "id": "" } }),
            json!({ "properties": { "a": { "definitions": {} } } }),
            json!({ "optionalProperties": { "a": { "id": "" } } }),
            json!({ "values": { "definitions": {} } }),
            json!({
                "discriminator": {
                    "propertyName": "kind",
                    "mapping": { "a": { "id": "" } },
                },
            }),
        ] {
            assert_eq!(compile_err(value), JsonValidateError::BadSubSchema);
        }
    }

    #[test]
    fn bad_uri() {
        assert_eq!(
            compile_err(json!({ "id": "::" })),
            JsonValidateError::BadUri {
                uri: "::".to_owned()
            }
        );

        // A relative reference in an anonymous root has no base to resolve
        // against.
        assert_eq!(
            compile_err(json!({ "ref": "/foo" })),
            JsonValidateError::BadUri {
                uri: "/foo".to_owned()
            }
        );
    }

    #[test]
    fn root_id() {
        let schema = compile(json!({ "id": "http://example.com/foo" })).unwrap();
        assert_eq!(
            schema.root_data().as_ref().unwrap().id(),
            &Some("http://example.com/foo".parse().unwrap())
        );

        // An empty id is the same as no id at all.
        let schema = compile(json!({ "id": "" })).unwrap();
        assert_eq!(schema.root_data().as_ref().unwrap().id(), &None);

        // Fragments are stripped from identifiers.
        let schema = compile(json!({ "id": "http://example.com/foo#frag" })).unwrap();
        assert_eq!(
            schema.root_data().as_ref().unwrap().id(),
            &Some("http://example.com/foo".parse().unwrap())
        );
    }

    #[test]
    fn refs_resolve_against_base() {
        let schema = compile(json!({
            "id": "http://example.com/foo",
            "elements": { "ref": "/bar#a" },
        }))
        .unwrap();

        match schema.form() {
            Form::Elements(sub_schema) => assert_eq!(
                sub_schema.form(),
                &Form::Ref {
                    uri: Some("http://example.com/bar".parse().unwrap()),
                    definition: Some("a".to_owned()),
                }
            ),
            form => panic!("wrong form: {:?}", form),
        }
    }

    #[test]
    fn anonymous_self_refs() {
        for reference in ["", "#"] {
            let schema = compile(json!({ "ref": reference })).unwrap();
            assert_eq!(
                schema.form(),
                &Form::Ref {
                    uri: None,
                    definition: None,
                },
                "reference {:?}",
                reference
            );
        }

        let schema = compile(json!({ "ref": "#a" })).unwrap();
        assert_eq!(
            schema.form(),
            &Form::Ref {
                uri: None,
                definition: Some("a".to_owned()),
            }
        );
    }

    #[test]
    fn extras_carried_through() {
        let schema = compile(json!({ "type": "string", "metadata": { "note": "x" } })).unwrap();
        assert_eq!(schema.extra()["metadata"], json!({ "note": "x" }));
    }
}
