//! Logic related to holding a collection of schemas together.

use crate::errors::JsonValidateError;
use crate::schema::{Form, Schema};
use crate::serde_schema::SerdeSchema;
use failure::Error;
use std::collections::{BTreeSet, HashMap};
use url::Url;

/// Holds a set of root schemas, with every cross-reference known to
/// resolve.
///
/// A registry is immutable once built, and may freely be shared between
/// validators.
#[derive(Debug)]
pub struct Registry {
    schemas: HashMap<Option<Url>, Schema>,
}

impl Registry {
    /// Build a registry from a set of raw schemas.
    ///
    /// Building happens in two passes. First, each raw schema is compiled
    /// into a root schema (applying all of the structural rules of
    /// [`Schema::from_serde`](../schema/struct.Schema.html#method.from_serde))
    /// and indexed by its `id`. Second, every reference in the compiled
    /// graph is checked against the index; if any fail to resolve, building
    /// fails with
    /// [`MissingSchemas`](../errors/enum.JsonValidateError.html) carrying
    /// the full list of unresolvable URIs.
    ///
    /// If two schemas declare the same `id`, the later one wins.
    ///
    /// ```
    /// use failure::Error;
    /// use json_validate::{Registry, Validator};
    /// use serde_json::json;
    ///
    /// fn main() -> Result<(), Error> {
    ///     let user_schema = serde_json::from_value(json!({
    ///         "id": "http://schemas.example.com/user",
    ///         "properties": {
    ///             "name": { "type": "string" },
    ///         },
    ///     }))?;
    ///
    ///     // The schema without an "id" is registered under the empty URI,
    ///     // and is what validators target by default.
    ///     let listing_schema = serde_json::from_value(json!({
    ///         "elements": { "ref": "http://schemas.example.com/user" },
    ///     }))?;
    ///
    ///     let registry = Registry::build(vec![user_schema, listing_schema])?;
    ///     let validator = Validator::new(&registry);
    ///
    ///     let instance = json!([{ "name": "John" }, { "name": 42 }]);
    ///     let errors = validator.validate(&instance)?;
    ///     assert_eq!(errors.len(), 1);
    ///     assert_eq!(errors[0].instance_path().to_string(), "/1/name");
    ///     assert_eq!(errors[0].schema_path().to_string(), "/properties/name/type");
    ///     assert_eq!(
    ///         errors[0].schema_uri().as_ref().map(|uri| uri.as_str()),
    ///         Some("http://schemas.example.com/user"),
    ///     );
    ///
    ///     Ok(())
    /// }
    /// ```
    pub fn build(serde_schemas: Vec<SerdeSchema>) -> Result<Registry, Error> {
        let mut schemas = HashMap::new();
        for serde_schema in serde_schemas {
            let schema = Schema::from_serde(serde_schema)?;
            let id = schema
                .root_data()
                .as_ref()
                .expect("unreachable: from_serde returned a non-root schema")
                .id()
                .clone();

            schemas.insert(id, schema);
        }

        let registry = Registry { schemas };

        let mut missing = BTreeSet::new();
        for schema in registry.schemas.values() {
            registry.collect_missing_uris(&mut missing, schema);
        }

        if !missing.is_empty() {
            return Err(JsonValidateError::MissingSchemas {
                uris: missing.into_iter().collect(),
            }
            .into());
        }

        Ok(registry)
    }

    /// Gets the root schema registered under the given ID, `None` being the
    /// empty URI.
    pub fn get(&self, id: &Option<Url>) -> Option<&Schema> {
        self.schemas.get(id)
    }

    fn collect_missing_uris(&self, out: &mut BTreeSet<String>, schema: &Schema) {
        if let Some(root) = schema.root_data() {
            for definition in root.definitions().values() {
                self.collect_missing_uris(out, definition);
            }
        }

        match schema.form() {
            // Main case: checking references.
            Form::Ref { uri, definition } => match self.schemas.get(uri) {
                Some(target) => {
                    if let Some(definition) = definition {
                        let definitions = target
                            .root_data()
                            .as_ref()
                            .expect("unreachable: non-root schema in registry")
                            .definitions();

                        if !definitions.contains_key(definition) {
                            out.insert(render_uri(uri, Some(definition)));
                        }
                    }
                }
                None => {
                    out.insert(render_uri(uri, None));
                }
            },

            // Recursive cases: discover all references.
            Form::Elements(sub_schema) => self.collect_missing_uris(out, sub_schema),
            Form::Properties {
                required, optional, ..
            } => {
                for sub_schema in required.values() {
                    self.collect_missing_uris(out, sub_schema);
                }

                for sub_schema in optional.values() {
                    self.collect_missing_uris(out, sub_schema);
                }
            }
            Form::Values(sub_schema) => self.collect_missing_uris(out, sub_schema),
            Form::Discriminator { mapping, .. } => {
                for sub_schema in mapping.values() {
                    self.collect_missing_uris(out, sub_schema);
                }
            }
            _ => {}
        }
    }
}

fn render_uri(uri: &Option<Url>, fragment: Option<&str>) -> String {
    match (uri, fragment) {
        (Some(uri), Some(fragment)) => {
            let mut uri = uri.clone();
            uri.set_fragment(Some(fragment));
            uri.to_string()
        }
        (Some(uri), None) => uri.to_string(),
        (None, Some(fragment)) => format!("#{}", fragment),
        (None, None) => String::new(),
    }
}
