use crate::errors::JsonValidateError;
use crate::registry::Registry;
use crate::schema::{Form, Schema, Type};
use crate::validator::ValidationError;
use failure::Error;
use json_pointer::JsonPointer;
use serde_json::Value;
use std::borrow::Cow;
use url::Url;

pub fn validate<'a>(
    max_errors: usize,
    max_depth: usize,
    registry: &'a Registry,
    uri: &'a Option<Url>,
    schema: &'a Schema,
    instance: &'a Value,
) -> Result<Vec<ValidationError<'a>>, Error> {
    let mut vm = Vm {
        max_errors,
        max_depth,
        registry,
        instance_tokens: vec![],
        schema_stack: vec![Frame {
            uri,
            tokens: vec![],
        }],
        errors: vec![],
    };

    match vm.eval(schema, instance) {
        Ok(()) | Err(EvalError::Sentinel) => Ok(vm.errors),
        Err(EvalError::Fatal(error)) => Err(error),
    }
}

// Reaching max_errors short-circuits through the error channel, but it is
// not a real failure; validate() above turns it back into a normal result.
enum EvalError {
    Sentinel,
    Fatal(Error),
}

struct Vm<'a> {
    max_errors: usize,
    max_depth: usize,
    registry: &'a Registry,
    instance_tokens: Vec<Cow<'a, str>>,
    schema_stack: Vec<Frame<'a>>,
    errors: Vec<ValidationError<'a>>,
}

// One entry of the schema stack: we are inside the root identified by
// `uri`, at the position named by `tokens`.
struct Frame<'a> {
    uri: &'a Option<Url>,
    tokens: Vec<Cow<'a, str>>,
}

impl<'a> Vm<'a> {
    fn eval(&mut self, schema: &'a Schema, instance: &'a Value) -> Result<(), EvalError> {
        match schema.form() {
            Form::Empty => {}
            Form::Ref { uri, definition } => {
                if self.schema_stack.len() == self.max_depth {
                    return Err(EvalError::Fatal(JsonValidateError::MaxDepth.into()));
                }

                let root = self
                    .registry
                    .get(uri)
                    .expect("unreachable: unresolved ref in registry");

                let (target, tokens) = match definition {
                    Some(definition) => {
                        let target = root
                            .root_data()
                            .as_ref()
                            .expect("unreachable: non-root schema in registry")
                            .definitions()
                            .get(definition)
                            .expect("unreachable: unresolved definition ref in registry");

                        (
                            target,
                            vec!["definitions".into(), Cow::Borrowed(definition.as_str())],
                        )
                    }
                    None => (root, vec![]),
                };

                self.schema_stack.push(Frame { uri, tokens });
                self.eval(target, instance)?;
                self.schema_stack.pop();
            }
            Form::Type(type_) => {
                let matched = match type_ {
                    Type::Null => instance.is_null(),
                    Type::Boolean => instance.is_boolean(),
                    Type::Number => instance.is_number(),
                    Type::String => instance.is_string(),
                };

                if !matched {
                    self.push_schema_token("type");
                    self.report_error()?;
                    self.pop_schema_token();
                }
            }
            Form::Elements(sub_schema) => {
                self.push_schema_token("elements");
                if let Some(array) = instance.as_array() {
                    for (index, element) in array.iter().enumerate() {
                        self.push_instance_token(Cow::Owned(index.to_string()));
                        self.eval(sub_schema, element)?;
                        self.pop_instance_token();
                    }
                } else {
                    self.report_error()?;
                }
                self.pop_schema_token();
            }
            Form::Properties {
                required,
                optional,
                required_present,
                optional_present,
            } => {
                if let Some(object) = instance.as_object() {
                    self.push_schema_token("properties");
                    for (name, sub_schema) in required {
                        self.push_schema_token(name.as_str());
                        if let Some(sub_instance) = object.get(name) {
                            self.push_instance_token(Cow::Borrowed(name.as_str()));
                            self.eval(sub_schema, sub_instance)?;
                            self.pop_instance_token();
                        } else {
                            self.report_error()?;
                        }
                        self.pop_schema_token();
                    }
                    self.pop_schema_token();

                    self.push_schema_token("optionalProperties");
                    for (name, sub_schema) in optional {
                        self.push_schema_token(name.as_str());
                        if let Some(sub_instance) = object.get(name) {
                            self.push_instance_token(Cow::Borrowed(name.as_str()));
                            self.eval(sub_schema, sub_instance)?;
                            self.pop_instance_token();
                        }
                        self.pop_schema_token();
                    }
                    self.pop_schema_token();
                } else {
                    // Which keywords take the blame depends on which ones
                    // appeared in the schema.
                    if *required_present {
                        self.push_schema_token("properties");
                        self.report_error()?;
                        self.pop_schema_token();
                    }

                    if *optional_present {
                        self.push_schema_token("optionalProperties");
                        self.report_error()?;
                        self.pop_schema_token();
                    }
                }
            }
            Form::Values(sub_schema) => {
                self.push_schema_token("values");
                if let Some(object) = instance.as_object() {
                    for (name, sub_instance) in object {
                        self.push_instance_token(Cow::Borrowed(name.as_str()));
                        self.eval(sub_schema, sub_instance)?;
                        self.pop_instance_token();
                    }
                } else {
                    self.report_error()?;
                }
                self.pop_schema_token();
            }
            Form::Discriminator {
                property_name,
                mapping,
            } => {
                self.push_schema_token("discriminator");
                if let Some(object) = instance.as_object() {
                    if let Some(tag) = object.get(property_name) {
                        if let Some(tag) = tag.as_str() {
                            if let Some(sub_schema) = mapping.get(tag) {
                                self.push_schema_token("mapping");
                                self.push_schema_token(tag);
                                // The mapped schema sees the whole object,
                                // discriminant included.
                                self.eval(sub_schema, instance)?;
                                self.pop_schema_token();
                                self.pop_schema_token();
                            } else {
                                self.push_schema_token("mapping");
                                self.push_instance_token(Cow::Borrowed(property_name.as_str()));
                                self.report_error()?;
                                self.pop_instance_token();
                                self.pop_schema_token();
                            }
                        } else {
                            self.push_schema_token("propertyName");
                            self.push_instance_token(Cow::Borrowed(property_name.as_str()));
                            self.report_error()?;
                            self.pop_instance_token();
                            self.pop_schema_token();
                        }
                    } else {
                        self.push_schema_token("propertyName");
                        self.report_error()?;
                        self.pop_schema_token();
                    }
                } else {
                    self.report_error()?;
                }
                self.pop_schema_token();
            }
        }

        Ok(())
    }

    fn push_schema_token<T: Into<Cow<'a, str>>>(&mut self, token: T) {
        self.schema_stack
            .last_mut()
            .expect("unreachable: empty schema stack")
            .tokens
            .push(token.into());
    }

    fn pop_schema_token(&mut self) {
        self.schema_stack
            .last_mut()
            .expect("unreachable: empty schema stack")
            .tokens
            .pop();
    }

    fn push_instance_token(&mut self, token: Cow<'a, str>) {
        self.instance_tokens.push(token);
    }

    fn pop_instance_token(&mut self) {
        self.instance_tokens.pop();
    }

    fn report_error(&mut self) -> Result<(), EvalError> {
        let frame = self
            .schema_stack
            .last()
            .expect("unreachable: empty schema stack");

        self.errors.push(ValidationError::new(
            JsonPointer::new(self.instance_tokens.clone()),
            JsonPointer::new(frame.tokens.clone()),
            frame.uri,
        ));

        if self.errors.len() == self.max_errors {
            Err(EvalError::Sentinel)
        } else {
            Ok(())
        }
    }
}
