//! An error type for all schema-handling operations.

use failure::Fail;

/// An enum of possible errors that can emerge from this crate.
///
/// Validation errors are not on this list. A list of
/// [`ValidationError`](../validator/struct.ValidationError.html)s is the
/// *successful* result of running a validator; this enum covers the ways
/// building a registry or driving the evaluator can itself fail.
#[derive(Debug, Fail, PartialEq)]
pub enum JsonValidateError {
    /// A declared `id` or `ref` could not be used as a URI.
    ///
    /// Identifiers must be absolute, fragmentless URIs. References are
    /// resolved against the identifier of the root schema that contains
    /// them; a relative reference inside a root that has no identifier is
    /// unresolvable, and lands here too.
    #[fail(display = "failed to parse uri: {}", uri)]
    BadUri { uri: String },

    /// A `type` keyword had a value outside the recognised set.
    ///
    /// The only primitive types in this dialect are `null`, `boolean`,
    /// `number`, and `string`.
    #[fail(display = "invalid type: {}", value)]
    BadType { value: String },

    /// `id` or `definitions` appeared below the root of a schema.
    ///
    /// Both keywords are root-only. Definitions entries, keyword payloads,
    /// and discriminator mappings are all sub-schemas, and may carry
    /// neither.
    #[fail(display = "invalid sub-schema")]
    BadSubSchema,

    /// Two kind-selecting keywords appeared on the same schema.
    ///
    /// Each schema takes exactly one form, chosen by the keywords present.
    /// `properties` and `optionalProperties` are the one pair allowed to
    /// coexist; every other combination is rejected.
    #[fail(display = "invalid keyword combination")]
    BadSchemaKind,

    /// One or more references could not be resolved against the registry.
    ///
    /// Carries every URI that failed to resolve: the fragmentless URI when
    /// the referred-to root is absent altogether, or the full
    /// fragment-bearing URI when the root exists but lacks the named
    /// definition.
    #[fail(display = "missing schemas: {:?}", uris)]
    MissingSchemas { uris: Vec<String> },

    /// A URI was given, but no root schema with that URI is registered.
    #[fail(display = "no schema with the given uri")]
    NoSuchSchema,

    /// The maximum reference depth was reached during validation.
    ///
    /// This likely means the configured `max_depth` is too small, or that
    /// the schemas are circularly defined.
    #[fail(display = "max recursion depth reached during validation")]
    MaxDepth,
}
