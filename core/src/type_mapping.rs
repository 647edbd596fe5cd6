#![deny(missing_docs)]

//! # Type Mapping
//!
//! Maps Strapi attribute types onto the small set of field kinds the client
//! generator understands. Relations, media, components, dynamic zones, `json`
//! and `blocks` have no flat representation in a request body and are left out.

use crate::schema::{Attribute, ContentTypeSchema};

/// Scalar kinds a generated entity field can have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Any text-like attribute.
    String,
    /// One of a closed list of strings.
    Enumeration(Vec<String>),
    /// Whole numbers.
    Integer,
    /// Decimals and floats.
    Number,
    /// `true` / `false`.
    Boolean,
    /// ISO-8601 strings (date, time, datetime, timestamp).
    DateTime,
}

/// A field that will be emitted in entity declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Attribute name as used in JSON.
    pub name: String,
    /// Mapped kind.
    pub kind: FieldKind,
    /// Required on create.
    pub required: bool,
}

/// Maps one attribute, returning `None` for unsupported types.
pub fn map_attribute(attr: &Attribute) -> Option<FieldKind> {
    let kind = match attr.kind.as_str() {
        "string" | "text" | "richtext" | "email" | "password" | "uid" => FieldKind::String,
        "enumeration" => FieldKind::Enumeration(attr.values.clone()),
        "integer" | "biginteger" => FieldKind::Integer,
        "decimal" | "float" => FieldKind::Number,
        "boolean" => FieldKind::Boolean,
        "date" | "datetime" | "time" | "timestamp" => FieldKind::DateTime,
        _ => return None,
    };
    Some(kind)
}

/// Collects the writable scalar fields of a schema, in declaration order.
///
/// Private and unsupported attributes are skipped.
pub fn body_fields(schema: &ContentTypeSchema) -> Vec<Field> {
    let mut fields = Vec::new();
    for (name, attr) in &schema.attributes {
        if attr.private {
            tracing::debug!(field = %name, "skipping private attribute");
            continue;
        }
        match map_attribute(attr) {
            Some(kind) => fields.push(Field {
                name: name.clone(),
                kind,
                required: attr.required,
            }),
            None => {
                tracing::debug!(field = %name, kind = %attr.kind, "skipping unsupported attribute type");
            }
        }
    }
    fields
}
