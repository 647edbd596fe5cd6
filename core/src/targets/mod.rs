#![deny(missing_docs)]

//! # Client Targets
//!
//! Pluggable output languages for the generated client.
//!
//! - **typescript**: typed module with interfaces.
//! - **javascript**: plain ES module annotated with JSDoc.

pub mod javascript;
pub mod typescript;

pub use javascript::JavaScriptTarget;
pub use typescript::TypeScriptTarget;

use crate::codegen::{js_string, BodyShape, ClientOptions, Entity, Operation};
use crate::type_mapping::FieldKind;
use std::fmt;
use std::str::FromStr;

/// Language specific rendering used by [`crate::codegen::generate_client`].
pub trait ClientTarget {
    /// Extension of the emitted file, without the dot.
    fn file_extension(&self) -> &'static str;

    /// Banner, constants, shared types and the `request` helper.
    fn prelude(&self, options: &ClientOptions) -> String;

    /// Declarations for one content type's entry and input types.
    fn entity(&self, entity: &Entity) -> String;

    /// Doc comment and signature of a function, up to and including the opening brace.
    fn function_open(&self, op: &Operation) -> String;
}

/// The supported output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClientLanguage {
    /// `.ts`
    #[default]
    TypeScript,
    /// `.js`
    JavaScript,
}

impl ClientLanguage {
    /// Returns the renderer for this language.
    pub fn target(self) -> &'static dyn ClientTarget {
        match self {
            ClientLanguage::TypeScript => &TypeScriptTarget,
            ClientLanguage::JavaScript => &JavaScriptTarget,
        }
    }
}

impl FromStr for ClientLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ts" | "typescript" => Ok(ClientLanguage::TypeScript),
            "js" | "javascript" => Ok(ClientLanguage::JavaScript),
            other => Err(format!("unknown client language '{}' (expected ts or js)", other)),
        }
    }
}

impl fmt::Display for ClientLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientLanguage::TypeScript => write!(f, "ts"),
            ClientLanguage::JavaScript => write!(f, "js"),
        }
    }
}

/// TypeScript type expression for a field. JSDoc accepts the same syntax.
pub fn type_expr(kind: &FieldKind) -> String {
    match kind {
        FieldKind::String | FieldKind::DateTime => "string".to_string(),
        FieldKind::Enumeration(values) if values.is_empty() => "string".to_string(),
        FieldKind::Enumeration(values) => values
            .iter()
            .map(|v| js_string(v))
            .collect::<Vec<_>>()
            .join(" | "),
        FieldKind::Integer | FieldKind::Number => "number".to_string(),
        FieldKind::Boolean => "boolean".to_string(),
    }
}

/// Type of the `data` argument.
pub(crate) fn data_type(op: &Operation) -> Option<String> {
    op.body.map(|shape| match shape {
        BodyShape::Full => op.input.clone(),
        BodyShape::Partial => format!("Partial<{}>", op.input),
    })
}

/// Resolved type of the returned promise.
pub(crate) fn response_type(op: &Operation) -> String {
    let data = if op.returns_list {
        format!("{}[]", op.entity)
    } else {
        op.entity.clone()
    };
    if op.method == "DELETE" {
        format!("StrapiResponse<{}> | undefined", data)
    } else {
        format!("StrapiResponse<{}>", data)
    }
}

/// One-line description put above each function.
pub(crate) fn endpoint_comment(op: &Operation) -> String {
    if op.by_id {
        format!("{} {}/:id", op.method, op.path)
    } else {
        format!("{} {}", op.method, op.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_type_expr() {
        assert_eq!(type_expr(&FieldKind::DateTime), "string");
        assert_eq!(type_expr(&FieldKind::Number), "number");
        assert_eq!(
            type_expr(&FieldKind::Enumeration(vec!["a".into(), "it's".into()])),
            "\"a\" | \"it's\""
        );
        assert_eq!(type_expr(&FieldKind::Enumeration(vec![])), "string");
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("TS".parse::<ClientLanguage>().unwrap(), ClientLanguage::TypeScript);
        assert_eq!(
            "javascript".parse::<ClientLanguage>().unwrap(),
            ClientLanguage::JavaScript
        );
        assert!("python".parse::<ClientLanguage>().is_err());
        assert_eq!(ClientLanguage::JavaScript.target().file_extension(), "js");
    }
}
