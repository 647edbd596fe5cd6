#![deny(missing_docs)]

//! # strapi-gen core
//!
//! Generates a REST client for a Strapi project from its local database and
//! content-type schemas.

/// Shared error types.
pub mod error;

/// Project `.env` reading.
pub mod env;

/// Access key minting and hashing.
pub mod token;

/// Strapi SQLite access.
pub mod store;

/// Action UIDs and per content type grants.
pub mod permissions;

/// `schema.json` loading.
pub mod schema;

/// Attribute type mapping.
pub mod type_mapping;

/// Output languages.
pub mod targets;

/// Client rendering.
pub mod codegen;

/// End to end runs.
pub mod pipeline;

pub use codegen::{generate_client, render_client, ClientOptions, RenderedClient, TokenBinding};
pub use error::{AppError, AppResult};
pub use permissions::{Action, ContentTypeUid, PermissionSet};
pub use pipeline::{
    inspect, mint, run_generate, GenerateReport, GenerateRequest, Inspection, Project,
    TokenSource, DEFAULT_TOKEN_ENV,
};
pub use schema::{ContentType, ContentTypeKind, ContentTypeSchema};
pub use store::{ApiToken, StrapiStore, TokenKind};
pub use targets::{ClientLanguage, ClientTarget, JavaScriptTarget, TypeScriptTarget};
