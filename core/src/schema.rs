#![deny(missing_docs)]

//! # Content-Type Schemas
//!
//! Loads the `schema.json` files Strapi keeps under
//! `src/api/{api}/content-types/{content_type}/`.

use crate::error::{AppError, AppResult};
use crate::permissions::{Action, ContentTypeUid};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collection or single type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentTypeKind {
    /// Many entries, addressed by id under the plural name.
    CollectionType,
    /// Exactly one entry, addressed by the singular name.
    SingleType,
}

/// The `info` block of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaInfo {
    /// e.g. `article`.
    pub singular_name: String,
    /// e.g. `articles`.
    pub plural_name: String,
    /// Admin panel label.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Free text description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry of the `attributes` block. Keys the generator does not use are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Attribute {
    /// Strapi attribute type (`string`, `integer`, `relation`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Whether the field must be present on create.
    #[serde(default)]
    pub required: bool,
    /// Allowed values of an `enumeration`.
    #[serde(default, rename = "enum")]
    pub values: Vec<String>,
    /// Private fields are never exposed by the REST API.
    #[serde(default)]
    pub private: bool,
    /// Default value, if any.
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

/// A parsed `schema.json`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeSchema {
    /// Collection or single type.
    pub kind: ContentTypeKind,
    /// Database table name.
    #[serde(default)]
    pub collection_name: Option<String>,
    /// Naming information.
    pub info: SchemaInfo,
    /// Fields in declaration order.
    #[serde(default)]
    pub attributes: IndexMap<String, Attribute>,
}

/// Location of the schema file for a content type.
pub fn schema_path(project_root: &Path, uid: &ContentTypeUid) -> PathBuf {
    project_root
        .join("src")
        .join("api")
        .join(&uid.api)
        .join("content-types")
        .join(&uid.content_type)
        .join("schema.json")
}

/// Parses a schema from JSON text.
pub fn parse_schema(json: &str) -> AppResult<ContentTypeSchema> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses the schema of one content type.
pub fn load_schema(project_root: &Path, uid: &ContentTypeUid) -> AppResult<ContentTypeSchema> {
    let path = schema_path(project_root, uid);
    let text = fs::read_to_string(&path)
        .map_err(|e| AppError::Schema(format!("Failed to read {:?}: {}", path, e)))?;
    serde_json::from_str(&text)
        .map_err(|e| AppError::Schema(format!("Malformed schema {:?}: {}", path, e)))
}

/// Lists every content type that has a `schema.json`, sorted by UID.
pub fn discover_content_types(project_root: &Path) -> AppResult<Vec<ContentTypeUid>> {
    let api_dir = project_root.join("src").join("api");
    if !api_dir.is_dir() {
        return Err(AppError::Schema(format!(
            "API directory not found: {:?}",
            api_dir
        )));
    }

    let mut uids = Vec::new();
    // {api}/content-types/{content_type}/schema.json
    for entry in WalkDir::new(&api_dir).min_depth(4).max_depth(4) {
        let entry = entry.map_err(|e| AppError::General(e.to_string()))?;
        let path = entry.path();
        if path.file_name() != Some(OsStr::new("schema.json")) {
            continue;
        }
        let Ok(rel) = path.strip_prefix(&api_dir) else {
            continue;
        };
        let parts: Vec<&str> = rel.iter().filter_map(|s| s.to_str()).collect();
        if let [api, "content-types", content_type, "schema.json"] = parts.as_slice() {
            uids.push(ContentTypeUid::new(*api, *content_type));
        }
    }
    uids.sort();
    Ok(uids)
}

/// A content type resolved against the schema on disk and the token's grants.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentType {
    /// `api::{api}.{content_type}`.
    pub uid: ContentTypeUid,
    /// The parsed `schema.json`.
    pub schema: ContentTypeSchema,
    /// Actions the token may perform.
    pub actions: BTreeSet<Action>,
    /// Absolute REST endpoint, e.g. `http://localhost:1337/api/articles`.
    pub url: String,
}

impl ContentType {
    /// Combines a schema with its grants. `origin` is the CMS base URL.
    pub fn new(
        uid: ContentTypeUid,
        schema: ContentTypeSchema,
        actions: BTreeSet<Action>,
        origin: &str,
    ) -> Self {
        let url = format!("{}{}", origin.trim_end_matches('/'), api_path(&schema));
        Self {
            uid,
            schema,
            actions,
            url,
        }
    }

    /// The endpoint path relative to the origin.
    pub fn path(&self) -> String {
        api_path(&self.schema)
    }
}

fn api_path(schema: &ContentTypeSchema) -> String {
    match schema.kind {
        ContentTypeKind::CollectionType => format!("/api/{}", schema.info.plural_name),
        ContentTypeKind::SingleType => format!("/api/{}", schema.info.singular_name),
    }
}
