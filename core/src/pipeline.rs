#![deny(missing_docs)]

//! # Pipeline
//!
//! Ties the pieces together: token row -> key -> permissions -> schemas ->
//! rendered client -> output file.
//!
//! The client is rendered before anything is written, so a malformed schema
//! leaves both the database and the output untouched. The file is written
//! before the new hash is stored, so a failed write leaves the previous key
//! valid.

use crate::codegen::{render_client, ClientOptions, TokenBinding};
use crate::env::{api_token_salt, read_env_file};
use crate::error::{AppError, AppResult};
use crate::permissions::{Action, ContentTypeUid, PermissionSet};
use crate::schema::{discover_content_types, load_schema, ContentType};
use crate::store::{ApiToken, StrapiStore, TokenKind};
use crate::targets::ClientLanguage;
use crate::token::{verify_access_key, MintedToken};
use std::fs;
use std::path::{Path, PathBuf};

/// Default environment variable the generated client reads its token from.
pub const DEFAULT_TOKEN_ENV: &str = "STRAPI_API_TOKEN";

/// Where the access key used by the client comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TokenSource {
    /// Mint a new key and overwrite the stored hash.
    #[default]
    Rotate,
    /// Reuse a key the operator already holds; it must match the stored hash.
    Existing(String),
}

/// Locations of the Strapi project's files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Project root (contains `src/api`).
    pub root: PathBuf,
    /// SQLite database file.
    pub database: PathBuf,
    /// The `.env` holding `API_TOKEN_SALT`.
    pub env_file: PathBuf,
    /// Name of the API token in the admin panel.
    pub token_name: String,
    /// CMS origin used for endpoint URLs.
    pub origin: String,
}

impl Project {
    /// Uses Strapi's default layout: `.tmp/data.db` and `.env` under the root.
    pub fn with_defaults(root: impl Into<PathBuf>, token_name: &str, origin: &str) -> Self {
        let root = root.into();
        Self {
            database: root.join(".tmp").join("data.db"),
            env_file: root.join(".env"),
            root,
            token_name: token_name.to_string(),
            origin: origin.to_string(),
        }
    }
}

/// Everything `run_generate` needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Project files.
    pub project: Project,
    /// Output file.
    pub output: PathBuf,
    /// Output language.
    pub language: ClientLanguage,
    /// Key handling.
    pub token_source: TokenSource,
    /// Write the key into the client instead of reading it from the environment.
    pub embed_token: bool,
    /// Environment variable the client reads when the key is not embedded.
    pub token_env: String,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    /// The token row used.
    pub token: ApiToken,
    /// The plain access key the client must send.
    pub access_key: String,
    /// Whether the stored hash was replaced.
    pub rotated: bool,
    /// Actions that got a function, per content type in UID order. Content
    /// types whose grants produced no function are left out.
    pub content_types: Vec<(ContentTypeUid, Vec<Action>)>,
    /// The file written.
    pub output: PathBuf,
}

/// Result of [`inspect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    /// The token row.
    pub token: ApiToken,
    /// Resolved content types, in UID order.
    pub content_types: Vec<ContentType>,
}

/// Resolves the permission set of a token.
pub fn resolve_permissions(
    store: &mut StrapiStore,
    token: &ApiToken,
    project_root: &Path,
) -> AppResult<PermissionSet> {
    match token.kind {
        TokenKind::Custom => {
            let uids = store.permission_actions(token.id)?;
            tracing::debug!(count = uids.len(), "permission rows loaded");
            PermissionSet::from_action_uids(uids)
        }
        kind => {
            let all = discover_content_types(project_root)?;
            tracing::debug!(%kind, count = all.len(), "granting by token type");
            Ok(PermissionSet::for_token_kind(kind, &all))
        }
    }
}

/// Loads the schema of every content type in the set.
pub fn load_content_types(
    permissions: &PermissionSet,
    project_root: &Path,
    origin: &str,
) -> AppResult<Vec<ContentType>> {
    permissions
        .iter()
        .map(|(uid, actions)| {
            let schema = load_schema(project_root, uid)?;
            Ok(ContentType::new(uid.clone(), schema, actions.clone(), origin))
        })
        .collect()
}

/// Reads the token and its content types without writing anything.
pub fn inspect(project: &Project) -> AppResult<Inspection> {
    let mut store = StrapiStore::open(&project.database)?;
    let token = store.find_token(&project.token_name)?;
    let permissions = resolve_permissions(&mut store, &token, &project.root)?;
    let content_types = load_content_types(&permissions, &project.root, &project.origin)?;
    Ok(Inspection {
        token,
        content_types,
    })
}

/// Mints a new key for the token and stores its hash. Returns the plain key.
pub fn mint(project: &Project) -> AppResult<(ApiToken, String)> {
    let env = read_env_file(&project.env_file)?;
    let salt = api_token_salt(&env, &project.env_file)?;

    let mut store = StrapiStore::open(&project.database)?;
    let token = store.find_token(&project.token_name)?;
    let minted = MintedToken::mint(salt)?;
    store.rotate_access_key(&token.name, &minted.hash)?;
    tracing::info!(token = %token.name, id = token.id, "access key rotated");
    Ok((token, minted.access_key))
}

/// Runs the full generation pipeline.
pub fn run_generate(request: &GenerateRequest) -> AppResult<GenerateReport> {
    let project = &request.project;
    let env = read_env_file(&project.env_file)?;
    let salt = api_token_salt(&env, &project.env_file)?;

    let mut store = StrapiStore::open(&project.database)?;
    let token = store.find_token(&project.token_name)?;
    tracing::info!(token = %token.name, id = token.id, kind = %token.kind, "token found");

    // Settle the key first; an existing key is checked before any output exists.
    let (access_key, pending_hash) = match &request.token_source {
        TokenSource::Rotate => {
            let minted = MintedToken::mint(salt)?;
            (minted.access_key, Some(minted.hash))
        }
        TokenSource::Existing(key) => {
            let stored = store.stored_access_key(&token.name)?;
            if !verify_access_key(salt, key, &stored)? {
                return Err(AppError::General(format!(
                    "The supplied access key does not match the one stored for '{}'",
                    token.name
                )));
            }
            (key.clone(), None)
        }
    };

    let permissions = resolve_permissions(&mut store, &token, &project.root)?;
    if permissions.is_empty() {
        tracing::warn!(token = %token.name, "token grants no content-type actions");
    }
    let content_types = load_content_types(&permissions, &project.root, &project.origin)?;

    let options = ClientOptions {
        base_url: project.origin.trim_end_matches('/').to_string(),
        token: if request.embed_token {
            TokenBinding::Embedded(access_key.clone())
        } else {
            TokenBinding::Environment(request.token_env.clone())
        },
    };
    let rendered = render_client(&content_types, &options, request.language.target())?;

    if let Some(parent) = request.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::General(format!("Failed to create output dir: {}", e)))?;
        }
    }
    fs::write(&request.output, &rendered.code)
        .map_err(|e| AppError::General(format!("Failed to write {:?}: {}", request.output, e)))?;
    tracing::info!(output = ?request.output, content_types = rendered.emitted.len(), "client written");

    let rotated = match pending_hash {
        Some(hash) => {
            if let Err(e) = store.rotate_access_key(&token.name, &hash) {
                // The client was written for a key the database never accepted.
                if let Err(remove) = fs::remove_file(&request.output) {
                    tracing::warn!(output = ?request.output, error = %remove, "could not remove stale client");
                }
                return Err(e);
            }
            true
        }
        None => false,
    };

    Ok(GenerateReport {
        token,
        access_key,
        rotated,
        content_types: rendered.emitted,
        output: request.output.clone(),
    })
}
