#![deny(missing_docs)]

//! # Strapi Store
//!
//! Read/write access to the API token tables of a Strapi project's local
//! SQLite database (`.tmp/data.db` by default).

pub mod schema;

use crate::error::{AppError, AppResult};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use self::schema::{
    strapi_api_token_permissions as permissions, strapi_api_token_permissions_token_lnk as links,
    strapi_api_tokens as tokens,
};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// The access level of an API token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `find` and `findOne` on every content type.
    ReadOnly,
    /// Every action on every content type.
    FullAccess,
    /// Exactly the actions listed in the permission table.
    Custom,
}

impl FromStr for TokenKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-only" => Ok(TokenKind::ReadOnly),
            "full-access" => Ok(TokenKind::FullAccess),
            "custom" => Ok(TokenKind::Custom),
            other => Err(AppError::Database(format!(
                "Unknown API token type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::ReadOnly => write!(f, "read-only"),
            TokenKind::FullAccess => write!(f, "full-access"),
            TokenKind::Custom => write!(f, "custom"),
        }
    }
}

/// A row of `strapi_api_tokens`, minus the secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    /// Primary key.
    pub id: i32,
    /// Token name as shown in the admin panel.
    pub name: String,
    /// Access level.
    pub kind: TokenKind,
}

/// Connection wrapper exposing the handful of queries the generator needs.
pub struct StrapiStore {
    conn: SqliteConnection,
}

impl StrapiStore {
    /// Opens an existing database file. A missing file is an error rather than
    /// an empty database.
    pub fn open(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            return Err(AppError::Database(format!(
                "Database file not found: {:?}",
                path
            )));
        }
        let url = path
            .to_str()
            .ok_or_else(|| AppError::Database(format!("Non UTF-8 database path: {:?}", path)))?;
        let conn = SqliteConnection::establish(url)?;
        Ok(Self { conn })
    }

    /// Looks up a token by name.
    pub fn find_token(&mut self, name: &str) -> AppResult<ApiToken> {
        let row: Option<(i32, Option<String>)> = tokens::table
            .filter(tokens::name.eq(name))
            .select((tokens::id, tokens::kind))
            .first(&mut self.conn)
            .optional()?;

        let (id, kind) = row.ok_or_else(|| {
            AppError::Database(format!("No API token named '{}' in strapi_api_tokens", name))
        })?;
        let kind = kind
            .ok_or_else(|| AppError::Database(format!("API token '{}' has no type", name)))?
            .parse::<TokenKind>()?;

        Ok(ApiToken {
            id,
            name: name.to_string(),
            kind,
        })
    }

    /// Returns the stored access key hash of a token.
    pub fn stored_access_key(&mut self, name: &str) -> AppResult<String> {
        let row: Option<Option<String>> = tokens::table
            .filter(tokens::name.eq(name))
            .select(tokens::access_key)
            .first(&mut self.conn)
            .optional()?;

        row.flatten()
            .ok_or_else(|| AppError::Database(format!("API token '{}' has no access key", name)))
    }

    /// Overwrites the access key hash of a token.
    pub fn rotate_access_key(&mut self, name: &str, hash: &str) -> AppResult<()> {
        let updated = diesel::update(tokens::table.filter(tokens::name.eq(name)))
            .set(tokens::access_key.eq(hash))
            .execute(&mut self.conn)?;

        if updated == 0 {
            return Err(AppError::Database(format!(
                "No API token named '{}' to update",
                name
            )));
        }
        tracing::debug!(token = name, rows = updated, "access key rotated");
        Ok(())
    }

    /// Returns the raw action UIDs granted to a token, in permission id order.
    pub fn permission_actions(&mut self, token_id: i32) -> AppResult<Vec<String>> {
        let ids: Vec<i32> = links::table
            .filter(links::api_token_id.eq(token_id))
            .select(links::api_token_permission_id)
            .load::<Option<i32>>(&mut self.conn)?
            .into_iter()
            .flatten()
            .collect();

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let actions = permissions::table
            .filter(permissions::id.eq_any(ids))
            .order(permissions::id.asc())
            .select(permissions::action)
            .load::<Option<String>>(&mut self.conn)?;

        Ok(actions.into_iter().flatten().collect())
    }
}
