#![deny(missing_docs)]

//! # Project Environment
//!
//! Reads the Strapi project's `.env` file. The variables are returned as a map
//! and never exported into the current process environment.

use crate::error::{AppError, AppResult};
use indexmap::IndexMap;
use std::path::Path;

/// Name of the variable holding the salt Strapi uses to hash API tokens.
pub const API_TOKEN_SALT: &str = "API_TOKEN_SALT";

/// Parses a dotenv file into an ordered map.
pub fn read_env_file(path: &Path) -> AppResult<IndexMap<String, String>> {
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| AppError::Env(format!("Failed to open {:?}: {}", path, e)))?;

    let mut vars = IndexMap::new();
    for item in iter {
        let (key, value) =
            item.map_err(|e| AppError::Env(format!("Failed to parse {:?}: {}", path, e)))?;
        vars.insert(key, value);
    }
    Ok(vars)
}

/// Returns the `API_TOKEN_SALT` value from the parsed variables.
///
/// `source` is only used to build the error message.
pub fn api_token_salt<'a>(vars: &'a IndexMap<String, String>, source: &Path) -> AppResult<&'a str> {
    match vars.get(API_TOKEN_SALT) {
        Some(salt) if !salt.is_empty() => Ok(salt.as_str()),
        Some(_) => Err(AppError::Env(format!(
            "{} is empty in {:?}",
            API_TOKEN_SALT, source
        ))),
        None => Err(AppError::Env(format!(
            "{} not found in {:?}",
            API_TOKEN_SALT, source
        ))),
    }
}
