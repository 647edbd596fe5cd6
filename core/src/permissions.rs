#![deny(missing_docs)]

//! # Permissions
//!
//! Turns the action UIDs stored for a token (`api::article.article.find`) into
//! a per content type set of REST actions.

use crate::error::{AppError, AppResult};
use crate::store::TokenKind;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// The REST actions Strapi exposes for a content type.
///
/// Declaration order is the order functions are emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// List entries.
    Find,
    /// Fetch one entry by id.
    FindOne,
    /// Create an entry.
    Create,
    /// Update an entry.
    Update,
    /// Delete an entry.
    Delete,
}

impl Action {
    /// Every action, in emission order.
    pub const ALL: [Action; 5] = [
        Action::Find,
        Action::FindOne,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    /// The actions a `read-only` token is allowed.
    pub const READ: [Action; 2] = [Action::Find, Action::FindOne];

    /// Name used by Strapi in action UIDs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Find => "find",
            Action::FindOne => "findOne",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| AppError::General(format!("Unknown content-type action '{}'", s)))
    }
}

/// Identifies a content type of the `api::` scope, e.g. `api::blog.article`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentTypeUid {
    /// API folder under `src/api/`.
    pub api: String,
    /// Content type folder under `src/api/{api}/content-types/`.
    pub content_type: String,
}

impl ContentTypeUid {
    /// Creates a UID from its two parts.
    pub fn new(api: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            api: api.into(),
            content_type: content_type.into(),
        }
    }
}

impl fmt::Display for ContentTypeUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api::{}.{}", self.api, self.content_type)
    }
}

/// Outcome of parsing one stored action UID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAction {
    /// A REST action on an `api::` content type.
    Rest(ContentTypeUid, Action),
    /// A custom controller action on an `api::` content type.
    Custom(ContentTypeUid, String),
    /// Anything outside the `api::` scope (`plugin::`, `admin::`).
    OtherScope,
}

/// Parses an action UID of the form `api::{api}.{content_type}.{action}`.
pub fn parse_action_uid(uid: &str) -> AppResult<ParsedAction> {
    let Some(rest) = uid.strip_prefix("api::") else {
        return Ok(ParsedAction::OtherScope);
    };

    let mut parts = rest.split('.');
    let (Some(api), Some(content_type), Some(action), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AppError::General(format!("Malformed action UID '{}'", uid)));
    };
    if api.is_empty() || content_type.is_empty() || action.is_empty() {
        return Err(AppError::General(format!("Malformed action UID '{}'", uid)));
    }

    let ct = ContentTypeUid::new(api, content_type);
    Ok(match action.parse::<Action>() {
        Ok(action) => ParsedAction::Rest(ct, action),
        Err(_) => ParsedAction::Custom(ct, action.to_string()),
    })
}

/// Permitted actions grouped by content type, both ordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    grants: BTreeMap<ContentTypeUid, BTreeSet<Action>>,
}

impl PermissionSet {
    /// Builds the set from the raw action UIDs of a `custom` token.
    ///
    /// Non `api::` scopes and custom controller actions are skipped.
    pub fn from_action_uids<I, S>(uids: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for uid in uids {
            match parse_action_uid(uid.as_ref())? {
                ParsedAction::Rest(ct, action) => set.grant(ct, action),
                ParsedAction::Custom(ct, name) => {
                    tracing::warn!(content_type = %ct, action = %name, "skipping custom action");
                }
                ParsedAction::OtherScope => {
                    tracing::debug!(action = uid.as_ref(), "skipping non api:: action");
                }
            }
        }
        Ok(set)
    }

    /// Grants the actions implied by a `read-only` or `full-access` token on
    /// every given content type.
    ///
    /// Returns an empty set for `custom`, whose grants live in the database.
    pub fn for_token_kind(kind: TokenKind, content_types: &[ContentTypeUid]) -> Self {
        let actions: &[Action] = match kind {
            TokenKind::ReadOnly => &Action::READ,
            TokenKind::FullAccess => &Action::ALL,
            TokenKind::Custom => &[],
        };
        let mut set = Self::default();
        for ct in content_types {
            for action in actions {
                set.grant(ct.clone(), *action);
            }
        }
        set
    }

    /// Adds a single grant.
    pub fn grant(&mut self, content_type: ContentTypeUid, action: Action) {
        self.grants.entry(content_type).or_default().insert(action);
    }

    /// Iterates content types in UID order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContentTypeUid, &BTreeSet<Action>)> {
        self.grants.iter()
    }

    /// Returns true when nothing is granted.
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Number of content types with at least one grant.
    pub fn len(&self) -> usize {
        self.grants.len()
    }
}
