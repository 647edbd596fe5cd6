#![allow(missing_docs)]

//! Strapi's API token tables (v4.15+ and v5 naming).

diesel::table! {
    /// One row per API token created in the admin panel.
    strapi_api_tokens (id) {
        /// Primary Key.
        id -> Integer,
        /// Display name, unique per project.
        name -> Nullable<Text>,
        /// `read-only`, `full-access` or `custom`.
        #[sql_name = "type"]
        kind -> Nullable<Text>,
        /// `hex(HMAC-SHA512(salt, key))`.
        access_key -> Nullable<Text>,
    }
}

diesel::table! {
    /// Individual grants of a `custom` token, e.g. `api::article.article.find`.
    strapi_api_token_permissions (id) {
        /// Primary Key.
        id -> Integer,
        /// Action UID.
        action -> Nullable<Text>,
    }
}

diesel::table! {
    /// Link table between tokens and permissions.
    strapi_api_token_permissions_token_lnk (id) {
        /// Primary Key.
        id -> Integer,
        /// Permission side of the link.
        api_token_permission_id -> Nullable<Integer>,
        /// Token side of the link.
        api_token_id -> Nullable<Integer>,
    }
}
