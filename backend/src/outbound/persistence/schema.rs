//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` carries a unique constraint.
    accounts (id) {
        id -> Int8,
        email -> Varchar,
        name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        is_active -> Bool,
        is_staff -> Bool,
        is_superuser -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One bearer token per account, stored as a SHA-256 hex digest.
    auth_tokens (account_id) {
        account_id -> Int8,
        digest -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        owner_id -> Int8,
        title -> Varchar,
        time_minutes -> Int4,
        /// NUMERIC(5, 2).
        price -> Numeric,
        link -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Owner-scoped labels; `(owner_id, name)` is unique.
    tags (id) {
        id -> Int8,
        owner_id -> Int8,
        name -> Varchar,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::joinable!(auth_tokens -> accounts (account_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));

diesel::allow_tables_to_appear_in_same_query!(accounts, auth_tokens, recipes, recipe_tags, tags);
