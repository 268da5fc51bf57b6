//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use diesel::prelude::*;
use rust_decimal::Decimal;

use super::schema::{accounts, auth_tokens, recipe_tags, recipes, tags};

/// Row struct for reading from the accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = accounts)]
pub(crate) struct NewAccountRow<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

/// Changeset for the mutable profile columns.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = accounts)]
pub(crate) struct AccountUpdate<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = auth_tokens)]
pub(crate) struct NewTokenRow<'a> {
    pub account_id: i64,
    pub digest: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: i64,
    pub owner_id: i64,
    pub title: String,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: String,
    pub description: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub owner_id: i64,
    pub title: &'a str,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: &'a str,
    pub description: &'a str,
}

/// Changeset replacing every editable recipe column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub title: &'a str,
    pub time_minutes: i32,
    pub price: Decimal,
    pub link: &'a str,
    pub description: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TagRow {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tags)]
pub(crate) struct NewTagRow<'a> {
    pub owner_id: i64,
    pub name: &'a str,
}

#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = recipe_tags)]
pub(crate) struct RecipeTagRow {
    pub recipe_id: i64,
    pub tag_id: i64,
}
