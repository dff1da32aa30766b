use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::Listable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

impl Listable for User {
    const SEARCHABLE_FIELDS: &'static [&'static str] = &["name", "email"];
    const SORTABLE_FIELDS: &'static [&'static str] = &["name", "email"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 32))]
    pub password: String,
    #[validate(must_match(other = "password"))]
    pub password_confirm: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub password_old: String,
    #[validate(length(min = 6, max = 32))]
    pub password_new: String,
    #[validate(must_match(other = "password_new"))]
    pub password_confirm: String,
}
