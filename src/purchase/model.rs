use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::Listable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Purchase {
    pub id: String,
    pub name: String,
    pub quantity: i64,
}

impl Listable for Purchase {
    const SEARCHABLE_FIELDS: &'static [&'static str] = &["name"];
    const SORTABLE_FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct PurchaseInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 1))]
    pub quantity: i64,
}
