use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::listing::Listable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub stock: i64,
}

impl Listable for Product {
    const SEARCHABLE_FIELDS: &'static [&'static str] = &["name"];
    const SORTABLE_FIELDS: &'static [&'static str] = &["name"];

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            _ => None,
        }
    }
}

/// 创建和更新商品共用的请求体
#[derive(Debug, Clone, PartialEq, Deserialize, Validate)]
pub struct ProductInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
    #[validate(range(min = 0))]
    pub price: i64,
    #[validate(range(min = 0))]
    pub stock: i64,
}
