use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Product, ProductInput};
use crate::error::ApiError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 全部商品
    async fn find_all(&self) -> Result<Vec<Product>, ApiError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ApiError>;

    async fn create(&self, input: &ProductInput) -> Result<Product, ApiError>;

    /// 返回是否有记录被更新
    async fn update(&self, id: &str, input: &ProductInput) -> Result<bool, ApiError>;

    /// 返回是否有记录被删除
    async fn delete(&self, id: &str) -> Result<bool, ApiError>;
}

pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> Result<Vec<Product>, ApiError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, stock FROM products ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("查询商品列表失败: {}", e)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Product>, ApiError> {
        sqlx::query_as::<_, Product>(
            "SELECT id, name, description, price, stock FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("查询商品失败: {}", e)))
    }

    async fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, description, price, stock)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, price, stock
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("创建商品失败: {}", e)))
    }

    async fn update(&self, id: &str, input: &ProductInput) -> Result<bool, ApiError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, price = $4, stock = $5, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("更新商品失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("删除商品失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
