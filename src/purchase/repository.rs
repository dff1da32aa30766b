use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Purchase, PurchaseInput};
use crate::error::ApiError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Purchase>, ApiError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Purchase>, ApiError>;

    async fn create(&self, input: &PurchaseInput) -> Result<Purchase, ApiError>;

    async fn update(&self, id: &str, input: &PurchaseInput) -> Result<bool, ApiError>;

    async fn delete(&self, id: &str) -> Result<bool, ApiError>;
}

pub struct PgPurchaseRepository {
    pool: PgPool,
}

impl PgPurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PurchaseRepository for PgPurchaseRepository {
    async fn find_all(&self) -> Result<Vec<Purchase>, ApiError> {
        sqlx::query_as::<_, Purchase>("SELECT id, name, quantity FROM purchases ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("查询订单列表失败: {}", e)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Purchase>, ApiError> {
        sqlx::query_as::<_, Purchase>("SELECT id, name, quantity FROM purchases WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("查询订单失败: {}", e)))
    }

    async fn create(&self, input: &PurchaseInput) -> Result<Purchase, ApiError> {
        sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (id, name, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, name, quantity
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&input.name)
        .bind(input.quantity)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("创建订单失败: {}", e)))
    }

    async fn update(&self, id: &str, input: &PurchaseInput) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE purchases SET name = $2, quantity = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(input.quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("更新订单失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("删除订单失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
