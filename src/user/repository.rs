use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::User;
use crate::error::ApiError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, ApiError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError>;

    /// 邮箱比较不区分大小写
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User, ApiError>;

    async fn update(&self, id: &str, name: &str, email: &str) -> Result<bool, ApiError>;

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool, ApiError>;

    async fn delete(&self, id: &str) -> Result<bool, ApiError>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("查询用户列表失败: {}", e)))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>("SELECT id, name, email, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("查询用户失败: {}", e)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash FROM users WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("按邮箱查询用户失败: {}", e)))
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(name)
        .bind(email.trim())
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("创建用户失败: {}", e)))
    }

    async fn update(&self, id: &str, name: &str, email: &str) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, email = $3, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(name)
        .bind(email.trim())
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("更新用户失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_password(&self, id: &str, password_hash: &str) -> Result<bool, ApiError> {
        let result = sqlx::query(
            "UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("更新密码失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("删除用户失败: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
