use crate::error::ApiError;
use log::{error, info};
use sqlx::PgPool;

pub struct DbInitializer {
    pool: PgPool,
}

impl DbInitializer {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 初始化用户表
    pub async fn init_user_tables(&self) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id VARCHAR PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                email VARCHAR NOT NULL UNIQUE,
                password_hash VARCHAR NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("创建用户表失败: {}", e)))?;

        // 登录按邮箱查询，忽略大小写
        sqlx::query("CREATE UNIQUE INDEX IF NOT EXISTS idx_users_email_lower ON users (LOWER(email))")
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("创建邮箱索引失败: {}", e)))?;

        Ok(())
    }

    /// 初始化商品表
    pub async fn init_product_tables(&self) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id VARCHAR PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                description VARCHAR(500) NOT NULL DEFAULT '',
                price BIGINT NOT NULL CHECK (price >= 0),
                stock BIGINT NOT NULL CHECK (stock >= 0),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("创建商品表失败: {}", e)))?;

        Ok(())
    }

    /// 初始化订单表
    pub async fn init_purchase_tables(&self) -> Result<(), ApiError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS purchases (
                id VARCHAR PRIMARY KEY,
                name VARCHAR(100) NOT NULL,
                quantity BIGINT NOT NULL CHECK (quantity >= 1),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("创建订单表失败: {}", e)))?;

        Ok(())
    }
}

/// 初始化所有数据库表
pub async fn initialize_db(pool: PgPool) -> Result<(), ApiError> {
    info!("开始初始化数据库...");
    let initializer = DbInitializer::new(pool);

    initializer.init_user_tables().await.map_err(|e| {
        error!("用户表初始化失败: {:?}", e);
        e
    })?;

    initializer.init_product_tables().await.map_err(|e| {
        error!("商品表初始化失败: {:?}", e);
        e
    })?;

    initializer.init_purchase_tables().await.map_err(|e| {
        error!("订单表初始化失败: {:?}", e);
        e
    })?;

    info!("数据库初始化完成");
    Ok(())
}
