use log::{debug, info, warn};
use std::sync::Arc;

use super::model::{Product, ProductInput};
use super::repository::ProductRepository;
use crate::error::ApiError;

pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
}

impl ProductService {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Product>, ApiError> {
        let products = self.repository.find_all().await?;
        debug!("读取到 {} 个商品", products.len());
        Ok(products)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Product>, ApiError> {
        self.repository.find_by_id(id).await
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let product = self.repository.create(input).await?;
        info!("创建商品成功: {} ({})", product.name, product.id);
        Ok(product)
    }

    /// 商品不存在时返回 false
    pub async fn update(&self, id: &str, input: &ProductInput) -> Result<bool, ApiError> {
        if self.repository.find_by_id(id).await?.is_none() {
            warn!("更新商品失败，商品不存在: {}", id);
            return Ok(false);
        }

        let updated = self.repository.update(id, input).await?;
        if updated {
            info!("更新商品成功: {}", id);
        }
        Ok(updated)
    }

    /// 商品不存在时返回 false
    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        if self.repository.find_by_id(id).await?.is_none() {
            warn!("删除商品失败，商品不存在: {}", id);
            return Ok(false);
        }

        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!("删除商品成功: {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::repository::MockProductRepository;

    fn sample() -> Product {
        Product {
            id: "p-1".to_string(),
            name: "Kopi".to_string(),
            description: "Arabica".to_string(),
            price: 25000,
            stock: 10,
        }
    }

    fn input() -> ProductInput {
        ProductInput {
            name: "Kopi Susu".to_string(),
            description: String::new(),
            price: 30000,
            stock: 5,
        }
    }

    #[tokio::test]
    async fn test_update_missing_product_skips_write() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository.expect_update().never();

        let service = ProductService::new(Arc::new(repository));
        assert!(!service.update("nope", &input()).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_existing_product() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_by_id()
            .withf(|id: &str| id == "p-1")
            .returning(|_| Ok(Some(sample())));
        repository
            .expect_update()
            .withf(|id: &str, input: &ProductInput| id == "p-1" && input.name == "Kopi Susu")
            .times(1)
            .returning(|_, _| Ok(true));

        let service = ProductService::new(Arc::new(repository));
        assert!(service.update("p-1", &input()).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_product() {
        let mut repository = MockProductRepository::new();
        repository.expect_find_by_id().returning(|_| Ok(None));
        repository.expect_delete().never();

        let service = ProductService::new(Arc::new(repository));
        assert!(!service.delete("nope").await.unwrap());
    }

    #[tokio::test]
    async fn test_repository_errors_propagate() {
        let mut repository = MockProductRepository::new();
        repository
            .expect_find_all()
            .returning(|| Err(ApiError::Database("connection reset".to_string())));

        let service = ProductService::new(Arc::new(repository));
        assert!(matches!(service.list().await, Err(ApiError::Database(_))));
    }
}
