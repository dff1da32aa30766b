use log::{info, warn};
use std::sync::Arc;

use super::model::{Purchase, PurchaseInput};
use super::repository::PurchaseRepository;
use crate::error::ApiError;

pub struct PurchaseService {
    repository: Arc<dyn PurchaseRepository>,
}

impl PurchaseService {
    pub fn new(repository: Arc<dyn PurchaseRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Purchase>, ApiError> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<Purchase>, ApiError> {
        self.repository.find_by_id(id).await
    }

    pub async fn create(&self, input: &PurchaseInput) -> Result<Purchase, ApiError> {
        let purchase = self.repository.create(input).await?;
        info!(
            "创建订单成功: {} x {} ({})",
            purchase.name, purchase.quantity, purchase.id
        );
        Ok(purchase)
    }

    pub async fn update(&self, id: &str, input: &PurchaseInput) -> Result<bool, ApiError> {
        if self.repository.find_by_id(id).await?.is_none() {
            warn!("订单不存在: {}", id);
            return Ok(false);
        }
        self.repository.update(id, input).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        if self.repository.find_by_id(id).await?.is_none() {
            warn!("订单不存在: {}", id);
            return Ok(false);
        }
        self.repository.delete(id).await
    }
}
