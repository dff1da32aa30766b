use log::{info, warn};
use std::sync::Arc;

use super::model::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest, User};
use super::repository::UserRepository;
use crate::auth::{hash_password, verify_password};
use crate::error::ApiError;

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self {
            repository,
            bcrypt_cost,
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.repository.find_all().await
    }

    pub async fn get(&self, id: &str) -> Result<Option<User>, ApiError> {
        self.repository.find_by_id(id).await
    }

    /// 注册新用户，邮箱已存在时返回 `EmailTaken`
    pub async fn create(&self, request: &CreateUserRequest) -> Result<User, ApiError> {
        if self.repository.find_by_email(&request.email).await?.is_some() {
            warn!("注册失败，邮箱已存在: {}", request.email);
            return Err(ApiError::EmailTaken(request.email.clone()));
        }

        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let user = self
            .repository
            .create(&request.name, &request.email, &password_hash)
            .await?;
        info!("注册用户成功: {} ({})", user.email, user.id);
        Ok(user)
    }

    pub async fn update(&self, id: &str, request: &UpdateUserRequest) -> Result<bool, ApiError> {
        if self.repository.find_by_id(id).await?.is_none() {
            warn!("更新用户失败，用户不存在: {}", id);
            return Ok(false);
        }

        if let Some(other) = self.repository.find_by_email(&request.email).await? {
            if other.id != id {
                warn!("更新用户失败，邮箱 {} 已被 {} 使用", request.email, other.id);
                return Err(ApiError::EmailTaken(request.email.clone()));
            }
        }

        self.repository
            .update(id, &request.name, &request.email)
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<bool, ApiError> {
        if self.repository.find_by_id(id).await?.is_none() {
            warn!("删除用户失败，用户不存在: {}", id);
            return Ok(false);
        }

        let deleted = self.repository.delete(id).await?;
        if deleted {
            info!("删除用户成功: {}", id);
        }
        Ok(deleted)
    }

    /// 用户不存在时返回 false，旧密码错误时返回 `InvalidCredentials`
    pub async fn change_password(
        &self,
        id: &str,
        request: &ChangePasswordRequest,
    ) -> Result<bool, ApiError> {
        let user = match self.repository.find_by_id(id).await? {
            Some(user) => user,
            None => {
                warn!("修改密码失败，用户不存在: {}", id);
                return Ok(false);
            }
        };

        if !verify_password(&request.password_old, &user.password_hash)? {
            return Err(ApiError::InvalidCredentials("旧密码不正确".to_string()));
        }

        let password_hash = hash_password(&request.password_new, self.bcrypt_cost)?;
        let updated = self.repository.update_password(id, &password_hash).await?;
        if updated {
            info!("用户 {} 修改密码成功", id);
        }
        Ok(updated)
    }
}
