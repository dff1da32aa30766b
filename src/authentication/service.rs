use log::{debug, info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{hash_password, verify_password, JwtManager};
use crate::error::ApiError;
use crate::user::UserRepository;

const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginSuccess {
    pub email: String,
    pub name: String,
    pub user_id: String,
    pub token: String,
}

/// 账号密码校验，成功时签发 token
pub struct AuthenticationService {
    users: Arc<dyn UserRepository>,
    jwt: Arc<JwtManager>,
    dummy_hash: String,
}

impl AuthenticationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt: Arc<JwtManager>,
        bcrypt_cost: u32,
    ) -> Result<Self, ApiError> {
        let dummy_hash = hash_password(DUMMY_PASSWORD, bcrypt_cost)?;
        Ok(Self {
            users,
            jwt,
            dummy_hash,
        })
    }

    /// 账号不存在或密码错误时返回 `Ok(None)`
    pub async fn check_login_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginSuccess>, ApiError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                // 账号不存在时同样做一次 bcrypt 校验，耗时与密码错误一致
                verify_password(password, &self.dummy_hash)?;
                debug!("登录邮箱不存在: {}", email);
                return Ok(None);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("用户 {} 密码错误", user.id);
            return Ok(None);
        }

        let token = self.jwt.generate_token(&user.id, &user.email, &user.name)?;
        info!("用户 {} 校验通过", user.id);
        Ok(Some(LoginSuccess {
            email: user.email,
            name: user.name,
            user_id: user.id,
            token,
        }))
    }
}
