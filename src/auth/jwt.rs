use crate::auth::types::Claims;
use crate::error::ApiError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, error, info};

pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        debug!("验证 JWT token");
        decode::<Claims>(token, &self.decoding_key, &Validation::default()).map(|data| data.claims)
    }

    pub fn generate_token(&self, user_id: &str, email: &str, name: &str) -> Result<String, ApiError> {
        debug!("为用户 {} 生成 JWT token", user_id);
        let exp = (Utc::now() + self.ttl).timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
            email: email.to_string(),
            name: name.to_string(),
        };

        match encode(&Header::default(), &claims, &self.encoding_key) {
            Ok(token) => {
                info!("成功为用户 {} 生成 token", user_id);
                Ok(token)
            }
            Err(e) => {
                error!("为用户 {} 生成 token 失败: {}", user_id, e);
                Err(ApiError::Internal(format!("生成 token 失败: {}", e)))
            }
        }
    }
}
