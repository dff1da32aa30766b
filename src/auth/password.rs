use bcrypt::{hash, verify};
use log::{debug, error, warn};

use crate::error::ApiError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, ApiError> {
    debug!("加密密码");
    hash(password.as_bytes(), cost).map_err(|e| {
        error!("密码加密失败: {}", e);
        ApiError::from(e)
    })
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ApiError> {
    debug!("验证密码");
    match verify(password, hash) {
        Ok(result) => {
            if !result {
                warn!("密码验证失败");
            }
            Ok(result)
        }
        Err(e) => {
            error!("密码验证过程出错: {}", e);
            Err(ApiError::from(e))
        }
    }
}
