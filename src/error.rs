use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::error;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("未授权: {0}")]
    Unauthorized(String),

    #[error("参数校验失败: {0}")]
    Validation(String),

    #[error("{0}")]
    UnprocessableEntity(String),

    #[error("邮箱已被注册: {0}")]
    EmailTaken(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("服务器内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回给客户端的错误类型标识
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::RateLimited(_) => "RATE_LIMITED",
            ApiError::InvalidCredentials(_) => "INVALID_CREDENTIALS",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::EmailTaken(_) => "EMAIL_ALREADY_TAKEN",
            ApiError::Database(_) | ApiError::Internal(_) => "SERVER_ERROR",
        }
    }
}

// 错误响应结构体
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: &'static str,
    pub message: String,
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::RateLimited(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidCredentials(_) | ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::EmailTaken(_) => StatusCode::CONFLICT,
            ApiError::Database(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // 内部错误只写日志，不把细节返回给客户端
        let message = match self {
            ApiError::Database(_) | ApiError::Internal(_) => {
                error!("请求处理失败: {}", self);
                "服务器内部错误".to_string()
            }
            _ => self.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            success: false,
            error: self.kind(),
            message,
        })
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("密码处理失败: {}", e))
    }
}
