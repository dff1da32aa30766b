use actix_web::{web, HttpResponse};
use log::info;
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::validation::ValidatedJson;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
}

// POST /api/authentication/login
pub async fn login(
    body: ValidatedJson<LoginRequest>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let LoginRequest { email, password } = body.into_inner();
    info!("用户尝试登录: {}", email);

    let success = data
        .login_guard
        .attempt(&email, || {
            data.authentication
                .check_login_credentials(&email, &password)
        })
        .await?;

    Ok(HttpResponse::Ok().json(success))
}
