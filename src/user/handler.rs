use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use super::model::{ChangePasswordRequest, CreateUserRequest, UpdateUserRequest};
use crate::error::ApiError;
use crate::listing::{self, ListQuery, ListQueryParams};
use crate::validation::ValidatedJson;

// GET /api/users
pub async fn list_users(
    query: web::Query<ListQuery>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let params = ListQueryParams::from(&*query);
    info!("查询用户列表: {:?}", params);

    let users = data.users.list().await?;
    Ok(HttpResponse::Ok().json(listing::process(&users, &params)))
}

// POST /api/users
pub async fn create_user(
    body: ValidatedJson<CreateUserRequest>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let user = data.users.create(&body).await?;
    Ok(HttpResponse::Ok().json(json!({ "name": user.name, "email": user.email })))
}

// GET /api/users/{id}
pub async fn get_user(
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    match data.users.get(&path).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(ApiError::UnprocessableEntity("未知用户".to_string())),
    }
}

// PUT /api/users/{id}
pub async fn update_user(
    path: web::Path<String>,
    body: ValidatedJson<UpdateUserRequest>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.users.update(&id, &body).await? {
        return Err(ApiError::UnprocessableEntity("更新用户失败".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}

// DELETE /api/users/{id}
pub async fn delete_user(
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.users.delete(&id).await? {
        return Err(ApiError::UnprocessableEntity("删除用户失败".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}

// PATCH /api/users/{id}/change-password
pub async fn change_password(
    path: web::Path<String>,
    body: ValidatedJson<ChangePasswordRequest>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.users.change_password(&id, &body).await? {
        return Err(ApiError::UnprocessableEntity("修改密码失败".to_string()));
    }
    Ok(HttpResponse::Ok().json(json!({ "id": id })))
}
