use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use super::model::PurchaseInput;
use crate::error::ApiError;
use crate::listing::{self, ListQuery, ListQueryParams};
use crate::validation::ValidatedJson;

// GET /api/purchase
pub async fn list_purchases(
    query: web::Query<ListQuery>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let params = ListQueryParams::from(&*query);
    info!("查询订单列表: {:?}", params);

    let purchases = data.purchases.list().await?;
    Ok(HttpResponse::Ok().json(listing::process(&purchases, &params)))
}

// GET /api/purchase/{id}
pub async fn get_purchase(
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    match data.purchases.get(&path).await? {
        Some(purchase) => Ok(HttpResponse::Ok().json(purchase)),
        None => Err(ApiError::UnprocessableEntity("未知订单".to_string())),
    }
}

// POST /api/purchase
pub async fn create_purchase(
    body: ValidatedJson<PurchaseInput>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let purchase = data.purchases.create(&body).await?;
    Ok(HttpResponse::Ok().json(json!({
        "id": purchase.id,
        "name": purchase.name,
        "quantity": purchase.quantity,
        "message": "订单已提交",
    })))
}

// PUT /api/purchase/{id}
pub async fn update_purchase(
    path: web::Path<String>,
    body: ValidatedJson<PurchaseInput>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.purchases.update(&id, &body).await? {
        return Err(ApiError::UnprocessableEntity("更新订单失败".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "name": body.name,
        "quantity": body.quantity,
        "message": "订单更新成功",
    })))
}

// DELETE /api/purchase/{id}
pub async fn delete_purchase(
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.purchases.delete(&id).await? {
        return Err(ApiError::UnprocessableEntity("取消订单失败".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({ "id": id, "message": "订单已取消" })))
}
