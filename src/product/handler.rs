use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use super::model::ProductInput;
use crate::error::ApiError;
use crate::listing::{self, ListQuery, ListQueryParams};
use crate::validation::ValidatedJson;

// GET /api/product
pub async fn list_products(
    query: web::Query<ListQuery>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let params = ListQueryParams::from(&*query);
    info!("查询商品列表: {:?}", params);

    let products = data.products.list().await?;
    Ok(HttpResponse::Ok().json(listing::process(&products, &params)))
}

// GET /api/product/{id}
pub async fn get_product(
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    match data.products.get(&path).await? {
        Some(product) => Ok(HttpResponse::Ok().json(product)),
        None => Err(ApiError::UnprocessableEntity("未知商品".to_string())),
    }
}

// POST /api/product
pub async fn create_product(
    body: ValidatedJson<ProductInput>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let product = data.products.create(&body).await?;
    Ok(HttpResponse::Ok().json(json!({
        "id": product.id,
        "name": product.name,
        "description": product.description,
        "price": product.price,
        "stock": product.stock,
        "message": "商品创建成功",
    })))
}

// PUT /api/product/{id}
pub async fn update_product(
    path: web::Path<String>,
    body: ValidatedJson<ProductInput>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.products.update(&id, &body).await? {
        return Err(ApiError::UnprocessableEntity("更新商品失败".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({
        "id": id,
        "name": body.name,
        "description": body.description,
        "price": body.price,
        "stock": body.stock,
        "message": "商品更新成功",
    })))
}

// DELETE /api/product/{id}
pub async fn delete_product(
    path: web::Path<String>,
    data: web::Data<crate::AppState>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.products.delete(&id).await? {
        return Err(ApiError::UnprocessableEntity("删除商品失败".to_string()));
    }

    Ok(HttpResponse::Ok().json(json!({ "id": id, "message": "商品删除成功" })))
}

#[cfg(test)]
mod tests {
    use crate::product::{MockProductRepository, Product};
    use crate::purchase::MockPurchaseRepository;
    use crate::test_support;
    use crate::user::MockUserRepository;
    use actix_web::{http::StatusCode, test, App};

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            price: 1000,
            stock: 1,
        }
    }

    #[actix_web::test]
    async fn test_list_products_with_query() {
        let mut products = MockProductRepository::new();
        products.expect_find_all().returning(|| {
            Ok(vec![
                product("1", "Apple"),
                product("2", "banana"),
                product("3", "Avocado"),
                product("4", "Cherry"),
            ])
        });

        let state = test_support::app_state(MockUserRepository::new(), products, MockPurchaseRepository::new());
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/product?search=name:a&sort=name:asc&page_number=1&page_size=2")
            .insert_header(test_support::auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 3);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(body["has_next_page"], true);
        assert_eq!(body["has_previous_page"], false);
        assert_eq!(body["data"][0]["name"], "Apple");
        assert_eq!(body["data"][1]["name"], "Avocado");
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn test_list_products_bad_numbers_use_defaults() {
        let mut products = MockProductRepository::new();
        products
            .expect_find_all()
            .returning(|| Ok(vec![product("1", "Apple")]));

        let state = test_support::app_state(MockUserRepository::new(), products, MockPurchaseRepository::new());
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/product?page_number=abc&page_size=-1&search=oops")
            .insert_header(test_support::auth_header())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["page_number"], 1);
        assert_eq!(body["page_size"], 10);
        assert_eq!(body["count"], 1);
    }

    #[actix_web::test]
    async fn test_unknown_product_is_unprocessable() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let state = test_support::app_state(MockUserRepository::new(), products, MockPurchaseRepository::new());
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::get()
            .uri("/api/product/missing")
            .insert_header(test_support::auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_create_product_validates_body() {
        let mut products = MockProductRepository::new();
        products.expect_create().never();

        let state = test_support::app_state(MockUserRepository::new(), products, MockPurchaseRepository::new());
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::post()
            .uri("/api/product")
            .insert_header(test_support::auth_header())
            .set_json(serde_json::json!({ "name": "", "price": -5, "stock": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_create_product() {
        let mut products = MockProductRepository::new();
        products.expect_create().times(1).returning(|input| {
            Ok(Product {
                id: "new-id".to_string(),
                name: input.name.clone(),
                description: input.description.clone(),
                price: input.price,
                stock: input.stock,
            })
        });

        let state = test_support::app_state(MockUserRepository::new(), products, MockPurchaseRepository::new());
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::post()
            .uri("/api/product")
            .insert_header(test_support::auth_header())
            .set_json(serde_json::json!({ "name": "Teh", "description": "Melati", "price": 5000, "stock": 3 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["id"], "new-id");
        assert_eq!(body["name"], "Teh");
        assert_eq!(body["stock"], 3);
    }

    #[actix_web::test]
    async fn test_delete_missing_product_is_unprocessable() {
        let mut products = MockProductRepository::new();
        products.expect_find_by_id().returning(|_| Ok(None));

        let state = test_support::app_state(MockUserRepository::new(), products, MockPurchaseRepository::new());
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::delete()
            .uri("/api/product/missing")
            .insert_header(test_support::auth_header())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[actix_web::test]
    async fn test_requires_token() {
        let state = test_support::app_state(
            MockUserRepository::new(),
            MockProductRepository::new(),
            MockPurchaseRepository::new(),
        );
        let app = test::init_service(App::new().configure(test_support::configure(state))).await;

        let req = test::TestRequest::get().uri("/api/product").to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(e) => e.as_response_error().status_code(),
        };
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
