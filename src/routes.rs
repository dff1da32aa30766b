use actix_web::{error::QueryPayloadError, web, HttpRequest};
use log::warn;
use std::sync::Arc;

use crate::auth::{AuthMiddleware, JwtManager};
use crate::authentication;
use crate::error::ApiError;
use crate::product;
use crate::purchase;
use crate::user;

fn query_error(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("查询参数解析失败 {}: {}", req.path(), err);
    ApiError::Validation(err.to_string()).into()
}

/// 注册全部 `/api` 路由
pub fn configure(cfg: &mut web::ServiceConfig, jwt: Arc<JwtManager>) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .service(
            web::scope("/api")
                .route("/authentication/login", web::post().to(authentication::login))
                // 注册接口不需要 token，要在 /users 作用域之前注册
                .route("/users", web::post().to(user::create_user))
                .service(
                    web::scope("/users")
                        .wrap(AuthMiddleware::new(jwt.clone()))
                        .route("", web::get().to(user::list_users))
                        .route("/{id}", web::get().to(user::get_user))
                        .route("/{id}", web::put().to(user::update_user))
                        .route("/{id}", web::delete().to(user::delete_user))
                        .route(
                            "/{id}/change-password",
                            web::patch().to(user::change_password),
                        ),
                )
                .service(
                    web::scope("/product")
                        .wrap(AuthMiddleware::new(jwt.clone()))
                        .route("", web::get().to(product::list_products))
                        .route("", web::post().to(product::create_product))
                        .route("/{id}", web::get().to(product::get_product))
                        .route("/{id}", web::put().to(product::update_product))
                        .route("/{id}", web::delete().to(product::delete_product)),
                )
                .service(
                    web::scope("/purchase")
                        .wrap(AuthMiddleware::new(jwt))
                        .route("", web::get().to(purchase::list_purchases))
                        .route("", web::post().to(purchase::create_purchase))
                        .route("/{id}", web::get().to(purchase::get_purchase))
                        .route("/{id}", web::put().to(purchase::update_purchase))
                        .route("/{id}", web::delete().to(purchase::delete_purchase)),
                ),
        );
}
