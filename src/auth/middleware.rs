use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, warn};
use std::rc::Rc;
use std::sync::Arc;

use crate::auth::JwtManager;
use crate::error::ApiError;

/// 校验 `Authorization: Bearer <token>`，通过后把 Claims 放进请求扩展
#[derive(Clone)]
pub struct AuthMiddleware {
    jwt: Arc<JwtManager>,
}

impl AuthMiddleware {
    pub fn new(jwt: Arc<JwtManager>) -> Self {
        Self { jwt }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            jwt: self.jwt.clone(),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    jwt: Arc<JwtManager>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let jwt = self.jwt.clone();
        let service = self.service.clone();

        Box::pin(async move {
            // 从请求头中获取 token
            let token = req
                .headers()
                .get("Authorization")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .unwrap_or("")
                .to_string();

            if token.is_empty() {
                warn!("未提供认证 token: {}", req.path());
                return Err(ApiError::Unauthorized("未提供认证 token".to_string()).into());
            }

            match jwt.validate_token(&token) {
                Ok(claims) => {
                    debug!("用户 {} 认证成功", claims.email);
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(e) => {
                    warn!("Token 验证失败: {}", e);
                    Err(ApiError::Unauthorized("Token 验证失败".to_string()).into())
                }
            }
        })
    }
}
