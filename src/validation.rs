use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use futures::future::LocalBoxFuture;
use log::warn;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use validator::Validate;

use crate::error::ApiError;

/// 解析 JSON 请求体并执行 `validator` 校验规则，失败时返回 400
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let json = web::Json::<T>::from_request(req, payload);
        let path = req.path().to_string();

        Box::pin(async move {
            let value = json
                .await
                .map_err(|e| {
                    warn!("请求体解析失败 {}: {}", path, e);
                    ApiError::Validation(e.to_string())
                })?
                .into_inner();

            if let Err(e) = value.validate() {
                warn!("请求体校验失败 {}: {}", path, e);
                return Err(ApiError::from(e).into());
            }

            Ok(ValidatedJson(value))
        })
    }
}
