use actix_web::web;
use chrono::Duration;
use std::sync::Arc;

use crate::auth::{GuardScope, JwtManager, LoginGuard};
use crate::authentication::AuthenticationService;
use crate::product::{MockProductRepository, ProductService};
use crate::purchase::{MockPurchaseRepository, PurchaseService};
use crate::user::{MockUserRepository, UserService};
use crate::{routes, AppState};

const SECRET: &str = "test-secret";
const COST: u32 = 4;

pub fn jwt() -> Arc<JwtManager> {
    Arc::new(JwtManager::new(SECRET, Duration::hours(1)))
}

pub fn auth_header() -> (&'static str, String) {
    let token = jwt()
        .generate_token("u-test", "tester@example.com", "Tester")
        .unwrap();
    ("Authorization", format!("Bearer {}", token))
}

pub fn app_state(
    users: MockUserRepository,
    products: MockProductRepository,
    purchases: MockPurchaseRepository,
) -> web::Data<AppState> {
    let users: Arc<dyn crate::user::UserRepository> = Arc::new(users);
    web::Data::new(AppState {
        authentication: AuthenticationService::new(users.clone(), jwt(), COST).unwrap(),
        login_guard: LoginGuard::new(GuardScope::PerIdentifier),
        users: UserService::new(users, COST),
        products: ProductService::new(Arc::new(products)),
        purchases: PurchaseService::new(Arc::new(purchases)),
    })
}

pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(state);
        routes::configure(cfg, jwt());
    }
}
