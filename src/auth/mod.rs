mod guard;
mod jwt;
mod middleware;
mod password;
mod types;

pub use guard::{GuardScope, LoginGuard};
pub use jwt::JwtManager;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
