mod handler;
mod service;

pub use handler::login;
pub use service::AuthenticationService;
