mod handler;
mod model;
mod repository;
mod service;

pub use handler::{change_password, create_user, delete_user, get_user, list_users, update_user};
pub use model::User;
#[cfg(test)]
pub use repository::MockUserRepository;
pub use repository::{PgUserRepository, UserRepository};
pub use service::UserService;
