mod handler;
mod model;
mod repository;
mod service;

pub use handler::{create_purchase, delete_purchase, get_purchase, list_purchases, update_purchase};
pub use model::Purchase;
#[cfg(test)]
pub use repository::MockPurchaseRepository;
pub use repository::PgPurchaseRepository;
pub use service::PurchaseService;
