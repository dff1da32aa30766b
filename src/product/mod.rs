mod handler;
mod model;
mod repository;
mod service;

pub use handler::{create_product, delete_product, get_product, list_products, update_product};
pub use model::Product;
#[cfg(test)]
pub use repository::MockProductRepository;
pub use repository::PgProductRepository;
pub use service::ProductService;
