mod collation;
mod page;
mod params;
mod processor;

pub use params::{ListQuery, ListQueryParams};
pub use processor::{process, Listable};
