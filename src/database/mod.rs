pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod store;

pub use repository::{HoldingRepository, StoreError, UserRepository};
pub use store::Store;
