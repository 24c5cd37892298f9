//! Orders: persistence and the service the HTTP handlers call

pub mod service;
pub mod store;

pub use service::OrderService;
pub use store::{CreateOutcome, OrderStore, SqliteOrderStore, StoreError};
