// handlers/protected/stocks/mod.rs - Holdings CRUD and portfolio metrics
//
// Every route here sits behind middleware::require_auth and is scoped to
// the authenticated user.

pub mod holding;
pub mod metrics;

pub use holding::{create, delete, list, update};
pub use metrics::{dashboard, portfolio_value};
