pub mod holding;
pub mod user;

pub use holding::{Holding, HoldingChanges, NewHolding};
pub use user::{NewUser, User, UserProfile};
