// HTTP middleware
pub mod auth_user;

pub use auth_user::*;
