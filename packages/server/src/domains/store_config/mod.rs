pub mod activities;
pub mod data;
pub mod models;

pub use data::{PlatformSnapshot, SocialData, StoreDisplay};
pub use models::{Recognition, StoreConfig, StoreConfigUpdate, Visibility};
