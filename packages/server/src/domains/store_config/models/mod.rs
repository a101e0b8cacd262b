pub mod store_config;

pub use store_config::{Recognition, StoreConfig, StoreConfigUpdate, Visibility};
