// HTTP routes
pub mod health;
pub mod scrape_jobs;
pub mod store_config;

pub use health::*;
pub use scrape_jobs::*;
pub use store_config::*;
