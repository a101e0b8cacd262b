pub mod display;
pub mod manage_config;
pub mod scrape_links;

pub use display::build_store_display;
pub use manage_config::{load_store_config, update_store_config};
pub use scrape_links::scrape_store_links;
