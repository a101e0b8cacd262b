pub mod scrape_jobs;
pub mod store_config;
