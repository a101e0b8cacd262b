pub mod scrape_job;

pub use scrape_job::ScrapeJob;
