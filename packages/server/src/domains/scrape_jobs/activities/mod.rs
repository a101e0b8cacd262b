pub mod collect_results;
pub mod refresh_job;
pub mod start_job;

pub use collect_results::collect_job_results;
pub use refresh_job::{refresh_job_status, JobRefresh};
pub use start_job::start_scrape_job;
