pub mod activities;
pub mod data;
pub mod models;

pub use data::ScrapeJobData;
pub use models::ScrapeJob;
