// Storefront scrape API - core library
//
// Starts BrightData scrape jobs for store owners' social and maps pages, tracks
// them to completion and keeps the normalized results per user.

pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
