//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{PostgresScrapeJobStore, PostgresStoreConfigStore, ScrapeClient, ServerDeps};
pub use test_dependencies::{MemoryScrapeJobStore, MemoryStoreConfigStore, TestDependencies};
pub use traits::*;
