use anyhow::Result;
use brightdata_client::{FetchOutcome, FetchRequest};

use crate::domains::scrape_jobs::activities::start_scrape_job;
use crate::domains::store_config::activities::load_store_config;
use crate::kernel::ServerDeps;

/// Start a fire-and-forget scrape for every social link in the owner's config.
///
/// One outcome per configured link, in platform order. Nothing is started when
/// no links are set.
pub async fn scrape_store_links(user_id: &str, deps: &ServerDeps) -> Result<Vec<FetchOutcome>> {
    let config = load_store_config(user_id, deps).await?;
    let targets = config.scrape_targets();
    tracing::info!(user_id = %user_id, links = targets.len(), "Scraping store links");

    let mut outcomes = Vec::with_capacity(targets.len());
    for (platform, url) in targets {
        let request = FetchRequest::new(platform.as_str(), url);
        outcomes.push(start_scrape_job(user_id, &request, deps).await?);
    }
    Ok(outcomes)
}
