use brightdata_client::{NormalizedRecord, Platform};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domains::scrape_jobs::ScrapeJob;
use crate::domains::store_config::StoreConfig;

/// Public storefront page: the owner's configuration plus the newest
/// completed scrape per platform.
#[derive(Debug, Clone, Serialize)]
pub struct StoreDisplay {
    pub business_name: Option<String>,
    pub config: StoreConfig,
    pub social_data: SocialData,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SocialData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<PlatformSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<PlatformSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub googlemaps: Option<PlatformSnapshot>,
}

impl SocialData {
    pub fn insert(&mut self, snapshot: PlatformSnapshot) {
        let slot = match snapshot.platform {
            Platform::Instagram => &mut self.instagram,
            Platform::Facebook => &mut self.facebook,
            Platform::GoogleMaps => &mut self.googlemaps,
        };
        *slot = Some(snapshot);
    }

    pub fn is_empty(&self) -> bool {
        self.instagram.is_none() && self.facebook.is_none() && self.googlemaps.is_none()
    }
}

/// Results of one completed scrape job.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformSnapshot {
    pub platform: Platform,
    pub job_id: String,
    pub url: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub data: NormalizedRecord,
}

impl PlatformSnapshot {
    /// `None` for jobs without stored results.
    pub fn from_job(job: ScrapeJob) -> Option<Self> {
        let data = job.platform.restore_record(job.results.as_ref()?);
        Some(Self {
            platform: job.platform,
            job_id: job.job_id,
            url: job.url,
            completed_at: job.completed_at,
            data,
        })
    }
}
