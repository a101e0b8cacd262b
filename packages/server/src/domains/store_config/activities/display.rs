use anyhow::Result;
use brightdata_client::Platform;

use crate::domains::store_config::{PlatformSnapshot, SocialData, StoreDisplay};
use crate::kernel::ServerDeps;

/// Assemble the public page for `user_id`. `None` when they have no config.
///
/// Each platform contributes its newest completed job. Hiding social likes
/// leaves `social_data` empty.
pub async fn build_store_display(user_id: &str, deps: &ServerDeps) -> Result<Option<StoreDisplay>> {
    let Some(config) = deps.store_configs.find_for_user(user_id).await? else {
        return Ok(None);
    };

    let mut social_data = SocialData::default();
    if config.visibility.show_social_likes {
        for platform in Platform::ALL {
            let latest = deps.job_store.latest_completed(user_id, platform).await?;
            if let Some(snapshot) = latest.and_then(PlatformSnapshot::from_job) {
                social_data.insert(snapshot);
            }
        }
    }

    Ok(Some(StoreDisplay {
        business_name: config.business_name.clone(),
        config,
        social_data,
    }))
}
