use anyhow::Result;

use crate::domains::store_config::{StoreConfig, StoreConfigUpdate};
use crate::kernel::ServerDeps;

/// The owner's configuration, created with defaults on first access.
pub async fn load_store_config(user_id: &str, deps: &ServerDeps) -> Result<StoreConfig> {
    if let Some(config) = deps.store_configs.find_for_user(user_id).await? {
        return Ok(config);
    }

    let config = StoreConfig::new(user_id);
    deps.store_configs.save(&config).await?;
    tracing::info!(user_id = %user_id, "Created default store config");
    Ok(config)
}

/// Merge `update` into the owner's configuration and save it.
pub async fn update_store_config(
    user_id: &str,
    update: StoreConfigUpdate,
    deps: &ServerDeps,
) -> Result<StoreConfig> {
    let mut config = load_store_config(user_id, deps).await?;
    config.apply(update);
    deps.store_configs.save(&config).await?;
    tracing::info!(user_id = %user_id, "Updated store config");
    Ok(config)
}
