use anyhow::Result;
use brightdata_client::Platform;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

fn shown() -> bool {
    true
}

/// Which storefront display sections are shown. Everything is on by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visibility {
    #[serde(default = "shown")]
    pub show_social_likes: bool,
    #[serde(default = "shown")]
    pub show_satisfied_customers: bool,
    #[serde(default = "shown")]
    pub show_sustainability_index: bool,
    #[serde(default = "shown")]
    pub show_environmental_impact: bool,
    #[serde(default = "shown")]
    pub show_recognitions: bool,
    #[serde(default = "shown")]
    pub show_amenities: bool,
    #[serde(default = "shown")]
    pub show_additional_services: bool,
    #[serde(default = "shown")]
    pub show_customer_satisfaction_chart: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            show_social_likes: true,
            show_satisfied_customers: true,
            show_sustainability_index: true,
            show_environmental_impact: true,
            show_recognitions: true,
            show_amenities: true,
            show_additional_services: true,
            show_customer_satisfaction_chart: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recognition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// A store owner's storefront configuration, including the social links
/// that scrape jobs are started for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreConfig {
    pub id: Uuid,
    pub user_id: String,
    pub business_name: Option<String>,
    pub logo_url: Option<String>,
    pub business_description: Option<String>,
    pub mission_statement: Option<String>,
    pub visibility: Json<Visibility>,
    pub amenities: Vec<String>,
    pub additional_services: Vec<String>,
    pub recognitions: Json<Vec<Recognition>>,
    pub instagram_username: Option<String>,
    pub facebook_page_id: Option<String>,
    pub google_place_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update. Absent fields are left alone; an empty string clears a
/// text field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfigUpdate {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub business_description: Option<String>,
    #[serde(default)]
    pub mission_statement: Option<String>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub amenities: Option<Vec<String>>,
    #[serde(default)]
    pub additional_services: Option<Vec<String>>,
    #[serde(default)]
    pub recognitions: Option<Vec<Recognition>>,
    #[serde(default)]
    pub instagram_username: Option<String>,
    #[serde(default)]
    pub facebook_page_id: Option<String>,
    #[serde(default)]
    pub google_place_id: Option<String>,
}

fn set_text(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let trimmed = value.trim();
        *field = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }
}

impl StoreConfig {
    pub fn new(user_id: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id: user_id.to_string(),
            business_name: None,
            logo_url: None,
            business_description: None,
            mission_statement: None,
            visibility: Json(Visibility::default()),
            amenities: Vec::new(),
            additional_services: Vec::new(),
            recognitions: Json(Vec::new()),
            instagram_username: None,
            facebook_page_id: None,
            google_place_id: None,
            updated_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, update: StoreConfigUpdate) {
        set_text(&mut self.business_name, update.business_name);
        set_text(&mut self.logo_url, update.logo_url);
        set_text(&mut self.business_description, update.business_description);
        set_text(&mut self.mission_statement, update.mission_statement);
        set_text(
            &mut self.instagram_username,
            update.instagram_username.map(|u| u.trim().trim_start_matches('@').to_string()),
        );
        set_text(&mut self.facebook_page_id, update.facebook_page_id);
        set_text(&mut self.google_place_id, update.google_place_id);

        if let Some(visibility) = update.visibility {
            self.visibility = Json(visibility);
        }
        if let Some(amenities) = update.amenities {
            self.amenities = amenities;
        }
        if let Some(services) = update.additional_services {
            self.additional_services = services;
        }
        if let Some(recognitions) = update.recognitions {
            self.recognitions = Json(recognitions);
        }

        self.updated_at = Utc::now();
    }

    /// Page URL to scrape for each configured social link.
    pub fn scrape_targets(&self) -> Vec<(Platform, String)> {
        Platform::ALL
            .iter()
            .filter_map(|platform| {
                let url = match platform {
                    Platform::Instagram => self
                        .instagram_username
                        .as_ref()
                        .map(|u| format!("https://www.instagram.com/{}/", u)),
                    Platform::Facebook => self
                        .facebook_page_id
                        .as_ref()
                        .map(|id| format!("https://www.facebook.com/{}", id)),
                    Platform::GoogleMaps => self
                        .google_place_id
                        .as_ref()
                        .map(|id| format!("https://www.google.com/maps/place/?q=place_id:{}", id)),
                };
                url.map(|url| (*platform, url))
            })
            .collect()
    }
}

// =============================================================================
// SQL Queries
// =============================================================================

impl StoreConfig {
    const COLUMNS: &'static str = "id, user_id, business_name, logo_url, business_description, \
         mission_statement, visibility, amenities, additional_services, recognitions, \
         instagram_username, facebook_page_id, google_place_id, updated_at";

    pub async fn find_by_user(user_id: &str, pool: &PgPool) -> Result<Option<Self>> {
        let q = format!("SELECT {} FROM store_configs WHERE user_id = $1", Self::COLUMNS);
        sqlx::query_as::<_, Self>(&q)
            .bind(user_id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert, or replace every column of the user's existing row.
    pub async fn upsert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "INSERT INTO store_configs (id, user_id, business_name, logo_url, business_description,
                 mission_statement, visibility, amenities, additional_services, recognitions,
                 instagram_username, facebook_page_id, google_place_id, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
             ON CONFLICT (user_id) DO UPDATE
             SET business_name = EXCLUDED.business_name,
                 logo_url = EXCLUDED.logo_url,
                 business_description = EXCLUDED.business_description,
                 mission_statement = EXCLUDED.mission_statement,
                 visibility = EXCLUDED.visibility,
                 amenities = EXCLUDED.amenities,
                 additional_services = EXCLUDED.additional_services,
                 recognitions = EXCLUDED.recognitions,
                 instagram_username = EXCLUDED.instagram_username,
                 facebook_page_id = EXCLUDED.facebook_page_id,
                 google_place_id = EXCLUDED.google_place_id,
                 updated_at = EXCLUDED.updated_at",
        )
        .bind(self.id)
        .bind(&self.user_id)
        .bind(&self.business_name)
        .bind(&self.logo_url)
        .bind(&self.business_description)
        .bind(&self.mission_statement)
        .bind(&self.visibility)
        .bind(&self.amenities)
        .bind(&self.additional_services)
        .bind(&self.recognitions)
        .bind(&self.instagram_username)
        .bind(&self.facebook_page_id)
        .bind(&self.google_place_id)
        .bind(self.updated_at)
        .execute(pool)
        .await?;
        Ok(())
    }
}
