//! Snapshot record parsers.
//!
//! Each parser reads only the first record of a snapshot (one aggregate record per
//! crawled URL) and never fails: missing or malformed fields fall back to zero or
//! the empty string. An empty snapshot produces a zero record carrying
//! [`NO_DATA_RETURNED`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NO_DATA_RETURNED: &str = "No data returned";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramStats {
    pub followers: u64,
    pub posts: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookStats {
    pub fans: u64,
    pub reviews_count: u64,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleMapsStats {
    pub reviews_count: u64,
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Platform-normalized summary of a snapshot.
///
/// Serialized without a tag; the owning job record carries the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedRecord {
    Instagram(InstagramStats),
    Facebook(FacebookStats),
    GoogleMaps(GoogleMapsStats),
    /// Payload that could not be interpreted as a record list
    Raw(Value),
}

impl NormalizedRecord {
    /// True when the record is the empty-snapshot placeholder.
    pub fn is_empty_snapshot(&self) -> bool {
        let error = match self {
            NormalizedRecord::Instagram(s) => s.error.as_deref(),
            NormalizedRecord::Facebook(s) => s.error.as_deref(),
            NormalizedRecord::GoogleMaps(s) => s.error.as_deref(),
            NormalizedRecord::Raw(_) => None,
        };
        error == Some(NO_DATA_RETURNED)
    }
}

pub fn parse_instagram_data(records: &[Value]) -> InstagramStats {
    let Some(item) = records.first() else {
        return InstagramStats {
            followers: 0,
            posts: 0,
            username: None,
            profile_url: None,
            error: Some(NO_DATA_RETURNED.to_string()),
        };
    };

    InstagramStats {
        followers: count(item, "followers_count"),
        posts: count(item, "posts_count"),
        username: Some(text(item, "username")),
        profile_url: Some(text(item, "url")),
        error: None,
    }
}

pub fn parse_facebook_data(records: &[Value]) -> FacebookStats {
    let Some(item) = records.first() else {
        return FacebookStats {
            fans: 0,
            reviews_count: 0,
            rating: 0.0,
            page_name: None,
            error: Some(NO_DATA_RETURNED.to_string()),
        };
    };

    FacebookStats {
        fans: count(item, "fans_count"),
        reviews_count: count(item, "reviews_count"),
        rating: rating(item, "rating"),
        page_name: Some(text(item, "name")),
        error: None,
    }
}

pub fn parse_googlemaps_data(records: &[Value]) -> GoogleMapsStats {
    let Some(item) = records.first() else {
        return GoogleMapsStats {
            reviews_count: 0,
            rating: 0.0,
            place_name: None,
            address: None,
            error: Some(NO_DATA_RETURNED.to_string()),
        };
    };

    GoogleMapsStats {
        reviews_count: count(item, "reviews_count"),
        rating: rating(item, "rating"),
        place_name: Some(text(item, "name")),
        address: Some(text(item, "address")),
        error: None,
    }
}

/// Non-negative count. Accepts integers, floats (truncated) and numeric strings
/// such as `"1,204"`.
fn count(item: &Value, key: &str) -> u64 {
    match item.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s
            .trim()
            .replace(',', "")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f as u64)
            .unwrap_or(0),
        _ => 0,
    }
}

fn rating(item: &Value, key: &str) -> f64 {
    match item.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()).unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text(item: &Value, key: &str) -> String {
    item.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
