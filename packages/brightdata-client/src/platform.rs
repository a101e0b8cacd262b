//! Supported scrape platforms.
//!
//! Each platform owns exactly one dataset id and one result parser. Both are
//! exhaustive matches, so adding a variant fails to compile until it is wired up.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::BrightDataError;
use crate::parsers::{
    parse_facebook_data, parse_googlemaps_data, parse_instagram_data, NormalizedRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Facebook,
    GoogleMaps,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::Instagram, Platform::Facebook, Platform::GoogleMaps];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::GoogleMaps => "googlemaps",
        }
    }

    /// BrightData dataset identifier used when triggering a collection.
    pub fn dataset_id(self) -> &'static str {
        match self {
            Platform::Instagram => "gd_l7q7dkf244hwjntr0",
            Platform::Facebook => "gd_lvhf8tq8ky28b3tbz",
            Platform::GoogleMaps => "gd_l7q7dkf244hwjku40",
        }
    }

    /// Normalize a raw snapshot payload for this platform.
    ///
    /// `null` counts as an empty record list. Any other non-array payload is
    /// returned untouched as [`NormalizedRecord::Raw`].
    pub fn parse_payload(self, payload: &Value) -> NormalizedRecord {
        let records: &[Value] = match payload {
            Value::Array(items) => items,
            Value::Null => &[],
            other => return NormalizedRecord::Raw(other.clone()),
        };

        match self {
            Platform::Instagram => NormalizedRecord::Instagram(parse_instagram_data(records)),
            Platform::Facebook => NormalizedRecord::Facebook(parse_facebook_data(records)),
            Platform::GoogleMaps => NormalizedRecord::GoogleMaps(parse_googlemaps_data(records)),
        }
    }

    /// Rebuild a record previously serialized from [`Platform::parse_payload`].
    ///
    /// Values that don't match this platform's stats shape come back as `Raw`.
    pub fn restore_record(self, stored: &Value) -> NormalizedRecord {
        let restored = match self {
            Platform::Instagram => {
                serde_json::from_value(stored.clone()).map(NormalizedRecord::Instagram)
            }
            Platform::Facebook => {
                serde_json::from_value(stored.clone()).map(NormalizedRecord::Facebook)
            }
            Platform::GoogleMaps => {
                serde_json::from_value(stored.clone()).map(NormalizedRecord::GoogleMaps)
            }
        };
        restored.unwrap_or_else(|_| NormalizedRecord::Raw(stored.clone()))
    }

    /// Comma-separated list of supported names, for error messages.
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = BrightDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == name)
            .ok_or_else(|| BrightDataError::UnsupportedPlatform {
                platform: s.to_string(),
                supported: Self::supported_names(),
            })
    }
}

impl TryFrom<String> for Platform {
    type Error = BrightDataError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
