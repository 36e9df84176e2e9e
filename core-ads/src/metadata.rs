//! Targeting metadata attached to an ad request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// User gender used for ad targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// Targeting hints sent with every request of a coordinator.
///
/// All fields are optional; unset fields are left out of the request body.
///
/// ```
/// use core_ads::AdMetadata;
///
/// let metadata = AdMetadata::new()
///     .keyword("sports")
///     .custom_target("team", "home")
///     .location(37.77, -122.42);
/// assert!(metadata.has_location());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Free-form key/value targets, passed through opaquely
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_targets: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,

    /// Request test creatives for this placement
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub debug_mode: bool,
}

impl AdMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.extend(keywords.into_iter().map(Into::into));
        self
    }

    pub fn custom_target(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_targets.insert(key.into(), value.into());
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }

    /// Whether both coordinates are set and within range.
    pub fn has_location(&self) -> bool {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(long)) => {
                (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&long)
            }
            _ => false,
        }
    }

    /// Copy suitable for the wire: an invalid location is dropped.
    pub(crate) fn sanitized(&self) -> Self {
        let mut metadata = self.clone();
        if !metadata.has_location() {
            metadata.latitude = None;
            metadata.longitude = None;
        }
        metadata
    }
}
