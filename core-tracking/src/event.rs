//! In-app event model measured by the attribution engine.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{Result, TrackingError};
use crate::event_item::EventItem;
use crate::keys;

/// How an event is identified on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventIdentifier {
    Name(String),
    Id(i64),
}

/// An event to be measured, with optional details.
///
/// Build with [`TrackingEvent::with_name`] or [`TrackingEvent::with_id`] and
/// the chained setters, then serialize with [`to_params`](Self::to_params)
/// and [`to_body`](Self::to_body).
///
/// ```
/// use core_tracking::{keys, EventItem, TrackingEvent};
///
/// let event = TrackingEvent::with_name(keys::EVENT_PURCHASE)?
///     .revenue(4.99, "USD")
///     .item(EventItem::new("coins", 4.99, 1));
///
/// let params = event.to_params()?;
/// assert_eq!(params[keys::SITE_EVENT_NAME], "purchase");
/// # Ok::<(), core_tracking::TrackingError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub identifier: EventIdentifier,
    pub items: Vec<EventItem>,
    pub revenue: Option<f64>,
    pub currency_code: Option<String>,
    pub ref_id: Option<String>,
    /// Store receipt bytes for in-app purchases
    pub receipt: Option<Vec<u8>>,
    pub content_type: Option<String>,
    pub content_id: Option<String>,
    pub search_string: Option<String>,
    /// Store transaction state of an in-app purchase
    pub transaction_state: Option<i64>,
    pub rating: Option<f64>,
    pub level: Option<i64>,
    pub quantity: Option<u64>,
    pub date1: Option<DateTime<Utc>>,
    pub date2: Option<DateTime<Utc>>,
    pub attributes: [Option<String>; 5],
}

impl TrackingEvent {
    fn from_identifier(identifier: EventIdentifier) -> Self {
        Self {
            identifier,
            items: Vec::new(),
            revenue: None,
            currency_code: None,
            ref_id: None,
            receipt: None,
            content_type: None,
            content_id: None,
            search_string: None,
            transaction_state: None,
            rating: None,
            level: None,
            quantity: None,
            date1: None,
            date2: None,
            attributes: Default::default(),
        }
    }

    /// Creates an event identified by name.
    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TrackingError::EmptyEventName);
        }
        Ok(Self::from_identifier(EventIdentifier::Name(name)))
    }

    /// Creates an event identified by its dashboard id.
    pub fn with_id(id: i64) -> Result<Self> {
        if id <= 0 {
            return Err(TrackingError::InvalidEventId(id));
        }
        Ok(Self::from_identifier(EventIdentifier::Id(id)))
    }

    pub fn revenue(mut self, amount: f64, currency_code: impl Into<String>) -> Self {
        self.revenue = Some(amount);
        self.currency_code = Some(currency_code.into());
        self
    }

    pub fn ref_id(mut self, ref_id: impl Into<String>) -> Self {
        self.ref_id = Some(ref_id.into());
        self
    }

    pub fn item(mut self, item: EventItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = EventItem>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn receipt(mut self, receipt: impl Into<Vec<u8>>) -> Self {
        self.receipt = Some(receipt.into());
        self
    }

    pub fn content(mut self, content_type: impl Into<String>, content_id: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self.content_id = Some(content_id.into());
        self
    }

    pub fn search_string(mut self, search: impl Into<String>) -> Self {
        self.search_string = Some(search.into());
        self
    }

    pub fn transaction_state(mut self, state: i64) -> Self {
        self.transaction_state = Some(state);
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn quantity(mut self, quantity: u64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn dates(mut self, date1: DateTime<Utc>, date2: Option<DateTime<Utc>>) -> Self {
        self.date1 = Some(date1);
        self.date2 = date2;
        self
    }

    /// Sets custom attribute `index` (1 through 5).
    pub fn attribute(mut self, index: usize, value: impl Into<String>) -> Result<Self> {
        if !(1..=5).contains(&index) {
            return Err(TrackingError::InvalidAttributeIndex(index));
        }
        self.attributes[index - 1] = Some(value.into());
        Ok(self)
    }

    /// Human-readable label, the name or `#id`.
    pub fn label(&self) -> String {
        match &self.identifier {
            EventIdentifier::Name(name) => name.clone(),
            EventIdentifier::Id(id) => format!("#{}", id),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [(keys::REVENUE, self.revenue), (keys::EVENT_RATING, self.rating)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(TrackingError::InvalidAmount { field, value });
                }
            }
        }

        if let Some(code) = &self.currency_code {
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(TrackingError::InvalidCurrencyCode(code.clone()));
            }
        }

        self.items.iter().try_for_each(EventItem::validate)
    }

    /// Serializes the scalar fields into request parameters.
    ///
    /// Dates are Unix seconds. Unset fields are omitted.
    pub fn to_params(&self) -> Result<BTreeMap<String, String>> {
        self.validate()?;

        let mut params = BTreeMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                params.insert(key.to_string(), value);
            }
        };

        match &self.identifier {
            EventIdentifier::Name(name) => put(keys::SITE_EVENT_NAME, Some(name.clone())),
            EventIdentifier::Id(id) => put(keys::SITE_EVENT_ID, Some(id.to_string())),
        }

        put(keys::REVENUE, self.revenue.map(|r| r.to_string()));
        put(keys::CURRENCY_CODE, self.currency_code.clone());
        put(keys::REF_ID, self.ref_id.clone());
        put(keys::EVENT_CONTENT_TYPE, self.content_type.clone());
        put(keys::EVENT_CONTENT_ID, self.content_id.clone());
        put(keys::EVENT_SEARCH_STRING, self.search_string.clone());
        put(
            keys::IOS_PURCHASE_STATUS,
            self.transaction_state.map(|s| s.to_string()),
        );
        put(keys::EVENT_RATING, self.rating.map(|r| r.to_string()));
        put(keys::EVENT_LEVEL, self.level.map(|l| l.to_string()));
        put(keys::EVENT_QUANTITY, self.quantity.map(|q| q.to_string()));
        put(keys::EVENT_DATE1, self.date1.map(|d| d.timestamp().to_string()));
        put(keys::EVENT_DATE2, self.date2.map(|d| d.timestamp().to_string()));

        for (key, value) in keys::EVENT_ATTRIBUTE_SUBS.iter().zip(&self.attributes) {
            put(*key, value.clone());
        }

        debug!(event = %self.label(), params = params.len(), "Serialized tracking event");
        Ok(params)
    }

    /// POST body carrying the event items and the store receipt.
    ///
    /// Returns `None` when there is neither.
    pub fn to_body(&self) -> Result<Option<Value>> {
        if self.items.is_empty() && self.receipt.is_none() {
            return Ok(None);
        }

        let mut body = json!({});
        if !self.items.is_empty() {
            body[keys::DATA] = serde_json::to_value(&self.items)?;
        }
        if let Some(receipt) = &self.receipt {
            body[keys::STORE_RECEIPT] = Value::String(BASE64.encode(receipt));
        }
        Ok(Some(body))
    }
}
