use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};
use crate::keys;

/// A line item attached to a [`TrackingEvent`](crate::TrackingEvent),
/// typically one product in a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventItem {
    /// Item name
    pub item: String,
    /// Price per unit
    pub unit_price: f64,
    /// Number of units
    pub quantity: u32,
    /// Revenue for the line; zero means "derive from price and quantity"
    pub revenue: f64,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "attribute_sub1")]
    pub attribute1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "attribute_sub2")]
    pub attribute2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "attribute_sub3")]
    pub attribute3: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "attribute_sub4")]
    pub attribute4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "attribute_sub5")]
    pub attribute5: Option<String>,
}

impl EventItem {
    pub fn new(item: impl Into<String>, unit_price: f64, quantity: u32) -> Self {
        Self {
            item: item.into(),
            unit_price,
            quantity,
            revenue: 0.0,
            attribute1: None,
            attribute2: None,
            attribute3: None,
            attribute4: None,
            attribute5: None,
        }
    }

    pub fn with_revenue(mut self, revenue: f64) -> Self {
        self.revenue = revenue;
        self
    }

    /// Sets custom attribute `index` (1 through 5).
    pub fn with_attribute(mut self, index: usize, value: impl Into<String>) -> Result<Self> {
        let slot = match index {
            1 => &mut self.attribute1,
            2 => &mut self.attribute2,
            3 => &mut self.attribute3,
            4 => &mut self.attribute4,
            5 => &mut self.attribute5,
            other => return Err(TrackingError::InvalidAttributeIndex(other)),
        };
        *slot = Some(value.into());
        Ok(self)
    }

    /// Explicit revenue when set, otherwise `unit_price * quantity`.
    pub fn effective_revenue(&self) -> f64 {
        if self.revenue != 0.0 {
            self.revenue
        } else {
            self.unit_price * f64::from(self.quantity)
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            (keys::UNIT_PRICE, self.unit_price),
            (keys::REVENUE, self.revenue),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TrackingError::InvalidAmount { field, value });
            }
        }
        Ok(())
    }
}
