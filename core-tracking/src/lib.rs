//! # Core Tracking Module
//!
//! Tracking parameter keys and the in-app event models of the Tune SDK.
//!
//! ## Overview
//!
//! - [`keys`]: frozen wire constants (parameter keys, predefined event names,
//!   HTTP constants, error keys, server domains)
//! - [`TrackingEvent`]: an in-app event with optional revenue, content and
//!   custom attributes, serialized to request parameters and a POST body
//! - [`EventItem`]: a line item within an event

pub mod error;
pub mod event;
pub mod event_item;
pub mod keys;

pub use error::{Result, TrackingError};
pub use event::{EventIdentifier, TrackingEvent};
pub use event_item::EventItem;
