//! Serialization tests for tracking events

use chrono::{TimeZone, Utc};
use core_tracking::{keys, EventItem, TrackingEvent, TrackingError};

#[test]
fn test_purchase_event_params() {
    let checkin = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let checkout = Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap();

    let event = TrackingEvent::with_name(keys::EVENT_RESERVATION)
        .unwrap()
        .revenue(199.5, keys::CURRENCY_USD)
        .ref_id("order-17")
        .content("hotel", "sf-001")
        .quantity(2)
        .dates(checkin, Some(checkout))
        .attribute(1, "summer")
        .unwrap()
        .attribute(5, "promo")
        .unwrap();

    let params = event.to_params().unwrap();

    assert_eq!(params[keys::SITE_EVENT_NAME], "reservation");
    assert_eq!(params[keys::REVENUE], "199.5");
    assert_eq!(params[keys::CURRENCY_CODE], "USD");
    assert_eq!(params[keys::REF_ID], "order-17");
    assert_eq!(params[keys::EVENT_CONTENT_TYPE], "hotel");
    assert_eq!(params[keys::EVENT_CONTENT_ID], "sf-001");
    assert_eq!(params[keys::EVENT_QUANTITY], "2");
    assert_eq!(params[keys::EVENT_DATE1], checkin.timestamp().to_string());
    assert_eq!(params[keys::EVENT_DATE2], checkout.timestamp().to_string());
    assert_eq!(params[keys::EVENT_ATTRIBUTE_SUB1], "summer");
    assert_eq!(params[keys::EVENT_ATTRIBUTE_SUB5], "promo");
    assert!(!params.contains_key(keys::EVENT_ATTRIBUTE_SUB2));
    assert!(!params.contains_key(keys::EVENT_RATING));
}

#[test]
fn test_items_travel_in_body() {
    let event = TrackingEvent::with_name(keys::EVENT_PURCHASE)
        .unwrap()
        .items([
            EventItem::new("coins", 0.99, 3),
            EventItem::new("gems", 4.99, 1).with_revenue(3.99),
        ]);

    let body = event.to_body().unwrap().unwrap();
    let data = body[keys::DATA].as_array().unwrap();

    assert_eq!(data.len(), 2);
    assert_eq!(data[0][keys::ITEM], "coins");
    assert_eq!(data[0][keys::QUANTITY], 3);
    assert_eq!(data[1][keys::REVENUE], 3.99);
}

#[test]
fn test_invalid_item_fails_serialization() {
    let event = TrackingEvent::with_name(keys::EVENT_PURCHASE)
        .unwrap()
        .item(EventItem::new("coins", f64::NAN, 1));

    assert!(matches!(
        event.to_params(),
        Err(TrackingError::InvalidAmount { .. })
    ));
}

#[test]
fn test_event_roundtrips_through_json() {
    let event = TrackingEvent::with_id(1001)
        .unwrap()
        .rating(4.5)
        .search_string("red shoes");

    let json = serde_json::to_string(&event).unwrap();
    let back: TrackingEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
