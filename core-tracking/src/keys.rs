//! Tracking parameter keys, predefined event names and server constants.
//!
//! Every value here is part of the wire contract with the attribution
//! engine and must not change between releases.

// ============================================================================
// Request parameter keys
// ============================================================================

pub const ACTION: &str = "action";
pub const ADVERTISER_ID: &str = "advertiser_id";
pub const APP_AD_TRACKING: &str = "app_ad_tracking";
pub const APP_NAME: &str = "app_name";
pub const APP_VERSION: &str = "app_version";
pub const BLUETOOTH_STATE: &str = "bluetooth_state";
pub const BYPASS_THROTTLING: &str = "bypass_throttling";
pub const CAMPAIGN_ID: &str = "campaign_id";
pub const CONVERSION_USER_AGENT: &str = "conversion_user_agent";
pub const COUNTRY_CODE: &str = "country_code";
pub const CURRENCY_CODE: &str = "currency_code";
pub const DATA: &str = "data";
pub const DEBUG: &str = "debug";
pub const DEEPLINK_CHECKED: &str = "deeplink_checked";
pub const DEVICE_BRAND: &str = "device_brand";
pub const DEVICE_CARRIER: &str = "device_carrier";
pub const DEVICE_CPUTYPE: &str = "device_cpu_type";
pub const DEVICE_CPUSUBTYPE: &str = "device_cpu_subtype";
pub const DEVICE_FORM: &str = "device_form";
pub const DEVICE_MODEL: &str = "device_model";
pub const EXISTING_USER: &str = "existing_user";
pub const FACEBOOK_USER_ID: &str = "facebook_user_id";
pub const FB_COOKIE_ID: &str = "fb_cookie_id";
pub const GEOFENCE_NAME: &str = "geofence_name";
pub const GOOGLE_USER_ID: &str = "google_user_id";
pub const INSDATE: &str = "insdate";
pub const IAD_ATTRIBUTION: &str = "iad_attribution";
pub const IAD_IMPRESSION_DATE: &str = "impression_datetime";
pub const INSTALL_LOG_ID: &str = "install_log_id";
pub const INSTALL_RECEIPT: &str = "install_receipt";
pub const IOS_AD_TRACKING: &str = "ios_ad_tracking";
pub const IOS_IFA: &str = "ios_ifa";
pub const IOS_IFV: &str = "ios_ifv";
pub const IOS_PURCHASE_STATUS: &str = "ios_purchase_status";
pub const IS_PAYING_USER: &str = "is_paying_user";
pub const LAST_OPEN_LOG_ID: &str = "last_open_log_id";
pub const LANGUAGE: &str = "language";
pub const LOCATION_AUTH_STATUS: &str = "location_auth_status";
pub const LOCATION_HORIZONTAL_ACCURACY: &str = "location_horizontal_accuracy";
pub const LOCATION_TIMESTAMP: &str = "location_timestamp";
pub const LOCATION_VERTICAL_ACCURACY: &str = "location_vertical_accuracy";
pub const LOG_ID: &str = "log_id";
pub const MAT_ID: &str = "mat_id";
pub const OPEN_LOG_ID: &str = "open_log_id";
pub const OS_ID: &str = "os_id";
pub const OS_JAILBROKE: &str = "os_jailbroke";
pub const OS_VERSION: &str = "os_version";
pub const PACKAGE_NAME: &str = "package_name";
pub const POST_CONVERSION: &str = "post_conversion";
pub const REDIRECT_URL: &str = "redirect_url";
pub const REF_ID: &str = "advertiser_ref_id";
pub const REFERRAL_SOURCE: &str = "referral_source";
pub const REFERRAL_URL: &str = "referral_url";
pub const RESPONSE_FORMAT: &str = "response_format";
pub const RETRY_COUNT: &str = "sdk_retry_attempt";
pub const REVENUE: &str = "revenue";
pub const SCREEN_DENSITY: &str = "screen_density";
pub const SCREEN_SIZE: &str = "screen_layout_size";
pub const SDK: &str = "sdk";
pub const SDK_PLUGIN: &str = "sdk_plugin";
pub const SESSION_DATETIME: &str = "session_datetime";
pub const SITE_EVENT_ID: &str = "site_event_id";
pub const SITE_EVENT_NAME: &str = "site_event_name";
pub const SITE_EVENT_TYPE: &str = "site_event_type";
pub const SITE_ID: &str = "site_id";
pub const SKIP_DUP: &str = "skip_dup";
pub const STAGING: &str = "staging";
pub const STORE_RECEIPT: &str = "store_receipt";
pub const SYSTEM_DATE: &str = "system_date";
pub const TRACKING_ID: &str = "tracking_id";
pub const TRANSACTION_ID: &str = "transaction_id";
pub const TWITTER_USER_ID: &str = "twitter_user_id";
pub const UPDATE_LOG_ID: &str = "update_log_id";
pub const USER_EMAIL_MD5: &str = "user_email_md5";
pub const USER_EMAIL_SHA1: &str = "user_email_sha1";
pub const USER_EMAIL_SHA256: &str = "user_email_sha256";
pub const USER_ID: &str = "user_id";
pub const USER_NAME_MD5: &str = "user_name_md5";
pub const USER_NAME_SHA1: &str = "user_name_sha1";
pub const USER_NAME_SHA256: &str = "user_name_sha256";
pub const USER_PHONE_MD5: &str = "user_phone_md5";
pub const USER_PHONE_SHA1: &str = "user_phone_sha1";
pub const USER_PHONE_SHA256: &str = "user_phone_sha256";
pub const VER: &str = "ver";

// Event detail keys
pub const EVENT_CONTENT_TYPE: &str = "content_type";
pub const EVENT_CONTENT_ID: &str = "content_id";
pub const EVENT_LEVEL: &str = "level";
pub const EVENT_QUANTITY: &str = "quantity";
pub const EVENT_SEARCH_STRING: &str = "search_string";
pub const EVENT_RATING: &str = "rating";
pub const EVENT_DATE1: &str = "date1";
pub const EVENT_DATE2: &str = "date2";
pub const EVENT_ATTRIBUTE_SUB1: &str = "attribute_sub1";
pub const EVENT_ATTRIBUTE_SUB2: &str = "attribute_sub2";
pub const EVENT_ATTRIBUTE_SUB3: &str = "attribute_sub3";
pub const EVENT_ATTRIBUTE_SUB4: &str = "attribute_sub4";
pub const EVENT_ATTRIBUTE_SUB5: &str = "attribute_sub5";

/// Event attribute keys indexed by attribute number minus one.
pub const EVENT_ATTRIBUTE_SUBS: [&str; 5] = [
    EVENT_ATTRIBUTE_SUB1,
    EVENT_ATTRIBUTE_SUB2,
    EVENT_ATTRIBUTE_SUB3,
    EVENT_ATTRIBUTE_SUB4,
    EVENT_ATTRIBUTE_SUB5,
];

// Event item keys
pub const ITEM: &str = "item";
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";

// Targeting keys
pub const AGE: &str = "age";
pub const GENDER: &str = "gender";
pub const LATITUDE: &str = "latitude";
pub const LONGITUDE: &str = "longitude";
pub const ALTITUDE: &str = "altitude";

// Carrier keys
pub const CARRIER_COUNTRY_CODE: &str = "mobile_country_code";
pub const CARRIER_COUNTRY_CODE_ISO: &str = "country_code";
pub const CARRIER_NETWORK_CODE: &str = "mobile_network_code";

// Attribution sub-parameters
pub const ADVERTISER_SUB_AD: &str = "advertiser_sub_ad";
pub const ADVERTISER_SUB_ADGROUP: &str = "advertiser_sub_adgroup";
pub const ADVERTISER_SUB_CAMPAIGN: &str = "advertiser_sub_campaign";
pub const ADVERTISER_SUB_KEYWORD: &str = "advertiser_sub_keyword";
pub const ADVERTISER_SUB_PUBLISHER: &str = "advertiser_sub_publisher";
pub const ADVERTISER_SUB_SITE: &str = "advertiser_sub_site";
pub const AGENCY_ID: &str = "agency_id";
pub const OFFER_ID: &str = "offer_id";
pub const PRELOAD_DATA: &str = "attr_set";
pub const PUBLISHER_ADVERTISER_ID: &str = "publisher_advertiser_id";
pub const PUBLISHER_ID: &str = "publisher_id";
pub const PUBLISHER_REF_ID: &str = "publisher_ref_id";
pub const PUBLISHER_SUB_AD: &str = "publisher_sub_ad";
pub const PUBLISHER_SUB_ADGROUP: &str = "publisher_sub_adgroup";
pub const PUBLISHER_SUB_CAMPAIGN: &str = "publisher_sub_campaign";
pub const PUBLISHER_SUB_KEYWORD: &str = "publisher_sub_keyword";
pub const PUBLISHER_SUB_PUBLISHER: &str = "publisher_sub_publisher";
pub const PUBLISHER_SUB_SITE: &str = "publisher_sub_site";
pub const PUBLISHER_SUB1: &str = "publisher_sub1";
pub const PUBLISHER_SUB2: &str = "publisher_sub2";
pub const PUBLISHER_SUB3: &str = "publisher_sub3";
pub const PUBLISHER_SUB4: &str = "publisher_sub4";
pub const PUBLISHER_SUB5: &str = "publisher_sub5";

// ============================================================================
// Constant values
// ============================================================================

pub const CURRENCY_USD: &str = "USD";
pub const DEVICE_FORM_WEARABLE: &str = "wearable";
pub const GUID_EMPTY: &str = "00000000-0000-0000-0000-000000000000";
pub const PLATFORM_IOS: &str = "ios";
pub const RESPONSE_FORMAT_JSON: &str = "json";
pub const DEFAULT_LOCALE_IDENTIFIER: &str = "en_US";
pub const DEFAULT_TIMEZONE: &str = "UTC";

// ============================================================================
// Event names
// ============================================================================

// Lifecycle events sent by the SDK itself
pub const EVENT_INSTALL: &str = "install";
pub const EVENT_UPDATE: &str = "update";
pub const EVENT_OPEN: &str = "open";
pub const EVENT_CLICK: &str = "click";
pub const EVENT_CLOSE: &str = "close";
pub const EVENT_CONVERSION: &str = "conversion";
pub const EVENT_GEOFENCE: &str = "geofence";

// Predefined in-app events
pub const EVENT_ACHIEVEMENT_UNLOCKED: &str = "achievement_unlocked";
pub const EVENT_ADD_TO_CART: &str = "add_to_cart";
pub const EVENT_ADD_TO_WISHLIST: &str = "add_to_wishlist";
pub const EVENT_ADDED_PAYMENT_INFO: &str = "added_payment_info";
pub const EVENT_CHECKOUT_INITIATED: &str = "checkout_initiated";
pub const EVENT_CONTENT_VIEW: &str = "content_view";
pub const EVENT_INVITE: &str = "invite";
pub const EVENT_LEVEL_ACHIEVED: &str = "level_achieved";
pub const EVENT_LOGIN: &str = "login";
pub const EVENT_PURCHASE: &str = "purchase";
pub const EVENT_RATED: &str = "rated";
pub const EVENT_REGISTRATION: &str = "registration";
pub const EVENT_RESERVATION: &str = "reservation";
pub const EVENT_SEARCH: &str = "search";
pub const EVENT_SESSION: &str = "session";
pub const EVENT_SHARE: &str = "share";
pub const EVENT_SPENT_CREDITS: &str = "spent_credits";
pub const EVENT_TUTORIAL_COMPLETE: &str = "tutorial_complete";

/// All predefined in-app event names.
pub const PREDEFINED_EVENTS: &[&str] = &[
    EVENT_ACHIEVEMENT_UNLOCKED,
    EVENT_ADD_TO_CART,
    EVENT_ADD_TO_WISHLIST,
    EVENT_ADDED_PAYMENT_INFO,
    EVENT_CHECKOUT_INITIATED,
    EVENT_CONTENT_VIEW,
    EVENT_INVITE,
    EVENT_LEVEL_ACHIEVED,
    EVENT_LOGIN,
    EVENT_PURCHASE,
    EVENT_RATED,
    EVENT_REGISTRATION,
    EVENT_RESERVATION,
    EVENT_SEARCH,
    EVENT_SESSION,
    EVENT_SHARE,
    EVENT_SPENT_CREDITS,
    EVENT_TUTORIAL_COMPLETE,
];

// ============================================================================
// HTTP
// ============================================================================

pub const HTTP_METHOD_POST: &str = "POST";
pub const HTTP_CONTENT_LENGTH: &str = "Content-Length";
pub const HTTP_CONTENT_TYPE: &str = "Content-Type";
pub const HTTP_CONTENT_TYPE_APPLICATION_JSON: &str = "application/json";

// ============================================================================
// Errors
// ============================================================================

pub const ERROR_DOMAIN: &str = "com.tune";
pub const ERROR_SERVER_ERROR: &str = "tune_server_error";
pub const ERROR_ADVERTISER_ID_MISSING: &str = "tune_advertiser_id_missing";
pub const ERROR_CONVERSION_KEY_MISSING: &str = "tune_conversion_key_missing";
pub const ERROR_CONVERSION_KEY_INVALID: &str = "tune_conversion_key_invalid";
pub const ERROR_INVALID_PARAMETERS: &str = "tune_invalid_parameters";
pub const ERROR_APP_TO_APP_FAILURE: &str = "tune_app_to_app_failure";
pub const ERROR_NETWORK_NOT_REACHABLE: &str = "tune_network_not_reachable";
pub const ERROR_OPEN_EVENT: &str = "tune_open_event";
pub const ERROR_CLOSE_EVENT: &str = "tune_close_event";

// ============================================================================
// Servers
// ============================================================================

pub const SERVER_DOMAIN_COOKIE_TRACKING: &str = "launch1.co";
pub const SERVER_DOMAIN_REGULAR_TRACKING_PROD: &str = "engine.mobileapptracking.com";
pub const SERVER_DOMAIN_REGULAR_TRACKING_PROD_DEBUG: &str = "debug.engine.mobileapptracking.com";
pub const SERVER_DOMAIN_REGULAR_TRACKING_STAGE: &str = "sdk.stage.engine.mobileapptracking.com";
pub const SERVER_PATH_TRACKING_ENGINE: &str = "serve";
pub const SERVER_DOMAIN_DEEPLINK: &str = "deeplink.mobileapptracking.com";
pub const SERVER_PATH_DEEPLINK: &str = "v1/link.txt";

/// Tracking engine host for the given mode.
pub fn tracking_server_domain(debug: bool, staging: bool) -> &'static str {
    match (staging, debug) {
        (true, _) => SERVER_DOMAIN_REGULAR_TRACKING_STAGE,
        (false, true) => SERVER_DOMAIN_REGULAR_TRACKING_PROD_DEBUG,
        (false, false) => SERVER_DOMAIN_REGULAR_TRACKING_PROD,
    }
}
