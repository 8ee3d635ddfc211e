use reqwest::StatusCode;
use serde::Serialize;

/// Closed set of reason codes reported back to the frontend after a
/// vehicle location update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    Ok,
    BookingDataProvidedTooEarly,
    Cancelled,
    BookingTravelledTooLongAgo,
    BookingTravelsTooLongInTheFuture,
    InformationNotExpectedForThisBookingType,
    TooManyDistinctVehicleIdentifiersForThisBooking,
    AttemptToDeAllocateAVehicleIdentifierThatDoesNotExist,
    NotFound,
    UnknownError,
}

/// Ordered (substring, code) pairs matched against the supplier's error
/// text. First match wins, so the order here is load-bearing: a body
/// mentioning both a cancellation and a stale travel date classifies as
/// CANCELLED.
const CLASSIFICATION_TABLE: &[(&str, ReasonCode)] = &[
    ("cancelled", ReasonCode::Cancelled),
    ("travelled too long ago", ReasonCode::BookingTravelledTooLongAgo),
    (
        "travels too long in the future",
        ReasonCode::BookingTravelsTooLongInTheFuture,
    ),
    (
        "not expected for this booking type",
        ReasonCode::InformationNotExpectedForThisBookingType,
    ),
    (
        "too many distinct vehicle",
        ReasonCode::TooManyDistinctVehicleIdentifiersForThisBooking,
    ),
    (
        "de-allocate a vehicle identifier that does not exist",
        ReasonCode::AttemptToDeAllocateAVehicleIdentifierThatDoesNotExist,
    ),
];

/// Classifies a supplier rejection from its status code and body text.
pub fn classify(status: StatusCode, body: &str) -> ReasonCode {
    let haystack = body.to_lowercase();
    for (pattern, code) in CLASSIFICATION_TABLE {
        if haystack.contains(pattern) {
            return *code;
        }
    }
    if status == StatusCode::NOT_FOUND {
        ReasonCode::NotFound
    } else {
        ReasonCode::UnknownError
    }
}

/// Reason reported alongside an accepted update. The supplier answers
/// 202 when location data arrives before the booking's travel window.
pub fn success_reason(status: StatusCode) -> ReasonCode {
    if status == StatusCode::ACCEPTED {
        ReasonCode::BookingDataProvidedTooEarly
    } else {
        ReasonCode::Ok
    }
}
