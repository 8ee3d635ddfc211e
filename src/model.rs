use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The supplier's closed set of trip statuses, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripStatus {
    BeforePickup,
    WaitingForCustomer,
    AfterPickup,
    Completed,
    NoShow,
}

impl TripStatus {
    pub const ALL: [TripStatus; 5] = [
        TripStatus::BeforePickup,
        TripStatus::WaitingForCustomer,
        TripStatus::AfterPickup,
        TripStatus::Completed,
        TripStatus::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::BeforePickup => "BEFORE_PICKUP",
            TripStatus::WaitingForCustomer => "WAITING_FOR_CUSTOMER",
            TripStatus::AfterPickup => "AFTER_PICKUP",
            TripStatus::Completed => "COMPLETED",
            TripStatus::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct UnknownStatus;

impl FromStr for TripStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TripStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or(UnknownStatus)
    }
}

/// Canonical geographic bounds, inclusive at the edges.
pub fn coordinates_in_range(lat: f64, lng: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lng)
}

#[derive(Debug, Deserialize)]
pub struct LocationUpdateRequest {
    pub lat: f64,
    pub lng: f64,
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Driver {
    pub name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(rename = "preferredContactMethod")]
    pub preferred_contact_method: String,
    #[serde(rename = "contactMethods")]
    pub contact_methods: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Vehicle {
    pub brand: String,
    pub model: String,
    pub color: String,
    pub description: String,
    pub registration: String,
}

/// Combined payload forwarded verbatim to the supplier on driver assignment.
#[derive(Debug, Serialize, Deserialize)]
pub struct DriverUpdateRequest {
    pub driver: Driver,
    pub vehicle: Vehicle,
}
