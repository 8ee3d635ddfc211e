use crate::classify::{classify, success_reason, ReasonCode};
use crate::error::{ProxyError, Result};
use crate::model::{coordinates_in_range, DriverUpdateRequest, LocationUpdateRequest, TripStatus};
use crate::upstream::{SupplierClient, SupplierResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

pub struct AppState {
    pub supplier: SupplierClient,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(rename = "dateFrom")]
    pub date_from: String,
    #[serde(rename = "dateTo")]
    pub date_to: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

#[derive(Debug, Serialize)]
pub struct SearchPage {
    pub bookings: Vec<Value>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub current_page: u32,
    pub has_next_page: bool,
}

impl SearchPage {
    fn empty(page: u32) -> Self {
        SearchPage {
            bookings: Vec::new(),
            pagination: Pagination {
                current_page: page,
                has_next_page: false,
            },
        }
    }
}

/// `GET /api/bookings?dateFrom&dateTo&page`
///
/// Date strings are opaque to the proxy and forwarded verbatim; the
/// supplier owns their format.
pub async fn search_bookings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchPage>> {
    if params.page == 0 {
        return Err(ProxyError::Validation("page must be >= 1".to_string()));
    }

    info!(
        date_from = %params.date_from,
        date_to = %params.date_to,
        page = params.page,
        "booking search"
    );

    let response = state
        .supplier
        .get(&[
            "bookings",
            "search",
            "since",
            &params.date_from,
            "until",
            &params.date_to,
            "page",
            &params.page.to_string(),
        ])
        .await?;

    Ok(Json(shape_search_page(&response, params.page)?))
}

/// Normalizes the supplier's three search response shapes into one page.
/// A 404 here means the caller paged past the end, not an error.
fn shape_search_page(response: &SupplierResponse, page: u32) -> Result<SearchPage> {
    if response.status == reqwest::StatusCode::NO_CONTENT
        || response.status == reqwest::StatusCode::NOT_FOUND
    {
        return Ok(SearchPage::empty(page));
    }

    if !response.status.is_success() {
        return Err(ProxyError::Upstream {
            status: response.status.as_u16(),
            body: response.body.clone(),
        });
    }

    match response.json() {
        None => Ok(SearchPage::empty(page)),
        Some(Value::Array(bookings)) => Ok(SearchPage {
            bookings,
            pagination: Pagination {
                current_page: page,
                has_next_page: false,
            },
        }),
        Some(Value::Object(mut map)) => {
            let bookings = match map.remove("bookings") {
                Some(Value::Array(list)) => list,
                _ => Vec::new(),
            };
            let has_next_page = map.get("more").map(is_truthy).unwrap_or(false);
            Ok(SearchPage {
                bookings,
                pagination: Pagination {
                    current_page: page,
                    has_next_page,
                },
            })
        }
        Some(_) => Err(ProxyError::Upstream {
            status: response.status.as_u16(),
            body: response.body.clone(),
        }),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// `GET /api/bookings/{booking_ref}` — supplier JSON passed through as-is.
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_ref): Path<String>,
) -> Result<Response> {
    info!(%booking_ref, "booking detail lookup");

    let response = state.supplier.get(&["bookings", &booking_ref]).await?;
    passthrough(response)
}

#[derive(Debug, Serialize)]
pub struct LocationUpdateOutcome {
    pub success: bool,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub reason: ReasonCode,
}

/// `POST /api/bookings/{booking_ref}/vehicles/{vehicle_id}/location`
///
/// The supplier's verdict is relayed with its own status code so the
/// frontend can tell a business rejection apart from a gateway failure.
pub async fn update_location(
    State(state): State<Arc<AppState>>,
    Path((booking_ref, vehicle_id)): Path<(String, String)>,
    Json(request): Json<LocationUpdateRequest>,
) -> Result<Response> {
    if request.status.parse::<TripStatus>().is_err() {
        let valid = TripStatus::ALL.map(|s| s.as_str()).join(", ");
        return Err(ProxyError::Validation(format!(
            "Invalid status. Valid statuses are: [{valid}]"
        )));
    }

    if !coordinates_in_range(request.lat, request.lng) {
        return Err(ProxyError::Validation("Invalid lat/lng range".to_string()));
    }

    info!(%booking_ref, %vehicle_id, status = %request.status, "vehicle location update");

    let payload = json!({
        "timestamp": utc_timestamp(),
        "location": { "lat": request.lat, "lng": request.lng },
        "status": request.status,
    });

    let response = state
        .supplier
        .post(
            &["bookings", &booking_ref, "vehicles", &vehicle_id, "location"],
            &payload,
        )
        .await?;

    let outcome = shape_location_outcome(&response);
    Ok((proxy_status(response.status), Json(outcome)).into_response())
}

fn shape_location_outcome(response: &SupplierResponse) -> LocationUpdateOutcome {
    if response.status.is_success() {
        LocationUpdateOutcome {
            success: true,
            status_code: response.status.as_u16(),
            data: Some(response.json().unwrap_or_else(|| json!({}))),
            message: None,
            reason: success_reason(response.status),
        }
    } else {
        LocationUpdateOutcome {
            success: false,
            status_code: response.status.as_u16(),
            data: None,
            message: Some(response.body.clone()),
            reason: classify(response.status, &response.body),
        }
    }
}

/// UTC, second precision, RFC 3339 with an explicit +00:00 offset.
fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// `PUT /api/bookings/{booking_ref}/driver`
pub async fn update_driver(
    State(state): State<Arc<AppState>>,
    Path(booking_ref): Path<String>,
    Json(request): Json<DriverUpdateRequest>,
) -> Result<Response> {
    let registration = request.vehicle.registration.trim();
    if registration.is_empty() {
        return Err(ProxyError::Validation(
            "Vehicle registration cannot be empty".to_string(),
        ));
    }

    info!(%booking_ref, %registration, "driver/vehicle assignment");

    let response = state
        .supplier
        .put(&["bookings", &booking_ref, "vehicles", registration], &request)
        .await?;

    passthrough(response)
}

/// `GET /api/statuses` — fixed list, no upstream call.
pub async fn list_statuses() -> Json<Vec<&'static str>> {
    Json(TripStatus::ALL.iter().map(|s| s.as_str()).collect())
}

fn passthrough(response: SupplierResponse) -> Result<Response> {
    if !response.status.is_success() {
        return Err(ProxyError::Upstream {
            status: response.status.as_u16(),
            body: response.body,
        });
    }

    let body = response.json().unwrap_or_else(|| json!({}));
    Ok(Json(body).into_response())
}

/// Supplier status codes cross the reqwest/axum http-version boundary
/// by value.
fn proxy_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier_response(status: u16, body: &str) -> SupplierResponse {
        SupplierResponse {
            status: reqwest::StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_search_no_content_is_empty_page() {
        let page = shape_search_page(&supplier_response(204, ""), 3).unwrap();
        assert!(page.bookings.is_empty());
        assert_eq!(page.pagination.current_page, 3);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_search_not_found_is_empty_page() {
        let page = shape_search_page(&supplier_response(404, "no bookings"), 7).unwrap();
        assert!(page.bookings.is_empty());
        assert_eq!(page.pagination.current_page, 7);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_search_mapping_extracts_bookings_and_more() {
        let body = r#"{"bookings":[{"ref":"A"},{"ref":"B"}],"more":true}"#;
        let page = shape_search_page(&supplier_response(200, body), 1).unwrap();
        assert_eq!(page.bookings.len(), 2);
        assert!(page.pagination.has_next_page);
    }

    #[test]
    fn test_search_mapping_defaults() {
        let page = shape_search_page(&supplier_response(200, "{}"), 1).unwrap();
        assert!(page.bookings.is_empty());
        assert!(!page.pagination.has_next_page);

        let body = r#"{"bookings":[],"more":false}"#;
        let page = shape_search_page(&supplier_response(200, body), 1).unwrap();
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_search_sequence_is_full_page() {
        let body = r#"[{"ref":"A"}]"#;
        let page = shape_search_page(&supplier_response(200, body), 2).unwrap();
        assert_eq!(page.bookings.len(), 1);
        assert!(!page.pagination.has_next_page);
    }

    #[test]
    fn test_search_other_failure_is_gateway_error() {
        let result = shape_search_page(&supplier_response(500, "boom"), 1);
        match result {
            Err(ProxyError::Upstream { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn test_location_outcome_success_parses_body() {
        let outcome = shape_location_outcome(&supplier_response(200, r#"{"ok":true}"#));
        assert!(outcome.success);
        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.data, Some(json!({"ok": true})));
        assert_eq!(outcome.reason, ReasonCode::Ok);
        assert!(outcome.message.is_none());
    }

    #[test]
    fn test_location_outcome_empty_success_body_defaults() {
        let outcome = shape_location_outcome(&supplier_response(202, ""));
        assert!(outcome.success);
        assert_eq!(outcome.data, Some(json!({})));
        assert_eq!(outcome.reason, ReasonCode::BookingDataProvidedTooEarly);
    }

    #[test]
    fn test_location_outcome_failure_is_classified() {
        let outcome = shape_location_outcome(&supplier_response(403, "Booking has been cancelled"));
        assert!(!outcome.success);
        assert_eq!(outcome.status_code, 403);
        assert_eq!(outcome.message.as_deref(), Some("Booking has been cancelled"));
        assert_eq!(outcome.reason, ReasonCode::Cancelled);
        assert!(outcome.data.is_none());
    }

    #[test]
    fn test_timestamp_is_utc_second_precision() {
        let stamp = utc_timestamp();
        assert!(stamp.ends_with("+00:00"), "unexpected offset: {stamp}");
        assert_eq!(stamp.len(), "2025-01-15T10:30:00+00:00".len());

        let parsed = chrono::DateTime::parse_from_rfc3339(&stamp).unwrap();
        assert_eq!(parsed.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_is_truthy_mirrors_supplier_semantics() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(null)));
    }
}
