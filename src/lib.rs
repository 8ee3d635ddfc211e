pub mod bookings;
pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod upstream;

use crate::bookings::AppState;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn app(state: Arc<AppState>) -> Router {
    let origins: Vec<HeaderValue> = config::ALLOWED_ORIGINS
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    // Credentials are allowed, so methods/headers must mirror the request
    // rather than use wildcards.
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .route("/api/bookings", get(bookings::search_bookings))
        .route("/api/bookings/:booking_ref", get(bookings::get_booking))
        .route(
            "/api/bookings/:booking_ref/vehicles/:vehicle_id/location",
            post(bookings::update_location),
        )
        .route(
            "/api/bookings/:booking_ref/driver",
            put(bookings::update_driver),
        )
        .route("/api/statuses", get(bookings::list_statuses))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
