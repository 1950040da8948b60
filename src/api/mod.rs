use axum::{
    http::{header, Method},
    routing::get,
    Extension, Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ConnectionInfo;

pub mod admin;
pub mod appointments;
pub mod clinical_records;
pub mod owners;
pub mod pets;

pub fn router(db: DatabaseConnection, info: ConnectionInfo) -> Router {
    Router::new()
        .route(
            "/api/owners",
            get(owners::list_owners).post(owners::create_owner),
        )
        .route("/api/owners/search", get(owners::search_owners))
        .route(
            "/api/owners/:id",
            get(owners::get_owner)
                .put(owners::update_owner)
                .delete(owners::delete_owner),
        )
        .route("/api/pets", get(pets::list_pets).post(pets::create_pet))
        .route("/api/pets/search", get(pets::search_pets))
        .route(
            "/api/pets/:id",
            get(pets::get_pet).put(pets::update_pet).delete(pets::delete_pet),
        )
        .route(
            "/api/appointments",
            get(appointments::list_appointments).post(appointments::create_appointment),
        )
        .route(
            "/api/appointments/:id",
            get(appointments::get_appointment)
                .put(appointments::update_appointment)
                .delete(appointments::delete_appointment),
        )
        .route(
            "/api/clinical-records",
            get(clinical_records::list_records).post(clinical_records::create_record),
        )
        .route(
            "/api/clinical-records/by-pet/:pet_id",
            get(clinical_records::records_by_pet),
        )
        .route(
            "/api/clinical-records/:id",
            get(clinical_records::get_record)
                .put(clinical_records::update_record)
                .delete(clinical_records::delete_record),
        )
        .route("/api/status", get(admin::status))
        .route("/api/admin/info", get(admin::info))
        .route("/api/admin/tables/:name", get(admin::table_dump))
        .route("/api/admin/schema", get(admin::schema))
        .layer(Extension(db))
        .layer(Extension(info))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<axum::body::Body>| {
                    let path = request
                        .extensions()
                        .get::<axum::extract::MatchedPath>()
                        .map(|matched| matched.as_str().to_string())
                        .unwrap_or_else(|| request.uri().path().to_string());

                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %path,
                        status = tracing::field::Empty,
                        latency = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &tracing::Span| {
                        span.record("status", tracing::field::display(response.status()));
                        span.record("latency", tracing::field::debug(latency));
                        tracing::info!("request completed");
                    },
                ),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
                .allow_headers([header::CONTENT_TYPE]),
        )
}
