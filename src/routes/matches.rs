use actix_web::{web, HttpResponse};
use std::sync::Arc;
use validator::Validate;

use crate::error::Error;
use crate::models::{HealthResponse, MatchListResponse, MatchQuery};
use crate::services::{EnrollmentManager, MatchingService, PostgresStore, Store};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostgresStore>,
    pub matching: MatchingService<PostgresStore>,
    pub enrollment: EnrollmentManager<PostgresStore>,
}

/// Configure match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route(
            "/events/{event_id}/matches",
            web::get().to(match_volunteers_to_event),
        )
        .route(
            "/volunteers/{volunteer_id}/matches",
            web::get().to(match_events_to_volunteer),
        );
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let db_healthy = state.store.health_check().await.unwrap_or(false);
    let status = if db_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Rank volunteers for an event.
///
/// GET /api/v1/events/{event_id}/matches?admin_id=&max_distance=&unit=
///
/// The requesting admin must exist and belong to the event's
/// organization; that precondition is checked here, at the caller,
/// before the matching service runs.
async fn match_volunteers_to_event(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<MatchQuery>,
) -> Result<HttpResponse, Error> {
    query
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let event_id = path.into_inner();
    let admin_id = query
        .admin_id
        .ok_or_else(|| Error::Validation("admin_id is required".into()))?;

    let admin = state
        .store
        .get_admin(admin_id)
        .await?
        .ok_or_else(|| Error::not_found("admin", admin_id))?;

    let event = state
        .store
        .get_event(event_id)
        .await?
        .ok_or_else(|| Error::not_found("event", event_id))?;

    if admin.org_id != Some(event.org_id) {
        return Err(Error::Authorization(
            "admin is not part of the event's organization".into(),
        ));
    }

    let result = state
        .matching
        .match_volunteers_to_event(&event, query.max_distance, query.unit)
        .await?;

    Ok(HttpResponse::Ok().json(MatchListResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    }))
}

/// Rank events for a volunteer.
///
/// GET /api/v1/volunteers/{volunteer_id}/matches?max_distance=&unit=
async fn match_events_to_volunteer(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    query: web::Query<MatchQuery>,
) -> Result<HttpResponse, Error> {
    query
        .validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let volunteer_id = path.into_inner();
    let volunteer = state
        .store
        .get_volunteer(volunteer_id)
        .await?
        .ok_or_else(|| Error::not_found("volunteer", volunteer_id))?;

    let result = state
        .matching
        .match_events_to_volunteer(&volunteer, query.max_distance, query.unit)
        .await?;

    Ok(HttpResponse::Ok().json(MatchListResponse {
        matches: result.matches,
        total_candidates: result.total_candidates,
    }))
}
