use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::error::Error;
use crate::models::{ReplaceAvailabilityRequest, StatusResponse, UpdateCapacityRequest};
use crate::routes::matches::AppState;
use crate::services::Store;

/// Configure enrollment-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/events/{event_id}/volunteers/{volunteer_id}",
        web::post().to(signup),
    )
    .route(
        "/events/{event_id}/volunteers/{volunteer_id}",
        web::delete().to(withdraw),
    )
    .route("/events/{event_id}/capacity", web::put().to(set_capacity))
    .route(
        "/volunteers/{volunteer_id}/availability",
        web::put().to(replace_availability),
    )
    .route(
        "/volunteers/{volunteer_id}/history",
        web::get().to(volunteer_history),
    );
}

/// POST /api/v1/events/{event_id}/volunteers/{volunteer_id}
async fn signup(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, Error> {
    let (event_id, volunteer_id) = path.into_inner();
    state.enrollment.signup(volunteer_id, event_id).await?;
    Ok(HttpResponse::Created().json(StatusResponse { success: true }))
}

/// DELETE /api/v1/events/{event_id}/volunteers/{volunteer_id}
async fn withdraw(
    state: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> Result<HttpResponse, Error> {
    let (event_id, volunteer_id) = path.into_inner();
    state.enrollment.withdraw(volunteer_id, event_id).await?;
    Ok(HttpResponse::Ok().json(StatusResponse { success: true }))
}

/// PUT /api/v1/events/{event_id}/capacity
///
/// The requesting admin must belong to the event's organization.
async fn set_capacity(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateCapacityRequest>,
) -> Result<HttpResponse, Error> {
    body.validate()
        .map_err(|e| Error::Validation(e.to_string()))?;

    let event_id = path.into_inner();

    let admin = state
        .store
        .get_admin(body.admin_id)
        .await?
        .ok_or_else(|| Error::not_found("admin", body.admin_id))?;

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

    state.enrollment.set_capacity(event_id, body.capacity).await?;
    Ok(HttpResponse::Ok().json(StatusResponse { success: true }))
}

/// PUT /api/v1/volunteers/{volunteer_id}/availability
///
/// Replaces the weekly slot set as a whole; the set is validated for
/// inverted and same-day-overlapping slots before any write.
async fn replace_availability(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ReplaceAvailabilityRequest>,
) -> Result<HttpResponse, Error> {
    let volunteer_id = path.into_inner();
    state
        .enrollment
        .replace_availability(volunteer_id, &body.slots)
        .await?;
    Ok(HttpResponse::Ok().json(StatusResponse { success: true }))
}

/// GET /api/v1/volunteers/{volunteer_id}/history
async fn volunteer_history(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, Error> {
    let volunteer_id = path.into_inner();

    if state.store.get_volunteer(volunteer_id).await?.is_none() {
        return Err(Error::not_found("volunteer", volunteer_id));
    }

    let past_events = state.store.past_events_for_volunteer(volunteer_id).await?;
    Ok(HttpResponse::Ok().json(past_events))
}
