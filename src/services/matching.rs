use std::sync::Arc;

use crate::core::{MatchResult, Matcher};
use crate::error::Error;
use crate::models::{DistanceUnit, Event, ScoredEvent, ScoredVolunteer, Volunteer};
use crate::services::store::Store;

/// Read-only orchestration over the candidate store and the matcher.
///
/// Results are a snapshot of persistence-layer state as of the read;
/// they carry no lock or reservation, so a recommended match can fill
/// up before signup is attempted. Signup re-validates independently.
pub struct MatchingService<S> {
    store: Arc<S>,
    matcher: Matcher,
}

impl<S> Clone for MatchingService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            matcher: self.matcher.clone(),
        }
    }
}

impl<S: Store> MatchingService<S> {
    pub fn new(store: Arc<S>, matcher: Matcher) -> Self {
        Self { store, matcher }
    }

    /// Rank volunteers within `max_distance` of the event, best first.
    ///
    /// Authorization (admin belongs to the event's organization) is the
    /// caller's responsibility; the event passed here is assumed valid.
    pub async fn match_volunteers_to_event(
        &self,
        event: &Event,
        max_distance: f64,
        unit: DistanceUnit,
    ) -> Result<MatchResult<ScoredVolunteer>, Error> {
        if max_distance <= 0.0 {
            return Err(Error::Validation("max_distance must be positive".into()));
        }

        let candidates = self
            .store
            .volunteers_near(event.location.point, unit.to_km(max_distance))
            .await?;

        let result = self
            .matcher
            .rank_volunteers(event, candidates, max_distance, unit);

        tracing::info!(
            "matched {} of {} candidate volunteers to event {}",
            result.matches.len(),
            result.total_candidates,
            event.id
        );

        Ok(result)
    }

    /// Rank events within `max_distance` of the volunteer, best first.
    ///
    /// Fails with a validation error when the volunteer has no location:
    /// the radius filter has no center to filter from.
    pub async fn match_events_to_volunteer(
        &self,
        volunteer: &Volunteer,
        max_distance: f64,
        unit: DistanceUnit,
    ) -> Result<MatchResult<ScoredEvent>, Error> {
        if max_distance <= 0.0 {
            return Err(Error::Validation("max_distance must be positive".into()));
        }

        let center = volunteer
            .location
            .as_ref()
            .ok_or_else(|| {
                Error::Validation("volunteer must have a location set to match events".into())
            })?
            .point;

        let candidates = self
            .store
            .events_near(center, unit.to_km(max_distance))
            .await?;

        let result = self
            .matcher
            .rank_events(volunteer, candidates, max_distance, unit)?;

        tracing::info!(
            "matched {} of {} candidate events to volunteer {}",
            result.matches.len(),
            result.total_candidates,
            volunteer.id
        );

        Ok(result)
    }
}
