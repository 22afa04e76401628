use crate::core::distance::haversine_km;
use crate::core::scoring::{shared_skills, total_score};
use crate::error::Error;
use crate::models::{
    DistanceUnit, Event, ScoredEvent, ScoredVolunteer, ScoringWeights, Volunteer,
};

/// Result of a ranking pass
#[derive(Debug)]
pub struct MatchResult<T> {
    pub matches: Vec<T>,
    /// Candidates considered before the radius cut
    pub total_candidates: usize,
}

/// Ranks already-fetched candidates against a match center.
///
/// Read-only: radius filter first (candidates outside `max_distance` are
/// excluded, not scored as 0), then the three-component score, then a
/// deterministic ordering of score descending with id ascending as the
/// tie-break.
#[derive(Debug, Clone)]
pub struct Matcher {
    weights: ScoringWeights,
}

impl Matcher {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn with_default_weights() -> Self {
        Self {
            weights: ScoringWeights::default(),
        }
    }

    /// Rank volunteers against an event, closest-fit first.
    ///
    /// Candidates without a location cannot be inside the radius and are
    /// skipped; they were filtered upstream anyway.
    pub fn rank_volunteers(
        &self,
        event: &Event,
        candidates: Vec<Volunteer>,
        max_distance: f64,
        unit: DistanceUnit,
    ) -> MatchResult<ScoredVolunteer> {
        let total_candidates = candidates.len();
        let event_day = event.day_of_week();

        let mut matches: Vec<ScoredVolunteer> = candidates
            .into_iter()
            .filter_map(|volunteer| {
                let location = volunteer.location.as_ref()?;
                let distance = unit.from_km(haversine_km(event.location.point, location.point));
                if distance > max_distance {
                    return None;
                }

                let score = total_score(
                    &volunteer.skills,
                    &event.needed_skills,
                    &volunteer.availability,
                    event_day,
                    event.start_time,
                    event.end_time,
                    distance,
                    max_distance,
                    &self.weights,
                );

                Some(ScoredVolunteer {
                    volunteer_id: volunteer.id,
                    first_name: volunteer.first_name,
                    last_name: volunteer.last_name,
                    email: volunteer.email,
                    distance,
                    score,
                    matched_skills: shared_skills(&volunteer.skills, &event.needed_skills),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.volunteer_id.cmp(&b.volunteer_id))
        });

        MatchResult {
            matches,
            total_candidates,
        }
    }

    /// Rank events against a volunteer, symmetric to `rank_volunteers`.
    ///
    /// The volunteer must have a location: without a center there is
    /// nothing to filter a radius from, so this is a validation failure
    /// rather than a zero score.
    pub fn rank_events(
        &self,
        volunteer: &Volunteer,
        candidates: Vec<Event>,
        max_distance: f64,
        unit: DistanceUnit,
    ) -> Result<MatchResult<ScoredEvent>, Error> {
        let center = volunteer
            .location
            .as_ref()
            .ok_or_else(|| {
                Error::Validation("volunteer must have a location set to match events".into())
            })?
            .point;

        let total_candidates = candidates.len();

        let mut matches: Vec<ScoredEvent> = candidates
            .into_iter()
            .filter_map(|event| {
                let distance = unit.from_km(haversine_km(center, event.location.point));
                if distance > max_distance {
                    return None;
                }

                let score = total_score(
                    &volunteer.skills,
                    &event.needed_skills,
                    &volunteer.availability,
                    event.day_of_week(),
                    event.start_time,
                    event.end_time,
                    distance,
                    max_distance,
                    &self.weights,
                );

                Some(ScoredEvent {
                    event_id: event.id,
                    name: event.name,
                    day: event.day,
                    start_time: event.start_time,
                    end_time: event.end_time,
                    urgency: event.urgency,
                    distance,
                    score,
                    matched_skills: shared_skills(&volunteer.skills, &event.needed_skills),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.event_id.cmp(&b.event_id))
        });

        Ok(MatchResult {
            matches,
            total_candidates,
        })
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_weights()
    }
}
