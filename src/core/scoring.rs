use chrono::NaiveTime;
use std::collections::HashSet;

use crate::core::schedule::slot_overlaps_window;
use crate::models::{AvailabilitySlot, DayOfWeek, ScoringWeights};

/// Count of overlapping skills, capped at `max_weight`.
///
/// Rewards breadth of match without unbounded inflation from irrelevant
/// extra skills. An empty set on either side scores 0, never an error.
pub fn skill_score(candidate_skills: &[String], target_skills: &[String], max_weight: f64) -> f64 {
    if candidate_skills.is_empty() || target_skills.is_empty() {
        return 0.0;
    }

    let targets: HashSet<&str> = target_skills.iter().map(String::as_str).collect();
    let overlap = candidate_skills
        .iter()
        .map(String::as_str)
        .collect::<HashSet<_>>()
        .intersection(&targets)
        .count();

    (overlap as f64).min(max_weight)
}

/// Overlapping skills between candidate and target, for reporting
pub fn shared_skills(candidate_skills: &[String], target_skills: &[String]) -> Vec<String> {
    let targets: HashSet<&str> = target_skills.iter().map(String::as_str).collect();
    let mut shared: Vec<String> = candidate_skills
        .iter()
        .filter(|s| targets.contains(s.as_str()))
        .cloned()
        .collect();
    shared.sort();
    shared.dedup();
    shared
}

/// Binary schedule score: `max_weight` if any slot on the event's weekday
/// overlaps the event window, else 0. Any overlap, however small, grants
/// full credit.
pub fn schedule_score(
    slots: &[AvailabilitySlot],
    event_day: DayOfWeek,
    event_start: NaiveTime,
    event_end: NaiveTime,
    max_weight: f64,
) -> f64 {
    let overlaps = slots
        .iter()
        .any(|slot| slot_overlaps_window(slot, event_day, event_start, event_end));

    if overlaps {
        max_weight
    } else {
        0.0
    }
}

/// Linear distance decay: full weight at the center, 0 at `max_distance`.
///
/// Candidates beyond `max_distance` are filtered out before scoring, so
/// the ratio is normally in [0, 1]; the clamps guard rounding.
pub fn distance_score(distance: f64, max_distance: f64, max_weight: f64) -> f64 {
    if max_distance <= 0.0 {
        return 0.0;
    }

    let percentage = (max_distance - distance) / max_distance;

    if percentage <= 0.0 {
        0.0
    } else if percentage >= 1.0 {
        max_weight
    } else {
        percentage * max_weight
    }
}

/// Weighted total of the three components for one candidate
#[allow(clippy::too_many_arguments)]
pub fn total_score(
    candidate_skills: &[String],
    target_skills: &[String],
    slots: &[AvailabilitySlot],
    event_day: DayOfWeek,
    event_start: NaiveTime,
    event_end: NaiveTime,
    distance: f64,
    max_distance: f64,
    weights: &ScoringWeights,
) -> f64 {
    skill_score(candidate_skills, target_skills, weights.skills)
        + schedule_score(slots, event_day, event_start, event_end, weights.schedule)
        + distance_score(distance, max_distance, weights.location)
}
