//! Volmatch - volunteer-event matching and enrollment service
//!
//! The `core` module holds the pure scoring and ranking pipeline; the
//! `services` module layers the matching orchestration and the
//! capacity-safe enrollment state machine over a transactional store.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{bounding_box, haversine_km, MatchResult, Matcher};
pub use error::Error;
pub use models::{
    AvailabilitySlot, DayOfWeek, DistanceUnit, Event, EventUrgency, GeoPoint, Location,
    ScoredEvent, ScoredVolunteer, ScoringWeights, Volunteer,
};
pub use services::{EnrollmentManager, MatchingService, PostgresStore, Store};
