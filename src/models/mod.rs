// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    AvailabilitySlot, BoundingBox, DayOfWeek, DistanceUnit, Event, EventAssignment,
    EventUrgency, GeoPoint, Location, OrgAdmin, PastEvent, ScoredEvent, ScoredVolunteer,
    ScoringWeights, Volunteer, KM_PER_MILE,
};
pub use requests::{MatchQuery, ReplaceAvailabilityRequest, UpdateCapacityRequest};
pub use responses::{ErrorResponse, HealthResponse, MatchListResponse, StatusResponse};
