use crate::error::Error;
use crate::models::{
    AvailabilitySlot, Event, GeoPoint, OrgAdmin, PastEvent, Volunteer,
};

/// Outcome of an atomic enroll unit executed by the store.
///
/// The store reports what the committed state allowed; the enrollment
/// manager turns these into the typed error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    Enrolled,
    VolunteerMissing,
    EventMissing,
    AlreadyEnrolled,
    CapacityFull,
}

/// Outcome of an atomic withdraw unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Withdrawn,
    NotEnrolled,
    /// The assigned counter was already 0: a prior invariant violation,
    /// surfaced loudly instead of clamping
    CounterUnderflow,
}

/// Outcome of an atomic capacity change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityOutcome {
    Updated,
    EventMissing,
    BelowAssigned,
}

/// The transactional persistence collaborator.
///
/// The enroll/withdraw/set_capacity methods are atomic units: the
/// capacity check and the counter mutation are evaluated against the
/// current committed state as one step, so concurrent requests on the
/// same event serialize with respect to the capacity invariant. A plain
/// read-compare-write sequence is not a valid implementation.
#[allow(async_fn_in_trait)]
pub trait Store {
    async fn get_volunteer(&self, id: i64) -> Result<Option<Volunteer>, Error>;

    async fn get_event(&self, id: i64) -> Result<Option<Event>, Error>;

    async fn get_admin(&self, id: i64) -> Result<Option<OrgAdmin>, Error>;

    /// Volunteers whose location falls inside the radius pre-filter
    /// around `center`, with skills and availability loaded
    async fn volunteers_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Volunteer>, Error>;

    /// Events whose location falls inside the radius pre-filter
    async fn events_near(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<Event>, Error>;

    /// Create the assignment row and increment `assigned` by exactly 1,
    /// both or neither
    async fn enroll(&self, volunteer_id: i64, event_id: i64) -> Result<EnrollOutcome, Error>;

    /// Delete the assignment row and decrement `assigned` by exactly 1,
    /// both or neither
    async fn withdraw(&self, volunteer_id: i64, event_id: i64) -> Result<WithdrawOutcome, Error>;

    /// Set the event capacity, refusing values below the current
    /// `assigned` count
    async fn set_capacity(&self, event_id: i64, capacity: i32) -> Result<CapacityOutcome, Error>;

    /// Replace a volunteer's weekly slots as a whole set. Returns false
    /// when the volunteer does not exist.
    async fn replace_availability(
        &self,
        volunteer_id: i64,
        slots: &[AvailabilitySlot],
    ) -> Result<bool, Error>;

    /// Past events the volunteer worked, newest first
    async fn past_events_for_volunteer(&self, volunteer_id: i64)
        -> Result<Vec<PastEvent>, Error>;
}
