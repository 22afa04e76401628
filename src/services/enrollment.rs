use std::sync::Arc;

use crate::error::Error;
use crate::models::AvailabilitySlot;
use crate::services::store::{CapacityOutcome, EnrollOutcome, Store, WithdrawOutcome};

/// State machine for one (volunteer, event) pairing.
///
/// Two states: Unenrolled (no assignment row) and Enrolled (row exists,
/// the event's `assigned` counter includes the volunteer). This manager
/// is the only path that mutates `assigned`; the store executes the
/// transitions as atomic units and this layer turns outcomes into the
/// typed error taxonomy.
pub struct EnrollmentManager<S> {
    store: Arc<S>,
}

impl<S> Clone for EnrollmentManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: Store> EnrollmentManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Enroll a volunteer in an event.
    ///
    /// Not idempotent by design: a second signup for an already-enrolled
    /// pair is a Conflict, surfacing double submissions to the caller
    /// instead of masking them.
    pub async fn signup(&self, volunteer_id: i64, event_id: i64) -> Result<(), Error> {
        match self.store.enroll(volunteer_id, event_id).await? {
            EnrollOutcome::Enrolled => {
                tracing::info!("volunteer {} signed up to event {}", volunteer_id, event_id);
                Ok(())
            }
            EnrollOutcome::VolunteerMissing => Err(Error::not_found("volunteer", volunteer_id)),
            EnrollOutcome::EventMissing => Err(Error::not_found("event", event_id)),
            EnrollOutcome::AlreadyEnrolled => Err(Error::Conflict(
                "volunteer already signed up to event".into(),
            )),
            EnrollOutcome::CapacityFull => {
                Err(Error::Validation("event is at full capacity".into()))
            }
        }
    }

    /// Withdraw a volunteer from an event.
    pub async fn withdraw(&self, volunteer_id: i64, event_id: i64) -> Result<(), Error> {
        match self.store.withdraw(volunteer_id, event_id).await? {
            WithdrawOutcome::Withdrawn => {
                tracing::info!(
                    "volunteer {} withdrew from event {}",
                    volunteer_id,
                    event_id
                );
                Ok(())
            }
            WithdrawOutcome::NotEnrolled => Err(Error::not_found(
                "enrollment",
                format!("volunteer {} in event {}", volunteer_id, event_id),
            )),
            // A decrement that would go negative means a prior invariant
            // violation; fail loudly rather than clamp silently.
            WithdrawOutcome::CounterUnderflow => {
                tracing::error!(
                    "assigned counter underflow on event {} (volunteer {})",
                    event_id,
                    volunteer_id
                );
                Err(Error::Validation(
                    "event already has 0 assigned volunteers".into(),
                ))
            }
        }
    }

    /// Change an event's capacity. Shrinking below the current assigned
    /// count is refused.
    pub async fn set_capacity(&self, event_id: i64, capacity: i32) -> Result<(), Error> {
        if capacity < 0 {
            return Err(Error::Validation("capacity cannot be negative".into()));
        }

        match self.store.set_capacity(event_id, capacity).await? {
            CapacityOutcome::Updated => {
                tracing::info!("event {} capacity set to {}", event_id, capacity);
                Ok(())
            }
            CapacityOutcome::EventMissing => Err(Error::not_found("event", event_id)),
            CapacityOutcome::BelowAssigned => Err(Error::Validation(
                "capacity cannot be less than currently assigned volunteers".into(),
            )),
        }
    }

    /// Replace a volunteer's weekly availability as a whole set,
    /// validating the set first.
    pub async fn replace_availability(
        &self,
        volunteer_id: i64,
        slots: &[AvailabilitySlot],
    ) -> Result<(), Error> {
        crate::core::validate_weekly_slots(slots)?;

        if self.store.replace_availability(volunteer_id, slots).await? {
            Ok(())
        } else {
            Err(Error::not_found("volunteer", volunteer_id))
        }
    }
}
