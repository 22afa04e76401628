use chrono::NaiveTime;

use crate::error::Error;
use crate::models::{AvailabilitySlot, DayOfWeek};

/// Standard interval-overlap test: a window `[start, end]` overlaps the
/// slot when `slot.start <= end && slot.end >= start`.
#[inline]
pub fn slot_overlaps_window(
    slot: &AvailabilitySlot,
    day: DayOfWeek,
    start: NaiveTime,
    end: NaiveTime,
) -> bool {
    slot.day_of_week == day && slot.start <= end && slot.end >= start
}

/// Validate a volunteer's whole weekly slot set before it replaces the
/// stored one.
///
/// Rules: every slot has `start < end`, and no two slots on the same day
/// overlap. Touching endpoints (one slot ending exactly when another
/// begins) are allowed.
pub fn validate_weekly_slots(slots: &[AvailabilitySlot]) -> Result<(), Error> {
    for slot in slots {
        if slot.start >= slot.end {
            return Err(Error::Validation(format!(
                "availability slot on {:?} must start before it ends ({} >= {})",
                slot.day_of_week, slot.start, slot.end
            )));
        }
    }

    for (i, a) in slots.iter().enumerate() {
        for b in &slots[i + 1..] {
            if a.day_of_week == b.day_of_week && a.start < b.end && b.start < a.end {
                return Err(Error::Validation(format!(
                    "overlapping availability slots on {:?}: {}-{} and {}-{}",
                    a.day_of_week, a.start, a.end, b.start, b.end
                )));
            }
        }
    }

    Ok(())
}
