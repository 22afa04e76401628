// Shared test fixtures: an in-memory Store double and entity builders.
//
// The double executes enroll/withdraw/set_capacity while holding a
// single lock, giving the same serialization the Postgres store gets
// from its conditional UPDATE statements.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

use chrono::{NaiveDate, NaiveTime, Utc};
use volmatch::core::{bounding_box, within_bounding_box};
use volmatch::error::Error;
use volmatch::models::{
    AvailabilitySlot, DayOfWeek, Event, EventUrgency, GeoPoint, Location, OrgAdmin, PastEvent,
    Volunteer,
};
use volmatch::services::store::{CapacityOutcome, EnrollOutcome, Store, WithdrawOutcome};

#[derive(Default)]
struct Inner {
    volunteers: HashMap<i64, Volunteer>,
    events: HashMap<i64, Event>,
    admins: HashMap<i64, OrgAdmin>,
    assignments: HashSet<(i64, i64)>,
}

/// In-memory store double
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_volunteer(&self, volunteer: Volunteer) {
        self.inner
            .lock()
            .await
            .volunteers
            .insert(volunteer.id, volunteer);
    }

    pub async fn insert_event(&self, event: Event) {
        self.inner.lock().await.events.insert(event.id, event);
    }

    pub async fn insert_admin(&self, admin: OrgAdmin) {
        self.inner.lock().await.admins.insert(admin.id, admin);
    }

    pub async fn assigned_count(&self, event_id: i64) -> i32 {
        self.inner.lock().await.events[&event_id].assigned
    }

    pub async fn is_enrolled(&self, event_id: i64, volunteer_id: i64) -> bool {
        self.inner
            .lock()
            .await
            .assignments
            .contains(&(event_id, volunteer_id))
    }
}

impl Store for MemoryStore {
    async fn get_volunteer(&self, id: i64) -> Result<Option<Volunteer>, Error> {
        Ok(self.inner.lock().await.volunteers.get(&id).cloned())
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, Error> {
        Ok(self.inner.lock().await.events.get(&id).cloned())
    }

    async fn get_admin(&self, id: i64) -> Result<Option<OrgAdmin>, Error> {
        Ok(self.inner.lock().await.admins.get(&id).cloned())
    }

    async fn volunteers_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Volunteer>, Error> {
        let bbox = bounding_box(center, radius_km);
        let mut found: Vec<Volunteer> = self
            .inner
            .lock()
            .await
            .volunteers
            .values()
            .filter(|v| {
                v.location
                    .as_ref()
                    .is_some_and(|l| within_bounding_box(l.point, &bbox))
            })
            .cloned()
            .collect();
        found.sort_by_key(|v| v.id);
        Ok(found)
    }

    async fn events_near(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<Event>, Error> {
        let bbox = bounding_box(center, radius_km);
        let mut found: Vec<Event> = self
            .inner
            .lock()
            .await
            .events
            .values()
            .filter(|e| within_bounding_box(e.location.point, &bbox))
            .cloned()
            .collect();
        found.sort_by_key(|e| e.id);
        Ok(found)
    }

    async fn enroll(&self, volunteer_id: i64, event_id: i64) -> Result<EnrollOutcome, Error> {
        let mut inner = self.inner.lock().await;

        if !inner.volunteers.contains_key(&volunteer_id) {
            return Ok(EnrollOutcome::VolunteerMissing);
        }
        if !inner.events.contains_key(&event_id) {
            return Ok(EnrollOutcome::EventMissing);
        }
        if inner.assignments.contains(&(event_id, volunteer_id)) {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        let event = inner.events.get_mut(&event_id).unwrap();
        if event.assigned >= event.capacity {
            return Ok(EnrollOutcome::CapacityFull);
        }

        event.assigned += 1;
        inner.assignments.insert((event_id, volunteer_id));
        Ok(EnrollOutcome::Enrolled)
    }

    async fn withdraw(&self, volunteer_id: i64, event_id: i64) -> Result<WithdrawOutcome, Error> {
        let mut inner = self.inner.lock().await;

        if !inner.assignments.remove(&(event_id, volunteer_id)) {
            return Ok(WithdrawOutcome::NotEnrolled);
        }

        let event = inner.events.get_mut(&event_id).unwrap();
        if event.assigned <= 0 {
            inner.assignments.insert((event_id, volunteer_id));
            return Ok(WithdrawOutcome::CounterUnderflow);
        }

        event.assigned -= 1;
        Ok(WithdrawOutcome::Withdrawn)
    }

    async fn set_capacity(&self, event_id: i64, capacity: i32) -> Result<CapacityOutcome, Error> {
        let mut inner = self.inner.lock().await;

        let Some(event) = inner.events.get_mut(&event_id) else {
            return Ok(CapacityOutcome::EventMissing);
        };
        if event.assigned > capacity {
            return Ok(CapacityOutcome::BelowAssigned);
        }

        event.capacity = capacity;
        Ok(CapacityOutcome::Updated)
    }

    async fn replace_availability(
        &self,
        volunteer_id: i64,
        slots: &[AvailabilitySlot],
    ) -> Result<bool, Error> {
        let mut inner = self.inner.lock().await;
        match inner.volunteers.get_mut(&volunteer_id) {
            Some(volunteer) => {
                volunteer.availability = slots.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn past_events_for_volunteer(
        &self,
        volunteer_id: i64,
    ) -> Result<Vec<PastEvent>, Error> {
        let inner = self.inner.lock().await;
        let today = Utc::now().date_naive();

        let mut past: Vec<PastEvent> = inner
            .assignments
            .iter()
            .filter(|(_, v)| *v == volunteer_id)
            .filter_map(|(event_id, _)| inner.events.get(event_id))
            .filter(|e| e.day < today)
            .map(|e| {
                let seconds = e.end_time.signed_duration_since(e.start_time).num_seconds();
                PastEvent {
                    event_id: e.id,
                    name: e.name.clone(),
                    day: e.day,
                    start_time: e.start_time,
                    end_time: e.end_time,
                    urgency: e.urgency,
                    hours: ((seconds as f64 / 3600.0) * 100.0).round() / 100.0,
                    address: e.location.address.clone(),
                    city: e.location.city.clone(),
                }
            })
            .collect();
        past.sort_by(|a, b| b.day.cmp(&a.day));
        Ok(past)
    }
}

// --- entity builders ---

pub fn location(id: i64, lat: f64, lon: f64) -> Location {
    Location {
        id,
        address: "123 Main St".to_string(),
        city: Some("Houston".to_string()),
        state: Some("TX".to_string()),
        zip_code: Some("77001".to_string()),
        country: "USA".to_string(),
        point: GeoPoint {
            latitude: lat,
            longitude: lon,
        },
    }
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn slot(day: DayOfWeek, start: NaiveTime, end: NaiveTime) -> AvailabilitySlot {
    AvailabilitySlot {
        day_of_week: day,
        start,
        end,
    }
}

pub fn volunteer(id: i64, skills: &[&str], slots: Vec<AvailabilitySlot>, lat: f64, lon: f64) -> Volunteer {
    Volunteer {
        id,
        email: format!("vol{}@example.com", id),
        first_name: format!("Vol{}", id),
        last_name: "Tester".to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        availability: slots,
        location: Some(location(1000 + id, lat, lon)),
    }
}

/// Thursday event, 04:30-07:30, needing Cooking and Cleaning
pub fn event(id: i64, org_id: i64, capacity: i32, lat: f64, lon: f64) -> Event {
    Event {
        id,
        org_id,
        name: format!("Event {}", id),
        description: "Community service shift".to_string(),
        // 2025-03-06 is a Thursday
        day: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
        start_time: time(4, 30),
        end_time: time(7, 30),
        urgency: EventUrgency::Medium,
        needed_skills: vec!["Cooking".to_string(), "Cleaning".to_string()],
        capacity,
        assigned: 0,
        location: location(2000 + id, lat, lon),
    }
}

pub fn admin(id: i64, org_id: Option<i64>) -> OrgAdmin {
    OrgAdmin {
        id,
        email: format!("admin{}@example.com", id),
        first_name: format!("Admin{}", id),
        last_name: "Tester".to_string(),
        org_id,
    }
}
