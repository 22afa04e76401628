use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// A geographic point in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// A postal address plus its geocoded point.
///
/// Every entity that has a location owns its own row; locations are
/// never shared between a volunteer and an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: i64,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: String,
    #[serde(flatten)]
    pub point: GeoPoint,
}

/// Day of week, ISO numbering (Monday=1 .. Sunday=7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "schedule_day", rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    /// ISO weekday number, Monday=1 through Sunday=7
    pub fn iso_number(self) -> u8 {
        match self {
            DayOfWeek::Monday => 1,
            DayOfWeek::Tuesday => 2,
            DayOfWeek::Wednesday => 3,
            DayOfWeek::Thursday => 4,
            DayOfWeek::Friday => 5,
            DayOfWeek::Saturday => 6,
            DayOfWeek::Sunday => 7,
        }
    }

    /// Derive the weekday of a calendar date (ISO convention)
    pub fn from_date(day: NaiveDate) -> Self {
        match day.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// One weekly availability window of a volunteer.
///
/// Slots for the same volunteer must not overlap on the same day;
/// the whole set is validated whenever it is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day_of_week: DayOfWeek,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Volunteer with the data the matching pipeline reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Volunteer {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Deduplicated, trimmed skill tags
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub availability: Vec<AvailabilitySlot>,
    pub location: Option<Location>,
}

/// Event urgency as defined by the owning organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "event_urgency", rename_all = "lowercase")]
pub enum EventUrgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Event with its time window, needed skills and capacity counters.
///
/// Invariant: `0 <= assigned <= capacity` at all times. The `assigned`
/// counter is mutated only through the enrollment manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub org_id: i64,
    pub name: String,
    pub description: String,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub urgency: EventUrgency,
    #[serde(default)]
    pub needed_skills: Vec<String>,
    pub capacity: i32,
    pub assigned: i32,
    pub location: Location,
}

impl Event {
    /// ISO weekday of the event date
    pub fn day_of_week(&self) -> DayOfWeek {
        DayOfWeek::from_date(self.day)
    }
}

/// Organization admin; `org_id` is None until the admin joins an org
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgAdmin {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub org_id: Option<i64>,
}

/// The join record representing one volunteer's enrollment in one event.
/// Its existence is the sole state of enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAssignment {
    pub event_id: i64,
    pub volunteer_id: i64,
}

/// A ranked volunteer produced by `match_volunteers_to_event`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredVolunteer {
    pub volunteer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Distance from the event, in the requested unit
    pub distance: f64,
    pub score: f64,
    pub matched_skills: Vec<String>,
}

/// A ranked event produced by `match_events_to_volunteer`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredEvent {
    pub event_id: i64,
    pub name: String,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub urgency: EventUrgency,
    /// Distance from the volunteer, in the requested unit
    pub distance: f64,
    pub score: f64,
    pub matched_skills: Vec<String>,
}

/// A past event a volunteer worked, with computed hours
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastEvent {
    pub event_id: i64,
    pub name: String,
    pub day: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub urgency: EventUrgency,
    pub hours: f64,
    pub address: String,
    pub city: Option<String>,
}

/// Distance unit for match queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    Km,
    #[default]
    Mile,
}

/// Kilometers per statute mile
pub const KM_PER_MILE: f64 = 1.609344;

impl DistanceUnit {
    /// Convert a value in this unit to kilometers
    pub fn to_km(self, value: f64) -> f64 {
        match self {
            DistanceUnit::Km => value,
            DistanceUnit::Mile => value * KM_PER_MILE,
        }
    }

    /// Convert a kilometer value into this unit
    pub fn from_km(self, km: f64) -> f64 {
        match self {
            DistanceUnit::Km => km,
            DistanceUnit::Mile => km / KM_PER_MILE,
        }
    }
}

/// Geospatial bounding box used as the candidate pre-filter
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Maximum points each scoring component can contribute.
///
/// The defaults give a total score range of [0, 10].
#[derive(Debug, Clone, Copy)]
pub struct ScoringWeights {
    pub skills: f64,
    pub schedule: f64,
    pub location: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            skills: 2.0,
            schedule: 4.0,
            location: 4.0,
        }
    }
}
