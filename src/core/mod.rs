// Core algorithm exports
pub mod distance;
pub mod matcher;
pub mod schedule;
pub mod scoring;

pub use distance::{bounding_box, haversine_km, within_bounding_box};
pub use matcher::{MatchResult, Matcher};
pub use schedule::{slot_overlaps_window, validate_weekly_slots};
pub use scoring::{distance_score, schedule_score, shared_skills, skill_score, total_score};
