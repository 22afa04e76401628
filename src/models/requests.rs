use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{AvailabilitySlot, DistanceUnit};

/// Query parameters for the match endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchQuery {
    /// Requesting admin, required when matching volunteers to an event
    pub admin_id: Option<i64>,
    #[serde(default = "default_max_distance")]
    #[validate(range(min = 0.1, max = 500.0))]
    pub max_distance: f64,
    #[serde(default)]
    pub unit: DistanceUnit,
}

fn default_max_distance() -> f64 {
    25.0
}

/// Request to change an event's capacity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCapacityRequest {
    pub admin_id: i64,
    #[validate(range(min = 0))]
    pub capacity: i32,
}

/// Request to replace a volunteer's weekly availability as a whole set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceAvailabilityRequest {
    pub slots: Vec<AvailabilitySlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_query_defaults() {
        let query: MatchQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.max_distance, 25.0);
        assert_eq!(query.unit, DistanceUnit::Mile);
        assert!(query.admin_id.is_none());
    }

    #[test]
    fn test_match_query_rejects_zero_radius() {
        let query: MatchQuery =
            serde_json::from_str(r#"{"max_distance": 0.0, "unit": "km"}"#).unwrap();
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_capacity_request_rejects_negative() {
        let req = UpdateCapacityRequest {
            admin_id: 1,
            capacity: -1,
        };
        assert!(req.validate().is_err());
    }
}
