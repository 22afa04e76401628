// End-to-end matching tests over the service layer and the store seam.

mod common;

use std::sync::Arc;

use common::{event, slot, time, volunteer, MemoryStore};
use volmatch::core::haversine_km;
use volmatch::error::Error;
use volmatch::models::{DayOfWeek, DistanceUnit, KM_PER_MILE};
use volmatch::services::MatchingService;
use volmatch::Matcher;

const HOUSTON_LAT: f64 = 29.7604;
const HOUSTON_LON: f64 = -95.3698;

fn service(store: Arc<MemoryStore>) -> MatchingService<MemoryStore> {
    MatchingService::new(store, Matcher::default())
}

#[tokio::test]
async fn full_match_scores_ten() {
    let store = Arc::new(MemoryStore::new());
    // Thursday 05:30-07:00 sits inside the event's 04:30-07:30 window
    let v = volunteer(
        1,
        &["Cooking", "Cleaning"],
        vec![slot(DayOfWeek::Thursday, time(5, 30), time(7, 0))],
        HOUSTON_LAT,
        HOUSTON_LON,
    );
    store.insert_volunteer(v).await;

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    assert_eq!(result.total_candidates, 1);
    assert_eq!(result.matches.len(), 1);
    let top = &result.matches[0];
    assert_eq!(top.volunteer_id, 1);
    assert!((top.score - 10.0).abs() < 1e-9);
    assert!(top.distance < 1e-6);
    assert_eq!(top.matched_skills, vec!["Cleaning", "Cooking"]);
}

#[tokio::test]
async fn no_shared_skills_scores_eight() {
    let store = Arc::new(MemoryStore::new());
    let v = volunteer(
        1,
        &["Gardening"],
        vec![slot(DayOfWeek::Thursday, time(4, 0), time(8, 0))],
        HOUSTON_LAT,
        HOUSTON_LON,
    );
    store.insert_volunteer(v).await;

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    let top = &result.matches[0];
    assert!((top.score - 8.0).abs() < 1e-9);
    assert!(top.matched_skills.is_empty());
}

#[tokio::test]
async fn distance_decays_linearly_within_radius() {
    let store = Arc::new(MemoryStore::new());
    // roughly 10 km north of the event
    let v = volunteer(
        1,
        &[],
        vec![slot(DayOfWeek::Thursday, time(4, 0), time(8, 0))],
        HOUSTON_LAT + 0.09,
        HOUSTON_LON,
    );
    let v_point = v.location.as_ref().unwrap().point;
    store.insert_volunteer(v).await;

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let d = haversine_km(e.location.point, v_point);
    assert!(d > 5.0 && d < 25.0);

    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    let top = &result.matches[0];
    let expected = 4.0 + (25.0 - d) / 25.0 * 4.0;
    assert!((top.score - expected).abs() < 1e-6);
    assert!((top.distance - d).abs() < 1e-6);
}

#[tokio::test]
async fn candidates_beyond_radius_are_excluded() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_volunteer(volunteer(
            1,
            &["Cooking"],
            vec![slot(DayOfWeek::Thursday, time(4, 0), time(8, 0))],
            HOUSTON_LAT,
            HOUSTON_LON,
        ))
        .await;
    // about 55 km away, well past a 25 km radius
    store
        .insert_volunteer(volunteer(
            2,
            &["Cooking"],
            vec![slot(DayOfWeek::Thursday, time(4, 0), time(8, 0))],
            HOUSTON_LAT + 0.5,
            HOUSTON_LON,
        ))
        .await;

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].volunteer_id, 1);
}

#[tokio::test]
async fn equal_scores_break_ties_by_id_ascending() {
    let store = Arc::new(MemoryStore::new());
    for id in [42, 7, 19] {
        store
            .insert_volunteer(volunteer(
                id,
                &["Cooking", "Cleaning"],
                vec![slot(DayOfWeek::Thursday, time(4, 30), time(7, 30))],
                HOUSTON_LAT,
                HOUSTON_LON,
            ))
            .await;
    }

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    let ids: Vec<i64> = result.matches.iter().map(|m| m.volunteer_id).collect();
    assert_eq!(ids, vec![7, 19, 42]);
}

#[tokio::test]
async fn repeated_queries_return_identical_rankings() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_volunteer(volunteer(
            1,
            &["Cooking"],
            vec![slot(DayOfWeek::Thursday, time(5, 0), time(7, 0))],
            HOUSTON_LAT + 0.05,
            HOUSTON_LON,
        ))
        .await;
    store
        .insert_volunteer(volunteer(
            2,
            &["Cleaning", "Cooking"],
            vec![slot(DayOfWeek::Monday, time(9, 0), time(17, 0))],
            HOUSTON_LAT,
            HOUSTON_LON + 0.1,
        ))
        .await;
    store
        .insert_volunteer(volunteer(
            3,
            &[],
            vec![slot(DayOfWeek::Thursday, time(4, 0), time(8, 0))],
            HOUSTON_LAT - 0.02,
            HOUSTON_LON,
        ))
        .await;

    let svc = service(store);
    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);

    let first = svc
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();
    let second = svc
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    let ids_a: Vec<i64> = first.matches.iter().map(|m| m.volunteer_id).collect();
    let ids_b: Vec<i64> = second.matches.iter().map(|m| m.volunteer_id).collect();
    assert_eq!(ids_a, ids_b);
    for (a, b) in first.matches.iter().zip(second.matches.iter()) {
        assert_eq!(a.score, b.score);
    }
}

#[tokio::test]
async fn zero_skill_volunteer_ranks_low_but_is_included() {
    let store = Arc::new(MemoryStore::new());
    store
        .insert_volunteer(volunteer(1, &[], vec![], HOUSTON_LAT, HOUSTON_LON))
        .await;

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    assert_eq!(result.matches.len(), 1);
    // only the distance component contributes
    assert!((result.matches[0].score - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn distances_are_reported_in_the_requested_unit() {
    let store = Arc::new(MemoryStore::new());
    let v = volunteer(
        1,
        &["Cooking"],
        vec![slot(DayOfWeek::Thursday, time(5, 0), time(7, 0))],
        HOUSTON_LAT + 0.09,
        HOUSTON_LON,
    );
    let v_point = v.location.as_ref().unwrap().point;
    store.insert_volunteer(v).await;

    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);
    let d_km = haversine_km(e.location.point, v_point);

    let result = service(store)
        .match_volunteers_to_event(&e, 25.0, DistanceUnit::Mile)
        .await
        .unwrap();

    assert!((result.matches[0].distance - d_km / KM_PER_MILE).abs() < 1e-6);
}

#[tokio::test]
async fn events_rank_for_a_volunteer() {
    let store = Arc::new(MemoryStore::new());
    let v = volunteer(
        1,
        &["Cooking", "Cleaning"],
        vec![slot(DayOfWeek::Thursday, time(5, 30), time(7, 0))],
        HOUSTON_LAT,
        HOUSTON_LON,
    );
    store.insert_volunteer(v.clone()).await;
    store.insert_event(event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON)).await;
    store
        .insert_event(event(11, 1, 5, HOUSTON_LAT + 0.09, HOUSTON_LON))
        .await;

    let result = service(store)
        .match_events_to_volunteer(&v, 25.0, DistanceUnit::Km)
        .await
        .unwrap();

    assert_eq!(result.total_candidates, 2);
    assert_eq!(result.matches[0].event_id, 10);
    assert!((result.matches[0].score - 10.0).abs() < 1e-9);
    assert!(result.matches[1].score < result.matches[0].score);
}

#[tokio::test]
async fn volunteer_without_location_cannot_match_events() {
    let store = Arc::new(MemoryStore::new());
    let mut v = volunteer(1, &["Cooking"], vec![], HOUSTON_LAT, HOUSTON_LON);
    v.location = None;
    store.insert_volunteer(v.clone()).await;

    let err = service(store)
        .match_events_to_volunteer(&v, 25.0, DistanceUnit::Km)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn non_positive_radius_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let e = event(10, 1, 5, HOUSTON_LAT, HOUSTON_LON);

    let err = service(store)
        .match_volunteers_to_event(&e, 0.0, DistanceUnit::Km)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
