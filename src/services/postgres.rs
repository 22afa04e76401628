use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use std::time::Duration;

use crate::core::bounding_box;
use crate::error::Error;
use crate::models::{
    AvailabilitySlot, DayOfWeek, Event, EventUrgency, GeoPoint, Location, OrgAdmin, PastEvent,
    Volunteer,
};
use crate::services::store::{CapacityOutcome, EnrollOutcome, Store, WithdrawOutcome};

/// Postgres-backed store.
///
/// Candidate queries use a bounding-box pre-filter on the location
/// columns; the matcher applies the exact haversine cut. Enrollment
/// mutations run inside a transaction with conditional updates so the
/// capacity check and the counter change are one atomic step.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
    ) -> Result<Self, Error> {
        tracing::info!("connecting to PostgreSQL");
        Self::new(url, max_connections.unwrap_or(10), min_connections.unwrap_or(1)).await
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, Error> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }

    fn location_from_row(row: &sqlx::postgres::PgRow) -> Option<Location> {
        let id: Option<i64> = row.get("location_id");
        let latitude: Option<f64> = row.get("latitude");
        let longitude: Option<f64> = row.get("longitude");

        match (id, latitude, longitude) {
            (Some(id), Some(latitude), Some(longitude)) => Some(Location {
                id,
                address: row.get("address"),
                city: row.get("city"),
                state: row.get("state"),
                zip_code: row.get("zip_code"),
                country: row.get("country"),
                point: GeoPoint {
                    latitude,
                    longitude,
                },
            }),
            _ => None,
        }
    }

    async fn load_volunteer_skills(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<i64, Vec<String>>, Error> {
        let rows = sqlx::query(
            "SELECT volunteer_id, skill FROM volunteer_skill WHERE volunteer_id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_volunteer: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            by_volunteer
                .entry(row.get("volunteer_id"))
                .or_default()
                .push(row.get("skill"));
        }
        Ok(by_volunteer)
    }

    async fn load_volunteer_availability(
        &self,
        ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AvailabilitySlot>>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT volunteer_id, day_of_week, start_time, end_time
            FROM volunteer_weekly_schedule
            WHERE volunteer_id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_volunteer: HashMap<i64, Vec<AvailabilitySlot>> = HashMap::new();
        for row in rows {
            by_volunteer
                .entry(row.get("volunteer_id"))
                .or_default()
                .push(AvailabilitySlot {
                    day_of_week: row.get::<DayOfWeek, _>("day_of_week"),
                    start: row.get("start_time"),
                    end: row.get("end_time"),
                });
        }
        Ok(by_volunteer)
    }

    async fn load_event_skills(&self, ids: &[i64]) -> Result<HashMap<i64, Vec<String>>, Error> {
        let rows =
            sqlx::query("SELECT event_id, skill FROM event_skill WHERE event_id = ANY($1)")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;

        let mut by_event: HashMap<i64, Vec<String>> = HashMap::new();
        for row in rows {
            by_event
                .entry(row.get("event_id"))
                .or_default()
                .push(row.get("skill"));
        }
        Ok(by_event)
    }

    fn event_from_row(row: &sqlx::postgres::PgRow, needed_skills: Vec<String>) -> Event {
        Event {
            id: row.get("id"),
            org_id: row.get("org_id"),
            name: row.get("name"),
            description: row.get("description"),
            day: row.get("day"),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
            urgency: row.get::<EventUrgency, _>("urgency"),
            needed_skills,
            capacity: row.get("capacity"),
            assigned: row.get("assigned"),
            location: Location {
                id: row.get("location_id"),
                address: row.get("address"),
                city: row.get("city"),
                state: row.get("state"),
                zip_code: row.get("zip_code"),
                country: row.get("country"),
                point: GeoPoint {
                    latitude: row.get("latitude"),
                    longitude: row.get("longitude"),
                },
            },
        }
    }
}

impl Store for PostgresStore {
    async fn get_volunteer(&self, id: i64) -> Result<Option<Volunteer>, Error> {
        let row = sqlx::query(
            r#"
            SELECT v.id, v.email, v.first_name, v.last_name,
                   l.id AS location_id, l.address, l.city, l.state, l.zip_code,
                   l.country, l.latitude, l.longitude
            FROM volunteer v
            LEFT JOIN location l ON v.location_id = l.id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let ids = [id];
        let mut skills = self.load_volunteer_skills(&ids).await?;
        let mut availability = self.load_volunteer_availability(&ids).await?;

        Ok(Some(Volunteer {
            id,
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            skills: skills.remove(&id).unwrap_or_default(),
            availability: availability.remove(&id).unwrap_or_default(),
            location: Self::location_from_row(&row),
        }))
    }

    async fn get_event(&self, id: i64) -> Result<Option<Event>, Error> {
        let row = sqlx::query(
            r#"
            SELECT e.id, e.org_id, e.name, e.description, e.day, e.start_time, e.end_time,
                   e.urgency, e.capacity, e.assigned,
                   l.id AS location_id, l.address, l.city, l.state, l.zip_code,
                   l.country, l.latitude, l.longitude
            FROM event e
            JOIN location l ON e.location_id = l.id
            WHERE e.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut skills = self.load_event_skills(&[id]).await?;
        Ok(Some(Self::event_from_row(
            &row,
            skills.remove(&id).unwrap_or_default(),
        )))
    }

    async fn get_admin(&self, id: i64) -> Result<Option<OrgAdmin>, Error> {
        let row = sqlx::query(
            "SELECT id, email, first_name, last_name, org_id FROM organization_admin WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| OrgAdmin {
            id: row.get("id"),
            email: row.get("email"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            org_id: row.get("org_id"),
        }))
    }

    async fn volunteers_near(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<Volunteer>, Error> {
        let bbox = bounding_box(center, radius_km);

        let rows = sqlx::query(
            r#"
            SELECT v.id, v.email, v.first_name, v.last_name,
                   l.id AS location_id, l.address, l.city, l.state, l.zip_code,
                   l.country, l.latitude, l.longitude
            FROM volunteer v
            JOIN location l ON v.location_id = l.id
            WHERE l.latitude BETWEEN $1 AND $2
              AND l.longitude BETWEEN $3 AND $4
            ORDER BY v.id
            "#,
        )
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.get("id")).collect();
        let mut skills = self.load_volunteer_skills(&ids).await?;
        let mut availability = self.load_volunteer_availability(&ids).await?;

        let volunteers = rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                Volunteer {
                    id,
                    email: row.get("email"),
                    first_name: row.get("first_name"),
                    last_name: row.get("last_name"),
                    skills: skills.remove(&id).unwrap_or_default(),
                    availability: availability.remove(&id).unwrap_or_default(),
                    location: Self::location_from_row(row),
                }
            })
            .collect();

        tracing::debug!(
            "candidate pre-filter found {} volunteers within {:.1}km box",
            ids.len(),
            radius_km
        );

        Ok(volunteers)
    }

    async fn events_near(&self, center: GeoPoint, radius_km: f64) -> Result<Vec<Event>, Error> {
        let bbox = bounding_box(center, radius_km);

        let rows = sqlx::query(
            r#"
            SELECT e.id, e.org_id, e.name, e.description, e.day, e.start_time, e.end_time,
                   e.urgency, e.capacity, e.assigned,
                   l.id AS location_id, l.address, l.city, l.state, l.zip_code,
                   l.country, l.latitude, l.longitude
            FROM event e
            JOIN location l ON e.location_id = l.id
            WHERE l.latitude BETWEEN $1 AND $2
              AND l.longitude BETWEEN $3 AND $4
            ORDER BY e.id
            "#,
        )
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = rows.iter().map(|row| row.get("id")).collect();
        let mut skills = self.load_event_skills(&ids).await?;

        Ok(rows
            .iter()
            .map(|row| {
                let id: i64 = row.get("id");
                Self::event_from_row(row, skills.remove(&id).unwrap_or_default())
            })
            .collect())
    }

    async fn enroll(&self, volunteer_id: i64, event_id: i64) -> Result<EnrollOutcome, Error> {
        let mut tx = self.pool.begin().await?;

        let volunteer_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM volunteer WHERE id = $1)")
                .bind(volunteer_id)
                .fetch_one(&mut *tx)
                .await?;
        if !volunteer_exists {
            return Ok(EnrollOutcome::VolunteerMissing);
        }

        let event_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM event WHERE id = $1)")
                .bind(event_id)
                .fetch_one(&mut *tx)
                .await?;
        if !event_exists {
            return Ok(EnrollOutcome::EventMissing);
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO event_volunteer (event_id, volunteer_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(volunteer_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            return Ok(EnrollOutcome::AlreadyEnrolled);
        }

        // Conditional increment: the capacity check and the counter
        // change are one statement against the committed row, so two
        // racing signups cannot both pass a stale check.
        let updated = sqlx::query(
            "UPDATE event SET assigned = assigned + 1 WHERE id = $1 AND assigned < capacity",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(EnrollOutcome::CapacityFull);
        }

        tx.commit().await?;
        Ok(EnrollOutcome::Enrolled)
    }

    async fn withdraw(&self, volunteer_id: i64, event_id: i64) -> Result<WithdrawOutcome, Error> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query(
            "DELETE FROM event_volunteer WHERE event_id = $1 AND volunteer_id = $2",
        )
        .bind(event_id)
        .bind(volunteer_id)
        .execute(&mut *tx)
        .await?;

        if deleted.rows_affected() == 0 {
            return Ok(WithdrawOutcome::NotEnrolled);
        }

        let updated = sqlx::query(
            "UPDATE event SET assigned = assigned - 1 WHERE id = $1 AND assigned > 0",
        )
        .bind(event_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(WithdrawOutcome::CounterUnderflow);
        }

        tx.commit().await?;
        Ok(WithdrawOutcome::Withdrawn)
    }

    async fn set_capacity(&self, event_id: i64, capacity: i32) -> Result<CapacityOutcome, Error> {
        let updated = sqlx::query(
            "UPDATE event SET capacity = $2 WHERE id = $1 AND assigned <= $2",
        )
        .bind(event_id)
        .bind(capacity)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() > 0 {
            return Ok(CapacityOutcome::Updated);
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM event WHERE id = $1)")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            Ok(CapacityOutcome::BelowAssigned)
        } else {
            Ok(CapacityOutcome::EventMissing)
        }
    }

    async fn replace_availability(
        &self,
        volunteer_id: i64,
        slots: &[AvailabilitySlot],
    ) -> Result<bool, Error> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM volunteer WHERE id = $1)")
                .bind(volunteer_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Ok(false);
        }

        sqlx::query("DELETE FROM volunteer_weekly_schedule WHERE volunteer_id = $1")
            .bind(volunteer_id)
            .execute(&mut *tx)
            .await?;

        for slot in slots {
            sqlx::query(
                r#"
                INSERT INTO volunteer_weekly_schedule (volunteer_id, day_of_week, start_time, end_time)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(volunteer_id)
            .bind(slot.day_of_week)
            .bind(slot.start)
            .bind(slot.end)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn past_events_for_volunteer(
        &self,
        volunteer_id: i64,
    ) -> Result<Vec<PastEvent>, Error> {
        let rows = sqlx::query(
            r#"
            SELECT e.id, e.name, e.day, e.start_time, e.end_time, e.urgency,
                   l.address, l.city
            FROM event e
            JOIN event_volunteer ev ON e.id = ev.event_id
            JOIN location l ON e.location_id = l.id
            WHERE ev.volunteer_id = $1
              AND (e.day < CURRENT_DATE
                   OR (e.day = CURRENT_DATE AND e.end_time < CURRENT_TIME))
            ORDER BY e.day DESC, e.end_time DESC
            "#,
        )
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let start_time: chrono::NaiveTime = row.get("start_time");
                let end_time: chrono::NaiveTime = row.get("end_time");
                let seconds = end_time.signed_duration_since(start_time).num_seconds();
                let hours = ((seconds as f64 / 3600.0) * 100.0).round() / 100.0;

                PastEvent {
                    event_id: row.get("id"),
                    name: row.get("name"),
                    day: row.get("day"),
                    start_time,
                    end_time,
                    urgency: row.get::<EventUrgency, _>("urgency"),
                    hours,
                    address: row.get("address"),
                    city: row.get("city"),
                }
            })
            .collect())
    }
}
