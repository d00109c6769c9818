//! Trip persistence: Postgres when a database is configured, otherwise an
//! in-process map.

use anyhow::Context;
use dashmap::DashMap;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::config::Settings;
use crate::db::models::{NewTrip, Trip};
use crate::error::Result;

const TRIP_COLUMNS: &str = "id, trip_name, start_date_of_journey, end_date_of_journey, \
     name_of_hotels, places_visited, total_cost, trip_type, experience, image, \
     short_description, featured, created_at";

pub enum TripStore {
    Postgres(PgPool),
    Memory(DashMap<Uuid, Trip>),
}

impl TripStore {
    pub fn memory() -> Self {
        TripStore::Memory(DashMap::new())
    }

    /// Connect and migrate when `DATABASE_URL` is set, else fall back to memory.
    pub async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let Some(url) = settings.database_url.as_deref() else {
            log::warn!("DATABASE_URL not set; trips are kept in memory");
            return Ok(Self::memory());
        };

        let pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .connect(url)
            .await
            .context("connecting to Postgres")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("running migrations")?;
        log::info!("connected to Postgres; migrations applied");

        Ok(TripStore::Postgres(pool))
    }

    /// Persist a new trip and return it with its id.
    pub async fn insert(&self, new: NewTrip) -> Result<Trip> {
        let trip = new.into_trip();
        match self {
            TripStore::Postgres(db) => {
                let sql = format!(
                    "INSERT INTO trips ({TRIP_COLUMNS}) \
                     VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11,$12,$13) \
                     RETURNING {TRIP_COLUMNS}"
                );
                let row = sqlx::query_as::<_, Trip>(&sql)
                    .bind(trip.id)
                    .bind(&trip.trip_name)
                    .bind(&trip.start_date_of_journey)
                    .bind(&trip.end_date_of_journey)
                    .bind(&trip.name_of_hotels)
                    .bind(&trip.places_visited)
                    .bind(trip.total_cost)
                    .bind(&trip.trip_type)
                    .bind(&trip.experience)
                    .bind(&trip.image)
                    .bind(&trip.short_description)
                    .bind(trip.featured)
                    .bind(trip.created_at)
                    .fetch_one(db)
                    .await?;
                Ok(row)
            }
            TripStore::Memory(map) => {
                map.insert(trip.id, trip.clone());
                Ok(trip)
            }
        }
    }

    /// Every trip, newest first.
    pub async fn list(&self) -> Result<Vec<Trip>> {
        match self {
            TripStore::Postgres(db) => {
                let sql = format!("SELECT {TRIP_COLUMNS} FROM trips ORDER BY created_at DESC");
                Ok(sqlx::query_as::<_, Trip>(&sql).fetch_all(db).await?)
            }
            TripStore::Memory(map) => {
                let mut trips: Vec<Trip> = map.iter().map(|e| e.value().clone()).collect();
                trips.sort_by(|a, b| b.created_at.cmp(&a.created_at));
                Ok(trips)
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Trip>> {
        match self {
            TripStore::Postgres(db) => {
                let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1");
                Ok(sqlx::query_as::<_, Trip>(&sql)
                    .bind(id)
                    .fetch_optional(db)
                    .await?)
            }
            TripStore::Memory(map) => Ok(map.get(&id).map(|e| e.value().clone())),
        }
    }

    /// Readiness probe.
    pub async fn ping(&self) -> Result<()> {
        if let TripStore::Postgres(db) = self {
            sqlx::query("SELECT 1").execute(db).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> NewTrip {
        NewTrip {
            trip_name: name.into(),
            ..Default::default()
        }
    }

    #[actix_rt::test]
    async fn memory_store_round_trip() {
        let store = TripStore::memory();
        let a = store.insert(named("Goa")).await.unwrap();
        let b = store.insert(named("Leh")).await.unwrap();

        assert_eq!(store.get(a.id).await.unwrap(), Some(a.clone()));
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);
        assert!(all.iter().any(|t| t.id == b.id));
        store.ping().await.unwrap();
    }
}
