use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One stored trip. Serialized with the camelCase keys the frontend uses.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub trip_name: String,
    pub start_date_of_journey: String,
    pub end_date_of_journey: String,
    pub name_of_hotels: String,
    pub places_visited: String,
    pub total_cost: i64,
    pub trip_type: String,
    pub experience: String,
    pub image: String,
    pub short_description: String,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /trip`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTrip {
    pub trip_name: String,
    pub start_date_of_journey: String,
    pub end_date_of_journey: String,
    pub name_of_hotels: String,
    pub places_visited: String,
    pub total_cost: i64,
    pub trip_type: String,
    pub experience: String,
    pub image: String,
    pub short_description: String,
    pub featured: bool,
}

impl NewTrip {
    /// Attach an id and a creation time.
    pub fn into_trip(self) -> Trip {
        Trip {
            id: Uuid::new_v4(),
            trip_name: self.trip_name,
            start_date_of_journey: self.start_date_of_journey,
            end_date_of_journey: self.end_date_of_journey,
            name_of_hotels: self.name_of_hotels,
            places_visited: self.places_visited,
            total_cost: self.total_cost,
            trip_type: self.trip_type,
            experience: self.experience,
            image: self.image,
            short_description: self.short_description,
            featured: self.featured,
            created_at: Utc::now(),
        }
    }
}
