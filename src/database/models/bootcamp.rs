use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::geocoder::GeoPoint;

/// A training-program listing with a geocoded location. Location fields are
/// flattened onto the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bootcamp {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub formatted_address: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub careers: Vec<String>,
    pub photo: Option<String>,
    pub housing: bool,
    pub job_assistance: bool,
    pub job_guarantee: bool,
    pub accept_gi: bool,
    pub average_rating: Option<f64>,
    pub average_cost: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied fields for create/update.
#[derive(Debug, Clone, Deserialize)]
pub struct BootcampInput {
    pub name: String,
    pub description: String,
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    #[serde(default)]
    pub careers: Vec<String>,
    #[serde(default)]
    pub housing: bool,
    #[serde(default)]
    pub job_assistance: bool,
    #[serde(default)]
    pub job_guarantee: bool,
    #[serde(default)]
    pub accept_gi: bool,
}

/// The unit of work the save pipeline enriches before the row is written:
/// steps fill in `slug` and `location` from the raw input.
#[derive(Debug, Clone)]
pub struct BootcampDraft {
    pub input: BootcampInput,
    pub slug: Option<String>,
    pub location: Option<GeoPoint>,
}

impl BootcampDraft {
    pub fn new(input: BootcampInput) -> Self {
        Self {
            input,
            slug: None,
            location: None,
        }
    }
}
