use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookable offering of a business. `duration_minutes` is informational and
/// is not enforced against slot length.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Service {
    pub id: String,
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewServiceParams {
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub price: f64,
    pub active: bool,
}

impl Service {
    pub fn new(params: NewServiceParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            business_id: params.business_id,
            name: params.name,
            description: params.description,
            duration_minutes: params.duration_minutes,
            price: params.price,
            active: params.active,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ServiceFilter {
    pub business_id: Option<String>,
    pub active: Option<bool>,
}
