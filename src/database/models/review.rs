use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub bootcamp_id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub text: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewInput {
    pub title: String,
    pub text: String,
    pub rating: i32,
}

impl ReviewInput {
    /// Ratings run 1 to 10 inclusive.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=10).contains(&self.rating) {
            return Err("Rating must be between 1 and 10".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_are_inclusive() {
        let mut input = ReviewInput {
            title: "t".into(),
            text: "x".into(),
            rating: 1,
        };
        assert!(input.validate().is_ok());
        input.rating = 10;
        assert!(input.validate().is_ok());
        input.rating = 0;
        assert!(input.validate().is_err());
        input.rating = 11;
        assert!(input.validate().is_err());
    }
}
