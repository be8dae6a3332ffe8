//! Courts and their optional rating gate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a court.
pub type CourtId = Uuid;

/// A play surface. Rated courts only accept players at or above `minimum_rating`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub name: String,
    pub minimum_rating: Option<f64>,
    pub is_active: bool,
}

impl Court {
    /// Create an active, unrated court.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            minimum_rating: None,
            is_active: true,
        }
    }

    /// Create an active court gated at `minimum_rating`.
    pub fn rated(name: impl Into<String>, minimum_rating: f64) -> Self {
        Self {
            minimum_rating: Some(minimum_rating),
            ..Self::new(name)
        }
    }

    pub fn is_rated(&self) -> bool {
        self.minimum_rating.is_some()
    }
}
