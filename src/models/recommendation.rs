use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Administrator-entered planting/harvesting recommendation.
/// Either date may be left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingRecommendation {
    pub id: String,
    pub planting_date: Option<String>,
    pub harvesting_date: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PlantingRecommendation {
    pub fn new(planting_date: Option<&str>, harvesting_date: Option<&str>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            planting_date: planting_date.map(str::to_string),
            harvesting_date: harvesting_date.map(str::to_string),
            created_at: Utc::now(),
        }
    }
}
