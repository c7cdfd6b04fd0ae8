use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::classification::category_and_risk;

/// Number of components in a BMI embedding: `[height, weight, value]`
pub const EMBEDDING_DIM: usize = 3;

/// Maximum number of matches returned by a similarity query
pub const QUERY_LIMIT: u64 = 10;

/// A stored BMI measurement.
///
/// `category` and `risk` are derived from `value` and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BmiRecord {
    pub id: i64,
    /// Height in meters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// `weight / height²`
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BmiRecord {
    /// Attach the category and risk derived from the current value.
    pub fn classified(mut self) -> Self {
        let (category, risk) = category_and_risk(self.value);
        self.category = Some(category).filter(|c| !c.is_empty()).map(str::to_owned);
        self.risk = Some(risk).filter(|r| !r.is_empty()).map(str::to_owned);
        self
    }

    /// Embedding used for similarity search
    pub fn embedding(&self) -> [f32; EMBEDDING_DIM] {
        [self.height as f32, self.weight as f32, self.value as f32]
    }
}

/// Request body for calculating a BMI
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct CalculateBmi {
    #[validate(range(exclusive_min = 0.0, message = "height must be greater than 0"))]
    #[schema(example = 1.70)]
    pub height: f64,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    #[schema(example = 70.0)]
    pub weight: f64,
}

/// Request body for updating a record.
///
/// Other record fields in the body are ignored; `value` is always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct UpdateBmi {
    #[validate(range(exclusive_min = 0.0, message = "height must be greater than 0"))]
    #[schema(example = 1.75)]
    pub height: f64,
    #[validate(range(exclusive_min = 0.0, message = "weight must be greater than 0"))]
    #[schema(example = 72.0)]
    pub weight: f64,
}

/// Request body for a similarity query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct QueryBmi {
    /// `[height, weight, value]`
    #[validate(length(equal = 3, message = "query_vector must have exactly 3 components"))]
    #[schema(example = json!([1.7, 70.0, 24.2]))]
    pub query_vector: Vec<f32>,
}

/// Height, weight and the value derived from them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurement {
    pub height: f64,
    pub weight: f64,
    pub value: f64,
}

impl Measurement {
    pub fn new(height: f64, weight: f64) -> Self {
        Self {
            height,
            weight,
            value: bmi_value(height, weight),
        }
    }
}

/// Row to insert; the store assigns the id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewBmiRecord {
    pub measurement: Measurement,
    pub created_at: DateTime<Utc>,
}

impl NewBmiRecord {
    /// Stamped with the current time at microsecond precision, matching
    /// what `timestamptz` round-trips.
    pub fn now(measurement: Measurement) -> Self {
        Self {
            measurement,
            created_at: Utc::now().trunc_subsecs(6),
        }
    }

    pub fn into_record(self, id: i64) -> BmiRecord {
        BmiRecord {
            id,
            height: self.measurement.height,
            weight: self.measurement.weight,
            value: self.measurement.value,
            category: None,
            risk: None,
            created_at: self.created_at,
        }
    }
}

/// Payload stored next to each embedding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BmiPayload {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub risk: String,
    /// RFC 3339 creation time of the record
    #[serde(default)]
    pub created_at: String,
}

impl BmiPayload {
    pub fn for_record(record: &BmiRecord) -> Self {
        let (category, risk) = category_and_risk(record.value);
        Self {
            category: category.to_owned(),
            risk: risk.to_owned(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// A point in the vector store, keyed by the relational id
#[derive(Debug, Clone, PartialEq)]
pub struct BmiPoint {
    pub id: i64,
    pub vector: [f32; EMBEDDING_DIM],
    pub payload: BmiPayload,
}

impl BmiPoint {
    pub fn from_record(record: &BmiRecord) -> Self {
        Self {
            id: record.id,
            vector: record.embedding(),
            payload: BmiPayload::for_record(record),
        }
    }
}

/// A nearest-neighbour hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ScoredMatch {
    pub id: i64,
    pub score: f32,
    pub payload: BmiPayload,
}

/// Confirmation body for update and delete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `weight / height²`
pub fn bmi_value(height: f64, weight: f64) -> f64 {
    weight / (height * height)
}
