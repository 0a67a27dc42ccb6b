//! Model registry DTOs of the v1 admin API.

use serde::{Deserialize, Serialize};

/// One named, typed, ordered input column of a model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub order: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Feature {
    pub fn new(name: &str, order: i64, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            order,
            kind: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metric {
    pub name: String,
    pub value: String,
}

/// Descriptive information attached to a registered model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub description: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<String>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
}

/// Output type of a model; selects which prediction route applies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MlType {
    Classification,
    Regression,
    PredictProba,
}

/// A registered model as listed by `GET /v1/models`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetaMlModel {
    pub name: String,
    pub version: String,
    pub method_name: String,
    #[serde(rename = "type")]
    pub kind: MlType,
    pub input_schema: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Map<String, serde_json::Value>>,
    pub metadata: Metadata,
}

impl MetaMlModel {
    /// Feature names sorted by their declared position.
    pub fn ordered_feature_names(&self) -> Vec<&str> {
        let mut features: Vec<&Feature> = self.input_schema.iter().collect();
        features.sort_by_key(|f| f.order);
        features.into_iter().map(|f| f.name.as_str()).collect()
    }
}

/// Aggregate server state returned by `GET /v1/status`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerStatus {
    pub count: u64,
}
