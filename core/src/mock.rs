//! Fixture-backed discovery service for tests and offline development.
//!
//! Resources live under `fixtures/mock/<id>/` as `model.json`,
//! `endpoint.json` and `prediction.json` and are embedded at compile time.

use crate::api::{DiscoverApi, InfoApi, RunApi};
use crate::error::ApiError;
use crate::types::{
    Capabilities, Capability, Endpoint, Endpoints, InfoStatus, Model, Models, Prediction,
    PredictionResponse, ServerInfo,
};

/// Ids of the resources bundled with the mock.
pub const RESOURCE_MODELS: &[&str] = &["regression"];

struct Fixture {
    model: &'static str,
    endpoint: &'static str,
    prediction: &'static str,
}

fn fixture(id: &str) -> Option<Fixture> {
    match id {
        "regression" => Some(Fixture {
            model: include_str!("../fixtures/mock/regression/model.json"),
            endpoint: include_str!("../fixtures/mock/regression/endpoint.json"),
            prediction: include_str!("../fixtures/mock/regression/prediction.json"),
        }),
        _ => None,
    }
}

fn all<T>(select: impl Fn(&Fixture) -> Result<T, ApiError>) -> Result<Vec<T>, ApiError> {
    RESOURCE_MODELS
        .iter()
        .filter_map(|id| fixture(id))
        .map(|f| select(&f))
        .collect()
}

/// Answers info, discovery and prediction calls from bundled fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockOpsService;

impl MockOpsService {
    pub fn new() -> Self {
        Self
    }
}

impl InfoApi for MockOpsService {
    fn get_info(&self) -> Result<ServerInfo, ApiError> {
        Ok(ServerInfo {
            status: InfoStatus::Ok,
            info: None,
        })
    }

    fn get_capabilities(&self) -> Result<Capabilities, ApiError> {
        Ok(Capabilities {
            capabilities: vec![Capability::Info, Capability::Discover, Capability::Run],
        })
    }
}

impl DiscoverApi for MockOpsService {
    fn list_models(&self) -> Result<Models, ApiError> {
        let models = all(|f| Ok(serde_json::from_str::<Model>(f.model)?))?;
        Ok(Models { models })
    }

    fn get_model(&self, model_id: &str) -> Result<Model, ApiError> {
        let fixture = fixture(model_id).ok_or(ApiError::NotFound)?;
        Ok(serde_json::from_str(fixture.model)?)
    }

    /// The endpoint whose id equals `model_id`, or every endpoint when
    /// there is none.
    fn list_endpoints(&self, model_id: &str) -> Result<Endpoints, ApiError> {
        let endpoints = match fixture(model_id) {
            Some(f) => vec![serde_json::from_str::<Endpoint>(f.endpoint)?],
            None => all(|f| Ok(serde_json::from_str::<Endpoint>(f.endpoint)?))?,
        };
        Ok(Endpoints { endpoints })
    }

    fn get_endpoint(&self, endpoint_id: &str) -> Result<Endpoint, ApiError> {
        let fixture = fixture(endpoint_id).ok_or(ApiError::NotFound)?;
        Ok(serde_json::from_str(fixture.endpoint)?)
    }
}

impl RunApi for MockOpsService {
    fn prediction(&self, prediction: &Prediction) -> Result<PredictionResponse, ApiError> {
        let endpoint_id = prediction.endpoint_id().ok_or_else(|| {
            ApiError::InvalidRequest("prediction target has no endpoint link".to_string())
        })?;
        let fixture = fixture(&endpoint_id).ok_or(ApiError::NotFound)?;
        Ok(serde_json::from_str(fixture.prediction)?)
    }
}
