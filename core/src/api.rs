//! Capability traits and the services that implement them over a transport.
//!
//! # Design
//! The traits mirror the server's capability groups: `AdminApi` and `MlApi`
//! for the `/v1` routes, `InfoApi`, `DiscoverApi`, `RunApi` and `ManageApi`
//! for the discovery routes. `MlService` and `OpsService` implement each
//! operation as build, execute, parse. `MockOpsService` implements the read
//! side from fixtures.

use crate::client::MlServiceClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::ops::OpsClient;
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    Capabilities, ClassificationResponse, Endpoint, Endpoints, MetaMlModel, Model, ModelBinary,
    ModelCreation, Models, PredictProbaResponse, Prediction, PredictionResponse,
    RegressionResponse, RequestBody, ServerInfo, ServerStatus,
};

/// Model registry operations of the v1 API.
pub trait AdminApi {
    fn get_status(&self) -> Result<ServerStatus, ApiError>;
    fn list_models(&self) -> Result<Vec<MetaMlModel>, ApiError>;
    fn add_archive(&self, file_name: &str, archive: Vec<u8>) -> Result<(), ApiError>;
    /// `version: None` removes every version of `name`.
    fn remove_model(&self, name: &str, version: Option<&str>) -> Result<(), ApiError>;
}

/// Prediction operations of the v1 API.
pub trait MlApi {
    fn predict_proba(&self, input: &RequestBody) -> Result<PredictProbaResponse, ApiError>;
    fn classification(&self, input: &RequestBody) -> Result<ClassificationResponse, ApiError>;
    fn regression(&self, input: &RequestBody) -> Result<RegressionResponse, ApiError>;
}

pub trait InfoApi {
    fn get_info(&self) -> Result<ServerInfo, ApiError>;
    fn get_capabilities(&self) -> Result<Capabilities, ApiError>;
}

pub trait DiscoverApi {
    fn list_models(&self) -> Result<Models, ApiError>;
    fn get_model(&self, model_id: &str) -> Result<Model, ApiError>;
    fn list_endpoints(&self, model_id: &str) -> Result<Endpoints, ApiError>;
    fn get_endpoint(&self, endpoint_id: &str) -> Result<Endpoint, ApiError>;
}

pub trait RunApi {
    fn prediction(&self, prediction: &Prediction) -> Result<PredictionResponse, ApiError>;
}

pub trait ManageApi {
    fn create_model(&self, input: &ModelCreation) -> Result<Model, ApiError>;
    fn upload_model_binary(&self, model_id: &str, binary: &ModelBinary) -> Result<Endpoint, ApiError>;
    fn delete_model(&self, model_id: &str) -> Result<(), ApiError>;
}

/// v1 client bound to a transport.
#[derive(Debug, Clone)]
pub struct MlService<T = UreqTransport> {
    client: MlServiceClient,
    transport: T,
}

impl MlService<UreqTransport> {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(&config.base_url, UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> MlService<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        Ok(Self {
            client: MlServiceClient::new(base_url)?,
            transport,
        })
    }

    pub fn client(&self) -> &MlServiceClient {
        &self.client
    }
}

impl<T: Transport> AdminApi for MlService<T> {
    fn get_status(&self) -> Result<ServerStatus, ApiError> {
        let response = self.transport.execute(self.client.build_get_status())?;
        self.client.parse_get_status(response)
    }

    fn list_models(&self) -> Result<Vec<MetaMlModel>, ApiError> {
        let response = self.transport.execute(self.client.build_list_models())?;
        self.client.parse_list_models(response)
    }

    fn add_archive(&self, file_name: &str, archive: Vec<u8>) -> Result<(), ApiError> {
        let response = self
            .transport
            .execute(self.client.build_add_archive(file_name, archive))?;
        self.client.parse_add_archive(response)
    }

    fn remove_model(&self, name: &str, version: Option<&str>) -> Result<(), ApiError> {
        let response = self
            .transport
            .execute(self.client.build_remove_model(name, version))?;
        self.client.parse_remove_model(response)
    }
}

impl<T: Transport> MlApi for MlService<T> {
    fn predict_proba(&self, input: &RequestBody) -> Result<PredictProbaResponse, ApiError> {
        let response = self.transport.execute(self.client.build_predict_proba(input)?)?;
        self.client.parse_predict_proba(response)
    }

    fn classification(&self, input: &RequestBody) -> Result<ClassificationResponse, ApiError> {
        let response = self.transport.execute(self.client.build_classification(input)?)?;
        self.client.parse_classification(response)
    }

    fn regression(&self, input: &RequestBody) -> Result<RegressionResponse, ApiError> {
        let response = self.transport.execute(self.client.build_regression(input)?)?;
        self.client.parse_regression(response)
    }
}

/// Discovery client bound to a transport.
#[derive(Debug, Clone)]
pub struct OpsService<T = UreqTransport> {
    client: OpsClient,
    transport: T,
}

impl OpsService<UreqTransport> {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_transport(base_url, UreqTransport::default())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(&config.base_url, UreqTransport::new(config.timeout))
    }
}

impl<T: Transport> OpsService<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Result<Self, ApiError> {
        Ok(Self {
            client: OpsClient::new(base_url)?,
            transport,
        })
    }

    pub fn client(&self) -> &OpsClient {
        &self.client
    }
}

impl<T: Transport> InfoApi for OpsService<T> {
    fn get_info(&self) -> Result<ServerInfo, ApiError> {
        let response = self.transport.execute(self.client.build_get_info())?;
        self.client.parse_get_info(response)
    }

    fn get_capabilities(&self) -> Result<Capabilities, ApiError> {
        let response = self.transport.execute(self.client.build_get_capabilities())?;
        self.client.parse_get_capabilities(response)
    }
}

impl<T: Transport> DiscoverApi for OpsService<T> {
    fn list_models(&self) -> Result<Models, ApiError> {
        let response = self.transport.execute(self.client.build_list_models())?;
        self.client.parse_list_models(response)
    }

    fn get_model(&self, model_id: &str) -> Result<Model, ApiError> {
        let response = self.transport.execute(self.client.build_get_model(model_id))?;
        self.client.parse_get_model(response)
    }

    fn list_endpoints(&self, model_id: &str) -> Result<Endpoints, ApiError> {
        let response = self.transport.execute(self.client.build_list_endpoints(model_id))?;
        self.client.parse_list_endpoints(response)
    }

    fn get_endpoint(&self, endpoint_id: &str) -> Result<Endpoint, ApiError> {
        let response = self.transport.execute(self.client.build_get_endpoint(endpoint_id))?;
        self.client.parse_get_endpoint(response)
    }
}

impl<T: Transport> RunApi for OpsService<T> {
    fn prediction(&self, prediction: &Prediction) -> Result<PredictionResponse, ApiError> {
        let response = self.transport.execute(self.client.build_prediction(prediction)?)?;
        self.client.parse_prediction(response)
    }
}

impl<T: Transport> ManageApi for OpsService<T> {
    fn create_model(&self, input: &ModelCreation) -> Result<Model, ApiError> {
        let response = self.transport.execute(self.client.build_create_model(input)?)?;
        self.client.parse_create_model(response)
    }

    fn upload_model_binary(&self, model_id: &str, binary: &ModelBinary) -> Result<Endpoint, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_upload_model_binary(model_id, binary))?;
        self.client.parse_upload_model_binary(response)
    }

    fn delete_model(&self, model_id: &str) -> Result<(), ApiError> {
        let response = self.transport.execute(self.client.build_delete_model(model_id))?;
        self.client.parse_delete_model(response)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};
    use crate::types::Link;

    fn reply(status: u16, body: &'static str) -> impl Fn(HttpRequest) -> Result<HttpResponse, ApiError> {
        move |_| {
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            })
        }
    }

    #[test]
    fn ml_service_round_trip() {
        let service = MlService::with_transport("http://localhost:8080", |req: HttpRequest| -> Result<HttpResponse, ApiError> {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(req.path, "http://localhost:8080/v1/status");
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: r#"{"count":3}"#.to_string(),
            })
        })
        .unwrap();
        assert_eq!(service.get_status().unwrap().count, 3);
    }

    #[test]
    fn transport_errors_propagate() {
        let service = MlService::with_transport("http://localhost:8080", |_: HttpRequest| -> Result<HttpResponse, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        })
        .unwrap();
        assert!(matches!(service.list_models(), Err(ApiError::Transport(_))));
    }

    #[test]
    fn serialization_failure_skips_io() {
        let calls = Cell::new(0);
        let service = MlService::with_transport("http://localhost:8080", |_: HttpRequest| -> Result<HttpResponse, ApiError> {
            calls.set(calls.get() + 1);
            Ok(HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: String::new(),
            })
        })
        .unwrap();
        let input = RequestBody::new("m", "v0").param("rate", f64::INFINITY);
        assert!(matches!(service.regression(&input), Err(ApiError::SerializationError(_))));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn remove_model_not_found() {
        let service = MlService::with_transport("http://localhost:8080", reply(404, "")).unwrap();
        assert!(service.remove_model("miniloan-rfc", Some("v0")).unwrap_err().is_not_found());
    }

    #[test]
    fn ops_prediction_without_endpoint_link_sends_nothing() {
        let calls = Cell::new(0);
        let service = OpsService::with_transport("http://localhost:8080", |_: HttpRequest| -> Result<HttpResponse, ApiError> {
            calls.set(calls.get() + 1);
            Err(ApiError::Transport("unreachable".to_string()))
        })
        .unwrap();
        let prediction = Prediction {
            parameters: Vec::new(),
            target: vec![Link::new("model", "http://localhost:8080/models/regression")],
        };
        assert!(matches!(
            service.prediction(&prediction),
            Err(ApiError::InvalidRequest(_))
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn ops_delete_model_expects_no_content() {
        let service = OpsService::with_transport("http://localhost:8080", reply(204, "")).unwrap();
        assert!(service.delete_model("m1").is_ok());
    }

    #[test]
    fn from_config_rejects_bad_url() {
        let config = ClientConfig::new("::not a url::");
        assert!(matches!(MlService::from_config(&config), Err(ApiError::InvalidUrl(_))));
        assert!(matches!(OpsService::from_config(&config), Err(ApiError::InvalidUrl(_))));
    }
}
