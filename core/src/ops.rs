//! Stateless request builder and response parser for the discovery API.
//!
//! Same build/parse split as `MlServiceClient`, for the hypermedia routes:
//! `/info`, `/capabilities`, `/models`, `/endpoints` and the prediction
//! route of an endpoint.

use url::Url;

use crate::client::{bare_request, check_status, decode, json_request, multipart_request, parse_base_url, resolve};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{
    Capabilities, Endpoint, Endpoints, Model, ModelBinary, ModelCreation, Models, Prediction,
    PredictionResponse, ServerInfo,
};

#[derive(Debug, Clone)]
pub struct OpsClient {
    base_url: Url,
}

impl OpsClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_get_info(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &["info"]))
    }

    pub fn build_get_capabilities(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &["capabilities"]))
    }

    pub fn build_list_models(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &["models"]))
    }

    pub fn build_get_model(&self, model_id: &str) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &["models", model_id]))
    }

    pub fn build_list_endpoints(&self, model_id: &str) -> HttpRequest {
        bare_request(
            HttpMethod::Get,
            resolve(&self.base_url, &["models", model_id, "endpoints"]),
        )
    }

    pub fn build_get_endpoint(&self, endpoint_id: &str) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &["endpoints", endpoint_id]))
    }

    /// Post `prediction` to the endpoint named by its `endpoint` target link.
    ///
    /// Fails with `InvalidRequest` when the target carries no such link.
    pub fn build_prediction(&self, prediction: &Prediction) -> Result<HttpRequest, ApiError> {
        let endpoint_id = prediction.endpoint_id().ok_or_else(|| {
            ApiError::InvalidRequest("prediction target has no endpoint link".to_string())
        })?;
        json_request(
            resolve(&self.base_url, &["endpoints", &endpoint_id, "prediction"]),
            prediction,
        )
    }

    pub fn build_create_model(&self, input: &ModelCreation) -> Result<HttpRequest, ApiError> {
        json_request(resolve(&self.base_url, &["models"]), input)
    }

    pub fn build_upload_model_binary(&self, model_id: &str, binary: &ModelBinary) -> HttpRequest {
        let mut form = MultipartForm::new().file(
            "file",
            &binary.file_name,
            "application/octet-stream",
            binary.file.clone(),
        );
        if let Some(format) = binary.format {
            form = form.text("format", format.as_str());
        }
        if let Some(shape) = binary.input_data_structure {
            form = form.text("input_data_structure", shape.as_str());
        }
        if let Some(shape) = binary.output_data_structure {
            form = form.text("output_data_structure", shape.as_str());
        }
        multipart_request(resolve(&self.base_url, &["models", model_id]), &form)
    }

    pub fn build_delete_model(&self, model_id: &str) -> HttpRequest {
        bare_request(HttpMethod::Delete, resolve(&self.base_url, &["models", model_id]))
    }

    pub fn parse_get_info(&self, response: HttpResponse) -> Result<ServerInfo, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_get_capabilities(&self, response: HttpResponse) -> Result<Capabilities, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_list_models(&self, response: HttpResponse) -> Result<Models, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_get_model(&self, response: HttpResponse) -> Result<Model, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_list_endpoints(&self, response: HttpResponse) -> Result<Endpoints, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_get_endpoint(&self, response: HttpResponse) -> Result<Endpoint, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_prediction(&self, response: HttpResponse) -> Result<PredictionResponse, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_create_model(&self, response: HttpResponse) -> Result<Model, ApiError> {
        check_status(&response, 201)?;
        decode(&response)
    }

    pub fn parse_upload_model_binary(&self, response: HttpResponse) -> Result<Endpoint, ApiError> {
        check_status(&response, 201)?;
        decode(&response)
    }

    pub fn parse_delete_model(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}
