//! Stateless HTTP request builder and response parser for the v1 API.
//!
//! # Design
//! `MlServiceClient` holds only a base URL and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. A `Transport` (or the caller) executes the round-trip in
//! between, keeping this layer deterministic and free of I/O.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{
    ClassificationResponse, MetaMlModel, PredictProbaResponse, RegressionResponse, RequestBody,
    ServerStatus,
};

const API_PREFIX: &str = "v1";

/// Synchronous, stateless client for the model registry and prediction
/// routes under `/v1`.
#[derive(Debug, Clone)]
pub struct MlServiceClient {
    base_url: Url,
}

impl MlServiceClient {
    /// `base_url` is the server root; route paths already include `/v1`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn build_get_status(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &[API_PREFIX, "status"]))
    }

    pub fn build_list_models(&self) -> HttpRequest {
        bare_request(HttpMethod::Get, resolve(&self.base_url, &[API_PREFIX, "models"]))
    }

    /// Upload a model archive as the multipart field `file`.
    pub fn build_add_archive(&self, file_name: &str, archive: Vec<u8>) -> HttpRequest {
        let form = MultipartForm::new().file("file", file_name, "application/octet-stream", archive);
        multipart_request(resolve(&self.base_url, &[API_PREFIX, "archives"]), &form)
    }

    /// Remove `name` at `version`, or every version of `name` when
    /// `version` is `None`.
    pub fn build_remove_model(&self, name: &str, version: Option<&str>) -> HttpRequest {
        let mut url = resolve(&self.base_url, &[API_PREFIX, "models"]);
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("name", name);
            if let Some(version) = version {
                query.append_pair("version", version);
            }
        }
        bare_request(HttpMethod::Delete, url)
    }

    pub fn build_predict_proba(&self, input: &RequestBody) -> Result<HttpRequest, ApiError> {
        json_request(resolve(&self.base_url, &[API_PREFIX, "predict_proba"]), input)
    }

    pub fn build_classification(&self, input: &RequestBody) -> Result<HttpRequest, ApiError> {
        json_request(resolve(&self.base_url, &[API_PREFIX, "classification"]), input)
    }

    pub fn build_regression(&self, input: &RequestBody) -> Result<HttpRequest, ApiError> {
        json_request(resolve(&self.base_url, &[API_PREFIX, "regression"]), input)
    }

    pub fn parse_get_status(&self, response: HttpResponse) -> Result<ServerStatus, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_list_models(&self, response: HttpResponse) -> Result<Vec<MetaMlModel>, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_add_archive(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_remove_model(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_predict_proba(&self, response: HttpResponse) -> Result<PredictProbaResponse, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_classification(&self, response: HttpResponse) -> Result<ClassificationResponse, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }

    pub fn parse_regression(&self, response: HttpResponse) -> Result<RegressionResponse, ApiError> {
        check_status(&response, 200)?;
        decode(&response)
    }
}

/// Parse and validate a base URL. Query and fragment are dropped.
pub(crate) fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ApiError::InvalidUrl(format!("{raw}: cannot be a base")));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub(crate) fn resolve(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub(crate) fn bare_request(method: HttpMethod, url: Url) -> HttpRequest {
    HttpRequest {
        method,
        path: url.into(),
        headers: Vec::new(),
        body: None,
    }
}

pub(crate) fn json_request<T: Serialize>(url: Url, input: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_vec(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
    Ok(HttpRequest {
        method: HttpMethod::Post,
        path: url.into(),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

pub(crate) fn multipart_request(url: Url, form: &MultipartForm) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Post,
        path: url.into(),
        headers: vec![("content-type".to_string(), form.content_type())],
        body: Some(form.encode()),
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    warn!(status = response.status, expected, "unexpected response status");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MlServiceClient {
        MlServiceClient::new("http://localhost:8080").unwrap()
    }

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn miniloan_request() -> RequestBody {
        RequestBody::new("miniloan-rfc", "v0")
            .param("creditScore", 200)
            .param("income", 36000)
            .param("loanAmount", 3000)
            .param("monthDuration", 13)
            .param("rate", 2.6)
    }

    #[test]
    fn build_get_status_produces_correct_request() {
        let req = client().build_get_status();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/v1/status");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_list_models_produces_correct_request() {
        let req = client().build_list_models();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/v1/models");
    }

    #[test]
    fn build_add_archive_is_multipart() {
        let req = client().build_add_archive("miniloan-rfc.zip", b"PK\x03\x04".to_vec());
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/v1/archives");
        let content_type = req.header("content-type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = req.body.unwrap();
        let needle = b"name=\"file\"; filename=\"miniloan-rfc.zip\"";
        assert!(body.windows(needle.len()).any(|w| w == needle));
        assert!(body.windows(4).any(|w| w == b"PK\x03\x04"));
    }

    #[test]
    fn build_remove_model_with_version() {
        let req = client().build_remove_model("miniloan-rfc", Some("v0"));
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8080/v1/models?name=miniloan-rfc&version=v0");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_remove_model_without_version_omits_parameter() {
        let req = client().build_remove_model("miniloan rfc", None);
        assert_eq!(req.path, "http://localhost:8080/v1/models?name=miniloan+rfc");
    }

    #[test]
    fn build_predict_proba_produces_correct_request() {
        let req = client().build_predict_proba(&miniloan_request()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/v1/predict_proba");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["modelName"], "miniloan-rfc");
        assert_eq!(body["params"][0]["value"], 200);
        assert_eq!(body["params"][4]["value"], 2.6);
    }

    #[test]
    fn classification_and_regression_routes() {
        let c = client();
        let input = miniloan_request();
        assert_eq!(
            c.build_classification(&input).unwrap().path,
            "http://localhost:8080/v1/classification"
        );
        assert_eq!(
            c.build_regression(&input).unwrap().path,
            "http://localhost:8080/v1/regression"
        );
    }

    #[test]
    fn non_finite_parameter_fails_to_serialize() {
        let input = RequestBody::new("m", "v0").param("rate", f64::NAN);
        let err = client().build_regression(&input).unwrap_err();
        assert!(matches!(err, ApiError::SerializationError(_)));
    }

    #[test]
    fn parse_get_status_success() {
        let status = client().parse_get_status(ok(r#"{"count":1}"#)).unwrap();
        assert_eq!(status.count, 1);
    }

    #[test]
    fn parse_list_models_empty() {
        let models = client().parse_list_models(ok("[]")).unwrap();
        assert!(models.is_empty());
    }

    #[test]
    fn parse_remove_model_not_found() {
        let response = HttpResponse {
            status: 404,
            headers: Vec::new(),
            body: String::new(),
        };
        let err = client().parse_remove_model(response).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_add_archive_server_error() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse_add_archive(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_predict_proba_success() {
        let response = ok(r#"{"predictOutput":"true","probabilities":[{"name":"true","proba":1.0}]}"#);
        let result = client().parse_predict_proba(response).unwrap();
        assert_eq!(result.predict_output, "true");
    }

    #[test]
    fn parse_regression_bad_json() {
        let err = client().parse_regression(ok("not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn parse_list_models_unknown_type_is_a_decode_error() {
        let body = r#"[{"name":"m","version":"v0","methodName":"predict","type":"RANKING",
            "inputSchema":[],"metadata":{"description":"d","author":"a","metrics":[]}}]"#;
        let err = client().parse_list_models(ok(body)).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = MlServiceClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.build_get_status().path, "http://localhost:8080/v1/status");
    }

    #[test]
    fn base_path_is_preserved() {
        let client = MlServiceClient::new("http://gateway:9000/ml/").unwrap();
        assert_eq!(client.build_list_models().path, "http://gateway:9000/ml/v1/models");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            MlServiceClient::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
        assert!(matches!(
            MlServiceClient::new("mailto:ops@example.com"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
