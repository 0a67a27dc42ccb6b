//! Inference request and response DTOs of the v1 ML API.

use serde::{Deserialize, Serialize};

use super::value::ParamValue;

/// One named feature value of an inference request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub value: ParamValue,
}

impl Parameter {
    pub fn new(name: &str, value: impl Into<ParamValue>) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Body shared by the `predict_proba`, `classification` and `regression`
/// routes. Parameters keep their insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestBody {
    pub model_name: String,
    pub model_version: String,
    pub params: Vec<Parameter>,
}

impl RequestBody {
    pub fn new(model_name: &str, model_version: &str) -> Self {
        Self {
            model_name: model_name.to_string(),
            model_version: model_version.to_string(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.params.push(Parameter::new(name, value));
        self
    }
}

/// Probability of one class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatProbaPair {
    pub name: String,
    pub proba: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictProbaResponse {
    /// Class with the highest probability.
    pub predict_output: String,
    #[serde(default)]
    pub probabilities: Vec<FeatProbaPair>,
}

impl PredictProbaResponse {
    /// Probability reported for `class`, if present.
    pub fn probability_of(&self, class: &str) -> Option<f64> {
        self.probabilities
            .iter()
            .find(|p| p.name == class)
            .map(|p| p.proba)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResponse {
    pub classification_output: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegressionResponse {
    pub regression_output: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_wire_shape() {
        let body = RequestBody::new("miniloan-rfc", "v0")
            .param("creditScore", 200)
            .param("rate", 2.6)
            .param("approved", "yes");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["modelName"], "miniloan-rfc");
        assert_eq!(json["modelVersion"], "v0");
        assert_eq!(json["params"][0], serde_json::json!({"name": "creditScore", "value": 200}));
        assert_eq!(json["params"][1]["value"], 2.6);
        assert_eq!(json["params"][2]["value"], "yes");
    }

    #[test]
    fn predict_proba_response_decodes() {
        let raw = r#"{"predictOutput":"true","probabilities":[{"name":"false","proba":0.2},{"name":"true","proba":0.8}]}"#;
        let response: PredictProbaResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.predict_output, "true");
        assert_eq!(response.probability_of("true"), Some(0.8));
        assert_eq!(response.probability_of("maybe"), None);
    }

    #[test]
    fn regression_output_must_be_numeric() {
        let ok: RegressionResponse = serde_json::from_str(r#"{"regressionOutput":535.25}"#).unwrap();
        assert_eq!(ok.regression_output, 535.25);
        assert!(serde_json::from_str::<RegressionResponse>(r#"{"regressionOutput":"535"}"#).is_err());
    }

    #[test]
    fn regression_output_keeps_full_precision() {
        let response = RegressionResponse { regression_output: 1.0715660391465826e-75 };
        let json = serde_json::to_string(&response).unwrap();
        let decoded: RegressionResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, response);
    }

    #[test]
    fn classification_requires_output_field() {
        assert!(serde_json::from_str::<ClassificationResponse>(r#"{"output":"true"}"#).is_err());
    }
}
