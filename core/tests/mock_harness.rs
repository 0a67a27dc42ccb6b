//! Discovery scenario against the fixture-backed `MockOpsService`.

use predict_core::{
    ApiError, Capability, DiscoverApi, InfoApi, InfoStatus, Link, MockOpsService, Prediction,
    RunApi, REL_ENDPOINT, REL_MODEL, REL_SELF,
};

#[test]
fn info_reports_ok_and_read_capabilities() {
    let mock = MockOpsService::new();
    assert_eq!(mock.get_info().unwrap().status, InfoStatus::Ok);

    let capabilities = mock.get_capabilities().unwrap();
    assert_eq!(
        capabilities.capabilities,
        [Capability::Info, Capability::Discover, Capability::Run]
    );
    assert!(!capabilities.supports(Capability::Manage));
}

#[test]
fn regression_model_is_discoverable() {
    let mock = MockOpsService::new();
    let models = mock.list_models().unwrap().models;
    assert_eq!(models.len(), 1);

    let model = mock.get_model("regression").unwrap();
    assert_eq!(model, models[0]);
    assert_eq!(model.name, "[RandomForestRegressor] loan approval example");
    assert_eq!(model.version.as_deref(), Some("v1"));
    assert_eq!(model.metadata_str("description"), Some("Evaluation of yearlyReimbursement"));
    assert_eq!(model.input_schema.len(), 5);
    for (position, feature) in model.input_schema.iter().enumerate() {
        assert_eq!(feature.order, position as i64);
        assert_eq!(feature.kind, "float");
    }
    assert_eq!(model.link(REL_SELF), Some("http://0.0.0.0:8080/models/regression"));
    assert_eq!(model.link(REL_ENDPOINT), Some("http://0.0.0.0:8080/endpoints/regression"));
}

#[test]
fn model_and_endpoint_links_are_symmetric() {
    let mock = MockOpsService::new();
    let model = mock.get_model("regression").unwrap();
    let endpoints = mock.list_endpoints(&model.id).unwrap().endpoints;
    assert_eq!(endpoints.len(), 1);

    let endpoint = &endpoints[0];
    assert_eq!(model.link(REL_SELF), endpoint.link(REL_MODEL));
    assert_eq!(model.link(REL_ENDPOINT), endpoint.link(REL_SELF));
    assert_eq!(mock.get_endpoint("regression").unwrap(), *endpoint);
}

#[test]
fn prediction_follows_the_endpoint_link() {
    let mock = MockOpsService::new();
    let model = mock.get_model("regression").unwrap();
    let href = model.link(REL_ENDPOINT).unwrap();

    let prediction = Prediction::new(href)
        .param("creditScore", 200)
        .param("income", 36000.0)
        .param("loanAmount", 3000.0)
        .param("monthDuration", 13.0)
        .param("rate", 2.6);
    let response = mock.prediction(&prediction).unwrap();
    assert_eq!(response.result["predictions"], 535.0);
}

#[test]
fn prediction_on_unknown_endpoint_is_not_found() {
    let prediction = Prediction::new("http://0.0.0.0:8080/endpoints/classification");
    let err = MockOpsService::new().prediction(&prediction).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn prediction_without_endpoint_link_is_invalid() {
    let prediction = Prediction {
        parameters: Vec::new(),
        target: vec![Link::new(REL_MODEL, "http://0.0.0.0:8080/models/regression")],
    };
    let err = MockOpsService::new().prediction(&prediction).unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
}
