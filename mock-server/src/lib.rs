//! In-memory fake of the prediction service.
//!
//! Serves the `/v1` registry and prediction routes plus the read-only
//! discovery routes. Uploaded archives are JSON manifests: the model's
//! `MetaMlModel` fields and a canned `output` returned by every prediction.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const PREDICT_PROBA: &str = "PREDICT_PROBA";
pub const CLASSIFICATION: &str = "CLASSIFICATION";
pub const REGRESSION: &str = "REGRESSION";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub order: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaMlModel {
    pub name: String,
    pub version: String,
    pub method_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub input_schema: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<Value>,
    pub metadata: Map<String, Value>,
}

/// Contents of an uploaded archive.
#[derive(Clone, Debug, Deserialize)]
pub struct Manifest {
    #[serde(flatten)]
    pub model: MetaMlModel,
    pub output: Value,
}

#[derive(Clone, Debug)]
pub struct Registered {
    pub id: Uuid,
    pub model: MetaMlModel,
    pub output: Value,
}

#[derive(Debug, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictRequest {
    pub model_name: String,
    pub model_version: String,
    pub params: Vec<Param>,
}

#[derive(Debug, Deserialize)]
pub struct Prediction {
    pub parameters: Vec<Param>,
    #[serde(default)]
    pub target: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveQuery {
    pub name: String,
    pub version: Option<String>,
}

pub type Db = Arc<RwLock<Vec<Registered>>>;

type Rejection = (StatusCode, Json<Value>);

fn reject(status: StatusCode, detail: impl Into<String>) -> Rejection {
    let detail = detail.into();
    warn!(status = status.as_u16(), %detail, "request rejected");
    (status, Json(json!({ "detail": detail })))
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/v1/status", get(status))
        .route("/v1/models", get(list_models).delete(remove_model))
        .route("/v1/archives", post(add_archive))
        .route("/v1/predict_proba", post(predict_proba))
        .route("/v1/classification", post(classification))
        .route("/v1/regression", post(regression))
        .route("/info", get(server_info))
        .route("/capabilities", get(capabilities))
        .route("/models", get(ops_list_models))
        .route("/models/{id}", get(ops_get_model))
        .route("/models/{id}/endpoints", get(ops_list_endpoints))
        .route("/endpoints/{id}", get(ops_get_endpoint))
        .route("/endpoints/{id}/prediction", post(ops_prediction))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

// --- v1 registry ---

async fn status(State(db): State<Db>) -> Json<Value> {
    let count = db.read().await.len();
    Json(json!({ "count": count }))
}

async fn list_models(State(db): State<Db>) -> Json<Vec<MetaMlModel>> {
    let models = db.read().await;
    Json(models.iter().map(|r| r.model.clone()).collect())
}

async fn add_archive(State(db): State<Db>, mut multipart: Multipart) -> Result<StatusCode, Rejection> {
    let mut archive = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;
            archive = Some(bytes);
        }
    }
    let archive = archive.ok_or_else(|| reject(StatusCode::BAD_REQUEST, "missing multipart field `file`"))?;
    let manifest: Manifest = serde_json::from_slice(&archive)
        .map_err(|e| reject(StatusCode::UNPROCESSABLE_ENTITY, format!("unreadable archive: {e}")))?;

    let mut models = db.write().await;
    let existing = models
        .iter_mut()
        .find(|r| r.model.name == manifest.model.name && r.model.version == manifest.model.version);
    match existing {
        Some(entry) => {
            entry.model = manifest.model;
            entry.output = manifest.output;
            info!(name = %entry.model.name, version = %entry.model.version, "model replaced");
        }
        None => {
            info!(name = %manifest.model.name, version = %manifest.model.version, "model registered");
            models.push(Registered {
                id: Uuid::new_v4(),
                model: manifest.model,
                output: manifest.output,
            });
        }
    }
    Ok(StatusCode::OK)
}

async fn remove_model(State(db): State<Db>, Query(query): Query<RemoveQuery>) -> Result<StatusCode, Rejection> {
    let mut models = db.write().await;
    let before = models.len();
    models.retain(|r| {
        r.model.name != query.name || query.version.as_ref().is_some_and(|v| *v != r.model.version)
    });
    let removed = before - models.len();
    if removed == 0 {
        return Err(reject(StatusCode::NOT_FOUND, format!("model {} not found", query.name)));
    }
    info!(name = %query.name, version = ?query.version, removed, "models removed");
    Ok(StatusCode::OK)
}

// --- v1 predictions ---

/// Check `params` against the model's input schema and route type.
fn validate(entry: &Registered, kind: Option<&str>, params: &[Param]) -> Result<(), Rejection> {
    if let Some(kind) = kind {
        if entry.model.kind != kind {
            return Err(reject(
                StatusCode::BAD_REQUEST,
                format!("model {} is {}, not {kind}", entry.model.name, entry.model.kind),
            ));
        }
    }
    for feature in &entry.model.input_schema {
        if !params.iter().any(|p| p.name == feature.name) {
            return Err(reject(
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("missing feature {}", feature.name),
            ));
        }
    }
    Ok(())
}

async fn predict(db: Db, kind: &str, input: PredictRequest) -> Result<Json<Value>, Rejection> {
    let models = db.read().await;
    let entry = models
        .iter()
        .find(|r| r.model.name == input.model_name && r.model.version == input.model_version)
        .ok_or_else(|| {
            reject(
                StatusCode::NOT_FOUND,
                format!("model {}:{} not found", input.model_name, input.model_version),
            )
        })?;
    validate(entry, Some(kind), &input.params)?;
    debug!(name = %input.model_name, kind, "prediction served");
    Ok(Json(entry.output.clone()))
}

async fn predict_proba(State(db): State<Db>, Json(input): Json<PredictRequest>) -> Result<Json<Value>, Rejection> {
    predict(db, PREDICT_PROBA, input).await
}

async fn classification(State(db): State<Db>, Json(input): Json<PredictRequest>) -> Result<Json<Value>, Rejection> {
    predict(db, CLASSIFICATION, input).await
}

async fn regression(State(db): State<Db>, Json(input): Json<PredictRequest>) -> Result<Json<Value>, Rejection> {
    predict(db, REGRESSION, input).await
}

// --- discovery ---

fn base_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}")
}

fn model_links(base: &str, id: Uuid) -> Value {
    json!([
        { "rel": "self", "href": format!("{base}/models/{id}") },
        { "rel": "endpoint", "href": format!("{base}/endpoints/{id}") },
    ])
}

fn endpoint_links(base: &str, id: Uuid) -> Value {
    json!([
        { "rel": "self", "href": format!("{base}/endpoints/{id}") },
        { "rel": "model", "href": format!("{base}/models/{id}") },
    ])
}

fn ops_model(base: &str, entry: &Registered) -> Value {
    let mut model = json!({
        "id": entry.id,
        "name": entry.model.name,
        "version": entry.model.version,
        "input_schema": entry.model.input_schema,
        "metadata": entry.model.metadata,
        "links": model_links(base, entry.id),
    });
    if let Some(schema) = &entry.model.output_schema {
        model["output_schema"] = schema.clone();
    }
    model
}

fn ops_endpoint(base: &str, entry: &Registered) -> Value {
    json!({
        "id": entry.id,
        "name": entry.model.name,
        "status": "in_service",
        "links": endpoint_links(base, entry.id),
    })
}

fn lookup(models: &[Registered], id: &str) -> Result<Registered, Rejection> {
    let not_found = || reject(StatusCode::NOT_FOUND, format!("{id} not found"));
    let id: Uuid = id.parse().map_err(|_| not_found())?;
    models.iter().find(|r| r.id == id).cloned().ok_or_else(not_found)
}

async fn server_info() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "info": { "description": "in-memory prediction service" },
    }))
}

async fn capabilities() -> Json<Value> {
    Json(json!({ "capabilities": ["info", "discover", "run"] }))
}

async fn ops_list_models(State(db): State<Db>, headers: HeaderMap) -> Json<Value> {
    let base = base_url(&headers);
    let models = db.read().await;
    let models: Vec<Value> = models.iter().map(|r| ops_model(&base, r)).collect();
    Json(json!({ "models": models }))
}

async fn ops_get_model(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    let entry = lookup(&db.read().await, &id)?;
    Ok(Json(ops_model(&base_url(&headers), &entry)))
}

async fn ops_list_endpoints(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    let entry = lookup(&db.read().await, &id)?;
    Ok(Json(json!({ "endpoints": [ops_endpoint(&base_url(&headers), &entry)] })))
}

async fn ops_get_endpoint(
    State(db): State<Db>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, Rejection> {
    let entry = lookup(&db.read().await, &id)?;
    Ok(Json(ops_endpoint(&base_url(&headers), &entry)))
}

async fn ops_prediction(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(input): Json<Prediction>,
) -> Result<Json<Value>, Rejection> {
    let entry = lookup(&db.read().await, &id)?;
    validate(&entry, None, &input.parameters)?;
    let result = match entry.output {
        Value::Object(map) => Value::Object(map),
        other => json!({ "predictions": other }),
    };
    debug!(%id, "discovery prediction served");
    Ok(Json(json!({ "result": result })))
}
