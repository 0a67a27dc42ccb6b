//! Wire DTOs for both service APIs.
//!
//! # Design
//! Every record is a plain value type with structural equality and an
//! explicit wire name per field. The v1 API speaks camelCase; the discovery
//! API speaks snake_case. Closed enumerations reject unknown wire values at
//! decode time instead of falling back to a default.

pub mod admin;
pub mod discovery;
pub mod manage;
pub mod predict;
pub mod value;

pub use admin::{Feature, MetaMlModel, Metadata, Metric, MlType, ServerStatus};
pub use discovery::{
    Capabilities, Capability, Endpoint, EndpointStatus, Endpoints, InfoStatus, Link, Model, Models,
    Prediction, PredictionParameter, PredictionResponse, ServerInfo, REL_ENDPOINT, REL_MODEL,
    REL_SELF,
};
pub use manage::{DataShape, ModelBinary, ModelCreation, ModelWrapper};
pub use predict::{
    ClassificationResponse, FeatProbaPair, Parameter, PredictProbaResponse, RegressionResponse,
    RequestBody,
};
pub use value::ParamValue;
