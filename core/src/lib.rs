//! Synchronous client SDK for an ML model-serving service.
//!
//! # Overview
//! Two APIs are covered. The `/v1` API uploads model archives, lists and
//! removes registered models, reports server status and runs predictions.
//! The discovery API exposes server info and capabilities, model and
//! endpoint resources linked to each other, prediction runs and model
//! management.
//!
//! # Design
//! - `MlServiceClient` and `OpsClient` are stateless and hold only a base
//!   URL. Each operation is split into `build_*` (produces an `HttpRequest`)
//!   and `parse_*` (consumes an `HttpResponse`), so the I/O boundary is
//!   explicit and the core stays deterministic.
//! - `Transport` executes the round-trip. `UreqTransport` is the blocking
//!   default; tests plug in closures.
//! - `MlService` and `OpsService` pair a client with a transport and
//!   implement the capability traits in [`api`]. `MockOpsService` implements
//!   the discovery read side from bundled fixtures.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod multipart;
pub mod ops;
pub mod transport;
pub mod types;

pub use api::{AdminApi, DiscoverApi, InfoApi, ManageApi, MlApi, MlService, OpsService, RunApi};
pub use client::MlServiceClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use mock::MockOpsService;
pub use ops::OpsClient;
pub use transport::{Transport, UreqTransport};
pub use types::*;
