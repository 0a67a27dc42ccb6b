//! Hypermedia DTOs of the discovery API (info, discover, run).
//!
//! Resources point at each other through `links`: a model carries `self`
//! and `endpoint` relations, an endpoint carries `self` and `model`.

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use url::Url;

use super::admin::Feature;
use super::value::ParamValue;

pub const REL_SELF: &str = "self";
pub const REL_MODEL: &str = "model";
pub const REL_ENDPOINT: &str = "endpoint";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Link {
    pub rel: String,
    pub href: String,
}

impl Link {
    pub fn new(rel: &str, href: &str) -> Self {
        Self {
            rel: rel.to_string(),
            href: href.to_string(),
        }
    }

    /// Last path segment of `href`, percent-decoded: the id of the linked
    /// resource. Query and fragment are not part of the id.
    pub fn target_id(&self) -> Option<String> {
        let segment = match Url::parse(&self.href) {
            Ok(url) => url
                .path_segments()?
                .filter(|s| !s.is_empty())
                .last()
                .map(str::to_string)?,
            Err(_) => {
                let path = self.href.split(['?', '#']).next().unwrap_or_default();
                path.rsplit('/').find(|s| !s.is_empty())?.to_string()
            }
        };
        let id = percent_decode_str(&segment).decode_utf8().ok()?;
        Some(id.into_owned())
    }
}

/// `href` of the first link with relation `rel`.
pub fn find_href<'a>(links: &'a [Link], rel: &str) -> Option<&'a str> {
    links.iter().find(|l| l.rel == rel).map(|l| l.href.as_str())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Model {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub input_schema: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Model {
    pub fn link(&self, rel: &str) -> Option<&str> {
        find_href(&self.links, rel)
    }

    /// String-valued metadata entry.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Models {
    pub models: Vec<Model>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EndpointStatus {
    OutOfService,
    Creating,
    Updating,
    UnderMaintenance,
    RollingBack,
    InService,
    Deleting,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoint {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EndpointStatus>,
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_at: Option<String>,
}

impl Endpoint {
    pub fn link(&self, rel: &str) -> Option<&str> {
        find_href(&self.links, rel)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoints {
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionParameter {
    pub name: String,
    pub value: ParamValue,
}

/// A prediction run against the endpoint named by the `endpoint` relation
/// of `target`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub parameters: Vec<PredictionParameter>,
    pub target: Vec<Link>,
}

impl Prediction {
    pub fn new(endpoint_href: &str) -> Self {
        Self {
            parameters: Vec::new(),
            target: vec![Link::new(REL_ENDPOINT, endpoint_href)],
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.parameters.push(PredictionParameter {
            name: name.to_string(),
            value: value.into(),
        });
        self
    }

    /// Id of the endpoint this prediction is addressed to.
    pub fn endpoint_id(&self) -> Option<String> {
        self.target
            .iter()
            .find(|l| l.rel == REL_ENDPOINT)
            .and_then(Link::target_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResponse {
    pub result: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InfoStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerInfo {
    pub status: InfoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Map<String, serde_json::Value>>,
}

/// A category of server functionality.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Info,
    Discover,
    Manage,
    Run,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Capabilities {
    pub capabilities: Vec<Capability>,
}

impl Capabilities {
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}
