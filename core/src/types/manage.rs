//! Model management DTOs: model creation and binary upload.

use serde::{Deserialize, Serialize};

use super::admin::Feature;

/// Serialization format of an uploaded model binary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ModelWrapper {
    Pickle,
    Joblib,
    Pmml,
    Bst,
}

impl ModelWrapper {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelWrapper::Pickle => "pickle",
            ModelWrapper::Joblib => "joblib",
            ModelWrapper::Pmml => "pmml",
            ModelWrapper::Bst => "bst",
        }
    }
}

/// Data structure a model consumes or produces.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DataShape {
    #[serde(rename = "auto")]
    Auto,
    #[serde(rename = "ndarray")]
    Ndarray,
    #[serde(rename = "DataFrame")]
    DataFrame,
    #[serde(rename = "list")]
    List,
}

impl DataShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataShape::Auto => "auto",
            DataShape::Ndarray => "ndarray",
            DataShape::DataFrame => "DataFrame",
            DataShape::List => "list",
        }
    }
}

/// Payload of `POST /models`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelCreation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub input_schema: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Multipart payload of `POST /models/{id}`: a serialized model plus the
/// hints the server needs to load it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBinary {
    pub file_name: String,
    pub file: Vec<u8>,
    pub format: Option<ModelWrapper>,
    pub input_data_structure: Option<DataShape>,
    pub output_data_structure: Option<DataShape>,
}

impl ModelBinary {
    pub fn new(file_name: &str, file: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            file,
            format: None,
            input_data_structure: None,
            output_data_structure: None,
        }
    }

    pub fn format(mut self, format: ModelWrapper) -> Self {
        self.format = Some(format);
        self
    }

    pub fn input_data_structure(mut self, shape: DataShape) -> Self {
        self.input_data_structure = Some(shape);
        self
    }

    pub fn output_data_structure(mut self, shape: DataShape) -> Self {
        self.output_data_structure = Some(shape);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapper_wire_values() {
        for wrapper in [ModelWrapper::Pickle, ModelWrapper::Joblib, ModelWrapper::Pmml, ModelWrapper::Bst] {
            let json = serde_json::to_value(wrapper).unwrap();
            assert_eq!(json, wrapper.as_str());
        }
        assert!(serde_json::from_str::<ModelWrapper>(r#""onnx""#).is_err());
    }

    #[test]
    fn data_shape_keeps_dataframe_casing() {
        assert_eq!(serde_json::to_value(DataShape::DataFrame).unwrap(), "DataFrame");
        assert_eq!(
            serde_json::from_str::<DataShape>(r#""ndarray""#).unwrap(),
            DataShape::Ndarray
        );
        assert!(serde_json::from_str::<DataShape>(r#""dataframe""#).is_err());
        assert!(serde_json::from_str::<DataShape>(r#""tensor""#).is_err());
    }

    #[test]
    fn model_creation_uses_snake_case_schema() {
        let creation = ModelCreation {
            name: "test model creation".to_string(),
            version: Some("v1".to_string()),
            input_schema: vec![Feature::new("paramater-1", 0, "double")],
            output_schema: None,
            metadata: serde_json::Map::new(),
        };
        let json = serde_json::to_value(&creation).unwrap();
        assert_eq!(json["input_schema"][0]["name"], "paramater-1");
        assert!(json.get("output_schema").is_none());
    }
}
