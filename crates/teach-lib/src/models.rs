//! Core data models shared with the classification service

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TeachError;

/// Identifier of a server-side model; never empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModelId(String);

impl ModelId {
    pub fn new(id: impl Into<String>) -> Result<Self, TeachError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(TeachError::InvalidModelId(id));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModelId {
    type Error = TeachError;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ModelId> for String {
    fn from(id: ModelId) -> Self {
        id.0
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How the service interprets a feature value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Keyword,
    Number,
    List,
    Text,
    ImageUrl,
    ImageBase64,
}

impl FeatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Keyword => "keyword",
            FeatureType::Number => "number",
            FeatureType::List => "list",
            FeatureType::Text => "text",
            FeatureType::ImageUrl => "image_url",
            FeatureType::ImageBase64 => "image_base64",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keyword" => Ok(FeatureType::Keyword),
            "number" => Ok(FeatureType::Number),
            "list" => Ok(FeatureType::List),
            "text" => Ok(FeatureType::Text),
            "image_url" => Ok(FeatureType::ImageUrl),
            "image_base64" => Ok(FeatureType::ImageBase64),
            other => Err(format!("unknown feature type '{}'", other)),
        }
    }
}

/// A single typed input
///
/// The type is kept as the service spells it; which types are accepted is
/// for the service to decide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub key: String,
    #[serde(rename = "type")]
    pub feature_type: String,
    pub value: String,
}

impl Feature {
    pub fn new(key: impl Into<String>, feature_type: FeatureType, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            feature_type: feature_type.as_str().to_string(),
            value: value.into(),
        }
    }
}

/// Parses `key:type=value`, e.g. `user.age:number=56`
impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected key:type=value, got '{}'", s))?;
        let (key, feature_type) = head
            .rsplit_once(':')
            .ok_or_else(|| format!("missing feature type in '{}'", s))?;
        if key.is_empty() {
            return Err(format!("missing feature key in '{}'", s));
        }
        Ok(Feature::new(key, feature_type.parse()?, value))
    }
}

/// One labeled training instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Example {
    pub class: String,
    pub inputs: Vec<Feature>,
}

/// Model tuning knobs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ngrams: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipgrams: Option<u32>,
}

/// A server-side classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Left empty on create to let the service assign one
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<ModelOptions>,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl Model {
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            options: None,
            classes: classes.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<Model>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub limit: u32,
    pub inputs: Vec<Feature>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedClass {
    pub id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub classes: Vec<PredictedClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassStats {
    pub name: String,
    pub examples: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStats {
    #[serde(default)]
    pub predictions: u64,
    #[serde(default)]
    pub examples: u64,
    #[serde(default)]
    pub classes: Vec<ClassStats>,
}

/// Service build and readiness information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub build: String,
    #[serde(default)]
    pub status: String,
}
