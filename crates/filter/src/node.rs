use crate::error::FilterError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::str::FromStr;

/// Path reported for problems with the filter document itself.
pub const ROOT_PATH: &str = "(root)";

/// A filter document: an ordered mapping of field names and operators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterNode(Map<String, Json>);

impl FilterNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value; only objects are valid filters.
    pub fn from_json(json: Json) -> Result<Self, FilterError> {
        match json {
            Json::Object(map) => Ok(Self(map)),
            other => Err(FilterError::MalformedFilter {
                path: ROOT_PATH.to_string(),
                reason: format!("a filter must be an object, found {}", json_kind(&other)),
            }),
        }
    }

    pub fn entries(&self) -> &Map<String, Json> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for FilterNode {
    type Err = FilterError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let json: Json = serde_json::from_str(source)?;
        Self::from_json(json)
    }
}

impl TryFrom<Json> for FilterNode {
    type Error = FilterError;

    fn try_from(json: Json) -> Result<Self, Self::Error> {
        Self::from_json(json)
    }
}

impl From<Map<String, Json>> for FilterNode {
    fn from(map: Map<String, Json>) -> Self {
        Self(map)
    }
}

pub(crate) fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}
