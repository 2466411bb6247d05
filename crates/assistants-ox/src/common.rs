//! Envelopes and small value types shared by every resource family.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::validation::{self, Validate, ValidationError};

/// Sort order by `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ListOrder {
    Asc,
    Desc,
}

/// Cursor pagination for list endpoints. Every field is forwarded as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListQuery {
    /// Number of objects to return, 1-100 (API default 20).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 100))]
    pub limit: Option<u32>,

    /// Sort order by creation time (API default `desc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<ListOrder>,

    /// Cursor: return objects after this ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// Cursor: return objects before this ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

pub(crate) fn validate_limit(limit: Option<u32>) -> Result<(), ValidationError> {
    limit.map_or(Ok(()), |limit| validation::int_range("limit", limit, 1, 100))
}

impl Validate for ListQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_limit(self.limit)
    }
}

/// A page of objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub object: String,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_id: Option<String>,
    pub has_more: bool,
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionStatus {
    pub id: String,
    #[serde(default)]
    pub object: String,
    pub deleted: bool,
}

impl DeletionStatus {
    /// Fills `object` when the API leaves it out, e.g. `assistant.deleted`.
    pub(crate) fn with_default_object(mut self, object: &str) -> Self {
        if self.object.is_empty() {
            self.object = object.to_string();
        }
        self
    }
}

/// Token usage of a run or run step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub completion_tokens: u64,
    pub prompt_tokens: u64,
    pub total_tokens: u64,
}

/// Constrains effort on reasoning for reasoning models.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEffort {
    Low,
    Medium,
    High,
    /// A level this crate does not name yet; kept so responses still decode.
    #[serde(untagged)]
    #[schemars(skip)]
    Other(String),
}

impl ReasoningEffort {
    pub fn as_unknown(&self) -> Option<&str> {
        match self {
            Self::Other(value) => Some(value),
            _ => None,
        }
    }
}

/// Why a message or run ended before completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncompleteDetails {
    pub reason: String,
}
