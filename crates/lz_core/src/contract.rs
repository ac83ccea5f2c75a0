use std::collections::BTreeMap;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Property key injected by the deployment engine on every custom resource.
/// It addresses the handler function itself and is never a reconciliation
/// input.
pub const SERVICE_TOKEN_PROPERTY: &str = "ServiceToken";

/// Property key carrying the per-synthesis token that forces the engine to
/// re-invoke the handler on every update.
pub const FORCE_UPDATE_TOKEN_PROPERTY: &str = "ForceUpdateToken";

/// Resource type for Organizations policy attachment reconciliations.
pub const POLICY_ATTACHMENT_RESOURCE_TYPE: &str = "Custom::OrganizationsPolicyAttachment";

/// Resource type for Macie member reconciliations.
pub const MACIE_MEMBER_RESOURCE_TYPE: &str = "Custom::MacieMember";

/// Lifecycle phase the deployment engine is driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

/// Error raised while reading reconciliation inputs out of the event's
/// resource properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("required property '{0}' is missing or empty")]
    Missing(String),
}

/// String-keyed, string-valued reconciliation inputs.
///
/// The deployment engine delivers property values as JSON scalars; numbers
/// and booleans are coerced to their string form on deserialization so
/// handlers observe a uniform string→string mapping. Nested values are
/// dropped — handlers only ever read scalar keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceProperties(BTreeMap<String, String>);

impl ResourceProperties {
    pub fn new(properties: BTreeMap<String, String>) -> Self {
        Self(properties)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read a property the handler cannot reconcile without.
    pub fn required(&self, key: &str) -> Result<&str, PropertyError> {
        match self.0.get(key).map(String::as_str) {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(PropertyError::Missing(key.to_string())),
        }
    }

    pub fn optional(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ResourceProperties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        Self(pairs.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for ResourceProperties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut properties = BTreeMap::new();
        for (key, value) in raw {
            let coerced = match value {
                Value::String(text) => text,
                Value::Number(number) => number.to_string(),
                Value::Bool(flag) => flag.to_string(),
                // Arrays, objects, and nulls carry no scalar reconciliation
                // input; skip them rather than failing the whole event.
                Value::Array(_) | Value::Object(_) | Value::Null => continue,
            };
            properties.insert(key, coerced);
        }
        Ok(Self(properties))
    }
}

/// The lifecycle event the deployment engine delivers per invocation.
///
/// `response_url` is present in classic custom-resource mode and absent when
/// a provider framework owns response delivery; handlers never look at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceRequest {
    pub request_type: RequestType,
    pub request_id: String,
    pub stack_id: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub resource_type: String,
    #[serde(rename = "ResponseURL", default, skip_serializing_if = "Option::is_none")]
    pub response_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: ResourceProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<ResourceProperties>,
}

impl CustomResourceRequest {
    /// The physical id to echo when this invocation must not mint a new one
    /// (deletes and failures). Falls back to the logical id so a response is
    /// always well-formed.
    pub fn echoed_physical_id(&self) -> &str {
        self.physical_resource_id
            .as_deref()
            .unwrap_or(&self.logical_resource_id)
    }
}

/// Terminal status reported back to the deployment engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// The response envelope the deployment engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<BTreeMap<String, String>>,
}

impl CustomResourceResponse {
    pub fn success(
        request: &CustomResourceRequest,
        physical_resource_id: impl Into<String>,
    ) -> Self {
        Self {
            status: ResponseStatus::Success,
            reason: None,
            physical_resource_id: physical_resource_id.into(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            data: None,
        }
    }

    /// A failed reconciliation surfaces the reason and echoes the event's
    /// physical id so the engine can roll back against the right resource.
    pub fn failed(request: &CustomResourceRequest, reason: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failed,
            reason: Some(reason.into()),
            physical_resource_id: request.echoed_physical_id().to_string(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            data: None,
        }
    }
}

/// Serialize an owned contract value. Contract types contain nothing that
/// can fail to serialize.
pub fn stable_contract_json(value: impl Serialize) -> String {
    serde_json::to_string(&value).expect("serialization of contract value should not fail")
}
