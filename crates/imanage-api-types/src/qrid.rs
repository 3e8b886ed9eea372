//! QR record types served by the search backend (`/QRIDs`).

use serde::{Deserialize, Serialize};

use crate::flexible;

/// Summary row returned by a QR search; immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    #[serde(deserialize_with = "flexible::string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(
        rename = "private",
        default,
        deserialize_with = "flexible::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "flexible::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_id: Option<String>,
}

/// Full QR card record returned by `GET /QRIDs/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    #[serde(deserialize_with = "flexible::string")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_phone_number: Option<String>,
    #[serde(
        rename = "private",
        default,
        deserialize_with = "flexible::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub private_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "flexible::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub package_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Partial update sent with `PATCH /QRIDs/{id}`; only populated fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CardUpdateRequest {
    /// True when no field would be sent.
    pub fn is_empty(&self) -> bool {
        self.owner_name.is_none()
            && self.owner_address.is_none()
            && self.owner_phone_number.is_none()
            && self.metadata.is_none()
    }
}
