//! # Customer Model
//!
//! SeaORM entity for the `customers` table, the verification status enumeration, and the
//! JSON payloads exchanged over `/api/customers`.

use std::fmt;
use std::str::FromStr;

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Customer entity
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Server-assigned identifier (primary key)
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    pub address: String,

    pub phone_no: String,

    pub email: String,

    /// Trust label; always one of the [`VerificationStatus`] values
    pub verification_status: VerificationStatus,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Categorical trust label on a customer record.
///
/// Any status may move to any other status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
    Default,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum VerificationStatus {
    #[sea_orm(string_value = "Not Verified")]
    #[serde(rename = "Not Verified")]
    #[default]
    NotVerified,

    #[sea_orm(string_value = "Verified")]
    #[serde(rename = "Verified")]
    Verified,

    #[sea_orm(string_value = "Fraud")]
    #[serde(rename = "Fraud")]
    Fraud,

    #[sea_orm(string_value = "Suspicious")]
    #[serde(rename = "Suspicious")]
    Suspicious,

    #[sea_orm(string_value = "Black Listed")]
    #[serde(rename = "Black Listed")]
    BlackListed,
}

impl VerificationStatus {
    /// Every status, in display order.
    pub const ALL: [VerificationStatus; 5] = [
        VerificationStatus::NotVerified,
        VerificationStatus::Verified,
        VerificationStatus::Fraud,
        VerificationStatus::Suspicious,
        VerificationStatus::BlackListed,
    ];

    /// The wire and storage label.
    pub fn label(self) -> &'static str {
        match self {
            VerificationStatus::NotVerified => "Not Verified",
            VerificationStatus::Verified => "Verified",
            VerificationStatus::Fraud => "Fraud",
            VerificationStatus::Suspicious => "Suspicious",
            VerificationStatus::BlackListed => "Black Listed",
        }
    }

    /// Comma separated list of every label, for error messages.
    pub fn allowed_labels() -> String {
        Self::ALL
            .iter()
            .map(|status| status.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a string is not one of the verification status labels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verification status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for VerificationStatus {
    type Err = UnknownStatus;

    /// Parses a label, ignoring case and the separator between words, so `Black Listed`,
    /// `black-listed` and `BLACK_LISTED` are equivalent.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let key: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|status| {
                status
                    .label()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .flat_map(char::to_lowercase)
                    .eq(key.chars())
            })
            .ok_or_else(|| UnknownStatus(raw.to_string()))
    }
}

/// Customer representation returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ann Lee")]
    pub name: String,
    #[schema(example = "1 Main St")]
    pub address: String,
    #[schema(example = "555-1234")]
    pub phone_no: String,
    #[schema(example = "ann@example.com")]
    pub email: String,
    pub verification_status: VerificationStatus,
    #[schema(value_type = String, example = "2025-09-01T12:00:00Z")]
    pub created_at: DateTimeWithTimeZone,
    #[schema(value_type = String, example = "2025-09-01T12:05:00Z")]
    pub updated_at: DateTimeWithTimeZone,
}

impl From<Model> for CustomerResponse {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            phone_no: model.phone_no,
            email: model.email,
            verification_status: model.verification_status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Payload for creating a customer. Any `id` sent by the caller is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[serde(default)]
    #[schema(example = "Ann Lee")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "1 Main St")]
    pub address: String,
    #[serde(default)]
    #[schema(example = "555-1234")]
    pub phone_no: String,
    #[serde(default)]
    #[schema(example = "ann@example.com")]
    pub email: String,
    /// Defaults to `Not Verified` when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_status: Option<VerificationStatus>,
}

/// Payload for a full update. The verification status is not part of it and is left as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone_no: String,
    #[serde(default)]
    pub email: String,
}

/// Payload for a partial update; only present fields are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.address.is_none()
            && self.phone_no.is_none()
            && self.email.is_none()
    }
}

/// Payload for `PATCH /api/customers/{id}/status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdate {
    #[schema(example = "Fraud")]
    pub status: String,
}
