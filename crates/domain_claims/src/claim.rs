//! Claim records as held by the external claim store

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use core_kernel::ClaimId;
use crate::error::ClaimError;

/// Largest amount the portal accepts for a single claim
pub const MAX_CLAIMED_AMOUNT: Decimal = dec!(1_000_000);

/// Type of loss
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimType {
    Accident,
    Theft,
    Fire,
    Health,
    Other,
}

impl ClaimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimType::Accident => "ACCIDENT",
            ClaimType::Theft => "THEFT",
            ClaimType::Fire => "FIRE",
            ClaimType::Health => "HEALTH",
            ClaimType::Other => "OTHER",
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claim status values written by the workflow engine
///
/// Claims and history events keep the raw status string, since the store may
/// report values this enum does not know. Use [`ClaimStatus::from_str`] where a
/// typed value is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Submitted,
    IdentityVerified,
    IdentityFailed,
    PolicyValid,
    PolicyInvalid,
    FraudLow,
    FraudMedium,
    FraudHigh,
    Rejected,
    Suspended,
    Approved,
    PaymentAuthorized,
    PaymentFailed,
    InReview,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::IdentityVerified => "IDENTITY_VERIFIED",
            ClaimStatus::IdentityFailed => "IDENTITY_FAILED",
            ClaimStatus::PolicyValid => "POLICY_VALID",
            ClaimStatus::PolicyInvalid => "POLICY_INVALID",
            ClaimStatus::FraudLow => "FRAUD_LOW",
            ClaimStatus::FraudMedium => "FRAUD_MEDIUM",
            ClaimStatus::FraudHigh => "FRAUD_HIGH",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::Suspended => "SUSPENDED",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::PaymentAuthorized => "PAYMENT_AUTHORIZED",
            ClaimStatus::PaymentFailed => "PAYMENT_FAILED",
            ClaimStatus::InReview => "IN_REVIEW",
        }
    }

    /// Returns true for statuses after which the claim no longer moves
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ClaimStatus::Rejected | ClaimStatus::Approved | ClaimStatus::PaymentAuthorized
        )
    }

    const ALL: [ClaimStatus; 14] = [
        ClaimStatus::Submitted,
        ClaimStatus::IdentityVerified,
        ClaimStatus::IdentityFailed,
        ClaimStatus::PolicyValid,
        ClaimStatus::PolicyInvalid,
        ClaimStatus::FraudLow,
        ClaimStatus::FraudMedium,
        ClaimStatus::FraudHigh,
        ClaimStatus::Rejected,
        ClaimStatus::Suspended,
        ClaimStatus::Approved,
        ClaimStatus::PaymentAuthorized,
        ClaimStatus::PaymentFailed,
        ClaimStatus::InReview,
    ];
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        ClaimStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ClaimError::UnknownStatus(s.to_string()))
    }
}

/// One entry of a claim's append-only history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEvent {
    pub at: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,
}

impl ClaimEvent {
    pub fn new(at: DateTime<Utc>, status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            at,
            status: status.into(),
            message: message.into(),
        }
    }
}

/// The claim store writes `null` for absent text
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A claim record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub id: ClaimId,
    pub customer_id: String,
    pub full_name: String,
    pub policy_number: String,
    pub claim_type: ClaimType,
    #[serde(with = "rust_decimal::serde::float")]
    pub claimed_amount: Decimal,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub history: Vec<ClaimEvent>,
}

/// A new claim as submitted by a customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimIntake {
    pub customer_id: String,
    pub full_name: String,
    pub policy_number: String,
    pub claim_type: ClaimType,
    #[serde(with = "rust_decimal::serde::float")]
    pub claimed_amount: Decimal,
    #[serde(default)]
    pub description: String,
}

impl ClaimIntake {
    /// Checks the intake locally, before anything is sent to a backend
    ///
    /// # Errors
    ///
    /// Returns [`ClaimError::InvalidInput`] naming the first problem found:
    /// a blank required field, a non-positive amount, or an amount above
    /// [`MAX_CLAIMED_AMOUNT`].
    pub fn validate(&self) -> Result<(), ClaimError> {
        let required = [
            ("customerId", &self.customer_id),
            ("fullName", &self.full_name),
            ("policyNumber", &self.policy_number),
            ("description", &self.description),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ClaimError::invalid_input(format!("{field} is required")));
        }

        if self.claimed_amount <= Decimal::ZERO {
            return Err(ClaimError::invalid_input("claimedAmount must be greater than 0"));
        }
        if self.claimed_amount > MAX_CLAIMED_AMOUNT {
            return Err(ClaimError::invalid_input(format!(
                "claimedAmount exceeds the maximum of {MAX_CLAIMED_AMOUNT}"
            )));
        }

        Ok(())
    }
}

/// Body of a status update pushed to the claim store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ClaimStatus,
    #[serde(default)]
    pub message: String,
}

impl StatusUpdate {
    pub fn new(status: ClaimStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}
