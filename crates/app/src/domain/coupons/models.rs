//! Coupon Models

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use thiserror::Error;

use crate::ids::TypedId;

/// Campaign Id
pub type CampaignId = TypedId<Campaign>;

/// Campaign Model
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub id: CampaignId,
    pub available_coupons: u32,
    pub start_date: Timestamp,

    /// Issued codes, oldest issuance first. Empty unless explicitly loaded.
    pub issued_coupon_codes: Vec<String>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Campaign {
    /// Derive the campaign's issuance state at `now`.
    #[must_use]
    pub fn state_at(&self, now: Timestamp) -> CampaignState {
        if now < self.start_date {
            CampaignState::PendingStart
        } else {
            CampaignState::Active
        }
    }
}

/// Campaign issuance state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignState {
    /// The start date has not been reached; issuance is refused.
    PendingStart,

    /// Issuance may be attempted.
    Active,
}

/// Coupon Model
#[derive(Debug, Clone, PartialEq)]
pub struct Coupon {
    pub code: String,
    pub campaign_id: CampaignId,

    /// Index the code was generated from.
    pub pool_index: u32,

    pub status: CouponStatus,
    pub issued_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Coupon lifecycle. `Available` moves to `Issued` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponStatus {
    Available,
    Issued,
}

impl CouponStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Issued => "issued",
        }
    }
}

impl fmt::Display for CouponStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown coupon status \"{0}\"")]
pub struct UnknownCouponStatus(String);

impl FromStr for CouponStatus {
    type Err = UnknownCouponStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "available" => Ok(Self::Available),
            "issued" => Ok(Self::Issued),
            other => Err(UnknownCouponStatus(other.to_string())),
        }
    }
}
