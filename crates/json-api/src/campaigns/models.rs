//! Campaign HTTP models.

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use coupon_app::domain::coupons::models::{Campaign, Coupon};

/// Campaign Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CampaignResponse {
    /// Campaign identifier
    pub id: i64,

    /// Size of the coupon pool
    pub available_coupons: u32,

    /// RFC 3339 instant from which coupons may be issued
    pub start_date: String,

    /// Issued coupon codes, oldest issuance first
    pub issued_coupon_codes: Vec<String>,
}

impl From<Campaign> for CampaignResponse {
    fn from(campaign: Campaign) -> Self {
        Self {
            id: campaign.id.into_i64(),
            available_coupons: campaign.available_coupons,
            start_date: campaign.start_date.to_string(),
            issued_coupon_codes: campaign.issued_coupon_codes,
        }
    }
}

/// Coupon Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CouponResponse {
    /// Issued coupon code
    pub code: String,

    /// Campaign the coupon belongs to
    pub campaign_id: i64,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            code: coupon.code,
            campaign_id: coupon.campaign_id.into_i64(),
        }
    }
}
