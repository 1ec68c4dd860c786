//! Coupon Stores
//!
//! A store owns campaign and coupon persistence together with the two
//! concurrency-sensitive primitives: all-or-nothing pool creation and
//! skip-on-contention reservation.

use async_trait::async_trait;
use jiff::Timestamp;

use crate::{
    codes::CodeGenerator,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{Campaign, CampaignId, Coupon},
    },
};

mod memory;
mod postgres;

pub use memory::MemoryCouponStore;
pub use postgres::PgCouponStore;

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Create a campaign and its full pool of available coupons.
    ///
    /// Either the campaign and every coupon become visible, or nothing does.
    async fn create_campaign(
        &self,
        available_coupons: u32,
        start_date: Timestamp,
        codes: &dyn CodeGenerator,
    ) -> Result<Campaign, CouponsServiceError>;

    /// Load a campaign without its issued codes.
    async fn get_campaign(&self, campaign: CampaignId) -> Result<Campaign, CouponsServiceError>;

    /// Load a campaign with its issued codes, oldest issuance first.
    async fn get_campaign_with_codes(
        &self,
        campaign: CampaignId,
    ) -> Result<Campaign, CouponsServiceError>;

    /// Claim the oldest available coupon that no concurrent reservation holds.
    ///
    /// The coupon is stamped once it is locked. Fails with
    /// [`CouponsServiceError::Exhausted`] when none is left.
    async fn reserve_coupon(&self, campaign: CampaignId) -> Result<Coupon, CouponsServiceError>;
}

/// Generate the `count` codes making up a campaign's pool, in pool order.
pub(crate) fn generate_pool(
    codes: &dyn CodeGenerator,
    campaign: CampaignId,
    count: u32,
) -> Result<Vec<String>, CouponsServiceError> {
    (0..u64::from(count))
        .map(|index| codes.generate(campaign, index).map_err(Into::into))
        .collect()
}
