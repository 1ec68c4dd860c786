//! `PostgreSQL` coupon store.

use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::{
    codes::CodeGenerator,
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{Campaign, CampaignId, Coupon},
        repositories::{PgCampaignsRepository, PgCouponsRepository},
        store::{CouponStore, generate_pool},
    },
};

#[derive(Debug, Clone)]
pub struct PgCouponStore {
    db: Db,
    campaigns: PgCampaignsRepository,
    coupons: PgCouponsRepository,
}

impl PgCouponStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            campaigns: PgCampaignsRepository::new(),
            coupons: PgCouponsRepository::new(),
        }
    }

    async fn begin_transaction(
        &self,
    ) -> Result<Transaction<'static, Postgres>, CouponsServiceError> {
        self.db.begin_transaction().await.map_err(Into::into)
    }
}

#[async_trait]
impl CouponStore for PgCouponStore {
    async fn create_campaign(
        &self,
        available_coupons: u32,
        start_date: Timestamp,
        codes: &dyn CodeGenerator,
    ) -> Result<Campaign, CouponsServiceError> {
        let mut tx = self.begin_transaction().await?;

        let campaign = self
            .campaigns
            .create_campaign(&mut tx, available_coupons, start_date)
            .await?;

        let pool = generate_pool(codes, campaign.id, available_coupons)?;

        let inserted = self
            .coupons
            .insert_coupons(&mut tx, campaign.id, &pool, campaign.created_at)
            .await?;

        tx.commit().await?;

        debug!(campaign = %campaign.id, inserted, "campaign pool created");

        Ok(campaign)
    }

    async fn get_campaign(&self, campaign: CampaignId) -> Result<Campaign, CouponsServiceError> {
        let mut tx = self.begin_transaction().await?;

        let campaign = self.campaigns.get_campaign(&mut tx, campaign).await?;

        tx.commit().await?;

        Ok(campaign)
    }

    async fn get_campaign_with_codes(
        &self,
        campaign: CampaignId,
    ) -> Result<Campaign, CouponsServiceError> {
        let mut tx = self.begin_transaction().await?;

        let mut loaded = self.campaigns.get_campaign(&mut tx, campaign).await?;

        loaded.issued_coupon_codes = self.coupons.list_issued_codes(&mut tx, campaign).await?;

        tx.commit().await?;

        Ok(loaded)
    }

    async fn reserve_coupon(&self, campaign: CampaignId) -> Result<Coupon, CouponsServiceError> {
        let mut tx = self.begin_transaction().await?;

        let Some(code) = self
            .coupons
            .select_available_coupon(&mut tx, campaign)
            .await?
        else {
            return Err(CouponsServiceError::Exhausted);
        };

        let Some(coupon) = self
            .coupons
            .mark_coupon_issued(&mut tx, &code, Timestamp::now())
            .await?
        else {
            return Err(CouponsServiceError::Conflict);
        };

        tx.commit().await?;

        Ok(coupon)
    }
}
