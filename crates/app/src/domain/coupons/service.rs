//! Coupons service.

use std::{sync::Arc, time::Instant};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{Span, error, info};

use crate::{
    codes::{BlockCipherCodes, CodeGenerator},
    domain::coupons::{
        data::NewCampaign,
        errors::CouponsServiceError,
        models::{Campaign, CampaignId, CampaignState, Coupon},
        recorder::{IssuanceRecorder, IssueOutcome, NoopRecorder},
        store::{CouponStore, MemoryCouponStore, PgCouponStore},
    },
};

/// Coupons service backed by `PostgreSQL`.
pub type PgCouponsService = StoreCouponsService<PgCouponStore>;

/// Coupons service backed by process memory.
pub type MemoryCouponsService = StoreCouponsService<MemoryCouponStore>;

#[derive(Debug, Clone)]
pub struct StoreCouponsService<S, G = BlockCipherCodes> {
    store: S,
    codes: G,
    recorder: Arc<dyn IssuanceRecorder>,
}

impl<S: CouponStore> StoreCouponsService<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            codes: BlockCipherCodes::new(),
            recorder: Arc::new(NoopRecorder),
        }
    }
}

impl<S: CouponStore, G: CodeGenerator> StoreCouponsService<S, G> {
    /// Replace the code generator used when creating campaigns.
    #[must_use]
    pub fn with_generator<H: CodeGenerator>(self, codes: H) -> StoreCouponsService<S, H> {
        StoreCouponsService {
            store: self.store,
            codes,
            recorder: self.recorder,
        }
    }

    #[must_use]
    pub fn with_recorder(self, recorder: Arc<dyn IssuanceRecorder>) -> Self {
        Self { recorder, ..self }
    }

    async fn reserve(&self, campaign: CampaignId) -> Result<Coupon, CouponsServiceError> {
        let loaded = self.store.get_campaign(campaign).await?;

        if loaded.state_at(Timestamp::now()) == CampaignState::PendingStart {
            return Err(CouponsServiceError::NotStarted);
        }

        self.store.reserve_coupon(campaign).await
    }
}

/// Accepts counts in `1..=i32::MAX`.
fn pool_size(requested: i64) -> Result<u32, CouponsServiceError> {
    i32::try_from(requested)
        .ok()
        .filter(|count| count.is_positive())
        .map(i32::unsigned_abs)
        .ok_or(CouponsServiceError::InvalidCouponCount(requested))
}

#[async_trait]
impl<S: CouponStore, G: CodeGenerator> CouponsService for StoreCouponsService<S, G> {
    #[tracing::instrument(
        name = "coupons.service.create_campaign",
        skip(self, campaign),
        fields(
            available_coupons = campaign.available_coupons,
            campaign_id = tracing::field::Empty
        ),
        err
    )]
    async fn create_campaign(
        &self,
        campaign: NewCampaign,
    ) -> Result<Campaign, CouponsServiceError> {
        let available_coupons = pool_size(campaign.available_coupons)?;

        let created = self
            .store
            .create_campaign(available_coupons, campaign.start_date, &self.codes)
            .await?;

        Span::current().record("campaign_id", tracing::field::display(created.id));

        info!(campaign_id = %created.id, available_coupons, "created campaign");

        Ok(created)
    }

    async fn get_campaign(&self, campaign: CampaignId) -> Result<Campaign, CouponsServiceError> {
        self.store.get_campaign_with_codes(campaign).await
    }

    #[tracing::instrument(
        name = "coupons.service.issue_coupon",
        skip(self),
        fields(campaign_id = %campaign)
    )]
    async fn issue_coupon(&self, campaign: CampaignId) -> Result<Coupon, CouponsServiceError> {
        let started = Instant::now();

        let result = self.reserve(campaign).await;

        let outcome = IssueOutcome::from_result(&result);
        let elapsed = started.elapsed();

        self.recorder.record(outcome, elapsed);

        match &result {
            Ok(coupon) => info!(
                code = %coupon.code,
                elapsed_ms = elapsed.as_millis(),
                "issued coupon"
            ),
            Err(err) if outcome == IssueOutcome::Failed => error!(
                error = %err,
                elapsed_ms = elapsed.as_millis(),
                "coupon issuance failed"
            ),
            Err(_) => info!(
                outcome = outcome.as_str(),
                elapsed_ms = elapsed.as_millis(),
                "coupon not issued"
            ),
        }

        result
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Creates a campaign together with its full pool of coupons.
    async fn create_campaign(&self, campaign: NewCampaign)
    -> Result<Campaign, CouponsServiceError>;

    /// Retrieve a campaign with its issued codes, oldest issuance first.
    async fn get_campaign(&self, campaign: CampaignId) -> Result<Campaign, CouponsServiceError>;

    /// Issues the next available coupon of a started campaign.
    async fn issue_coupon(&self, campaign: CampaignId) -> Result<Coupon, CouponsServiceError>;
}
