//! In-memory coupon store.
//!
//! Every coupon sits behind its own lock. Reservations try locks with
//! `try_lock` and move past held ones, so concurrent callers never wait on
//! each other and never claim the same coupon.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex as SyncMutex, PoisonError, RwLock,
        atomic::{AtomicI64, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    codes::CodeGenerator,
    domain::coupons::{
        errors::CouponsServiceError,
        models::{Campaign, CampaignId, Coupon, CouponStatus},
        store::{CouponStore, generate_pool},
    },
};

#[derive(Debug)]
struct CampaignPool {
    campaign: Campaign,
    coupons: Vec<Mutex<Coupon>>,

    /// Every coupon before this position is issued.
    scan_from: AtomicUsize,

    /// Codes of issued coupons. Stamping happens under this lock, so the
    /// vector is in issue order.
    issued: SyncMutex<Vec<String>>,
}

impl CampaignPool {
    fn issued_codes(&self) -> Vec<String> {
        self.issued
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn reserve(&self) -> Option<Coupon> {
        let start = self.scan_from.load(Ordering::Acquire);
        let mut settled_prefix = true;

        for (position, slot) in self.coupons.iter().enumerate().skip(start) {
            // A held lock belongs to a reservation that is about to issue it.
            let Ok(mut coupon) = slot.try_lock() else {
                settled_prefix = false;
                continue;
            };

            if settled_prefix {
                self.scan_from.fetch_max(position + 1, Ordering::AcqRel);
            }

            if coupon.status == CouponStatus::Issued {
                continue;
            }

            let mut issued = self.issued.lock().unwrap_or_else(PoisonError::into_inner);

            coupon.status = CouponStatus::Issued;
            coupon.issued_at = Some(Timestamp::now());

            issued.push(coupon.code.clone());
            drop(issued);

            return Some(coupon.clone());
        }

        None
    }
}

/// Process-local [`CouponStore`] with the same guarantees as the database store.
#[derive(Debug)]
pub struct MemoryCouponStore {
    next_id: AtomicI64,
    campaigns: RwLock<HashMap<CampaignId, Arc<CampaignPool>>>,
    codes: SyncMutex<HashSet<String>>,
}

impl Default for MemoryCouponStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCouponStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(1),
            campaigns: RwLock::new(HashMap::new()),
            codes: SyncMutex::new(HashSet::new()),
        }
    }

    fn pool(&self, campaign: CampaignId) -> Result<Arc<CampaignPool>, CouponsServiceError> {
        self.campaigns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&campaign)
            .cloned()
            .ok_or(CouponsServiceError::NotFound)
    }

    /// Claim `pool` in the global code set, or claim nothing.
    fn claim_codes(&self, pool: &[String]) -> Result<(), CouponsServiceError> {
        let mut codes = self.codes.lock().unwrap_or_else(PoisonError::into_inner);

        let mut staged = HashSet::with_capacity(pool.len());

        for code in pool {
            if codes.contains(code) || !staged.insert(code.as_str()) {
                return Err(CouponsServiceError::DuplicateCode);
            }
        }

        codes.extend(pool.iter().cloned());

        Ok(())
    }
}

#[async_trait]
impl CouponStore for MemoryCouponStore {
    async fn create_campaign(
        &self,
        available_coupons: u32,
        start_date: Timestamp,
        codes: &dyn CodeGenerator,
    ) -> Result<Campaign, CouponsServiceError> {
        let id = CampaignId::from_i64(self.next_id.fetch_add(1, Ordering::Relaxed));
        let now = Timestamp::now();

        let pool = generate_pool(codes, id, available_coupons)?;

        self.claim_codes(&pool)?;

        let campaign = Campaign {
            id,
            available_coupons,
            start_date,
            issued_coupon_codes: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        let coupons = (0..available_coupons)
            .zip(pool)
            .map(|(pool_index, code)| {
                Mutex::new(Coupon {
                    code,
                    campaign_id: id,
                    pool_index,
                    status: CouponStatus::Available,
                    issued_at: None,
                    created_at: now,
                })
            })
            .collect();

        let pool = Arc::new(CampaignPool {
            campaign: campaign.clone(),
            coupons,
            scan_from: AtomicUsize::new(0),
            issued: SyncMutex::new(Vec::new()),
        });

        self.campaigns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, pool);

        debug!(campaign = %id, available_coupons, "campaign pool created");

        Ok(campaign)
    }

    async fn get_campaign(&self, campaign: CampaignId) -> Result<Campaign, CouponsServiceError> {
        Ok(self.pool(campaign)?.campaign.clone())
    }

    async fn get_campaign_with_codes(
        &self,
        campaign: CampaignId,
    ) -> Result<Campaign, CouponsServiceError> {
        let pool = self.pool(campaign)?;

        Ok(Campaign {
            issued_coupon_codes: pool.issued_codes(),
            ..pool.campaign.clone()
        })
    }

    async fn reserve_coupon(&self, campaign: CampaignId) -> Result<Coupon, CouponsServiceError> {
        self.pool(campaign)?
            .reserve()
            .ok_or(CouponsServiceError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use testresult::TestResult;

    use crate::codes::{BlockCipherCodes, CodeError, MockCodeGenerator};

    use super::*;

    #[tokio::test]
    async fn create_campaign_assigns_increasing_ids() -> TestResult {
        let store = MemoryCouponStore::new();
        let codes = BlockCipherCodes::new();

        let first = store.create_campaign(1, Timestamp::now(), &codes).await?;
        let second = store.create_campaign(1, Timestamp::now(), &codes).await?;

        assert!(second.id > first.id);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_coupon_follows_pool_order() -> TestResult {
        let store = MemoryCouponStore::new();
        let codes = BlockCipherCodes::new();

        let campaign = store.create_campaign(4, Timestamp::now(), &codes).await?;

        for index in 0..4 {
            let coupon = store.reserve_coupon(campaign.id).await?;

            assert_eq!(coupon.pool_index, index);
            assert_eq!(coupon.status, CouponStatus::Issued);
            assert_eq!(coupon.code, codes.generate(campaign.id, u64::from(index))?);
        }

        let result = store.reserve_coupon(campaign.id).await;

        assert!(
            matches!(result, Err(CouponsServiceError::Exhausted)),
            "expected Exhausted, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn reserve_coupon_skips_coupons_held_by_another_reservation() -> TestResult {
        let store = MemoryCouponStore::new();
        let campaign = store
            .create_campaign(2, Timestamp::now(), &BlockCipherCodes::new())
            .await?;

        let pool = store.pool(campaign.id)?;
        let held = pool.coupons.first().ok_or("empty pool")?.lock().await;

        let coupon = store.reserve_coupon(campaign.id).await?;

        assert_eq!(coupon.pool_index, 1);
        assert_eq!(pool.scan_from.load(Ordering::Acquire), 0);

        drop(held);

        let coupon = store.reserve_coupon(campaign.id).await?;

        assert_eq!(coupon.pool_index, 0);
        assert_eq!(pool.scan_from.load(Ordering::Acquire), 1);

        let result = store.reserve_coupon(campaign.id).await;

        assert!(matches!(result, Err(CouponsServiceError::Exhausted)));
        assert_eq!(pool.scan_from.load(Ordering::Acquire), 2);

        Ok(())
    }

    #[tokio::test]
    async fn reserve_coupon_unknown_campaign_returns_not_found() {
        let result = MemoryCouponStore::new()
            .reserve_coupon(CampaignId::from_i64(9))
            .await;

        assert!(
            matches!(result, Err(CouponsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn failed_creation_publishes_nothing() -> TestResult {
        let store = MemoryCouponStore::new();
        let mut codes = MockCodeGenerator::new();

        codes.expect_generate().returning(|campaign, index| {
            if index == 3 {
                Err(CodeError::IndexOutOfRange(index))
            } else {
                BlockCipherCodes::new().generate(campaign, index)
            }
        });

        let result = store.create_campaign(5, Timestamp::now(), &codes).await;

        assert!(
            matches!(result, Err(CouponsServiceError::CodeGeneration(_))),
            "expected CodeGeneration, got {result:?}"
        );
        assert!(store.campaigns.read().map_err(|e| e.to_string())?.is_empty());
        assert!(store.codes.lock().map_err(|e| e.to_string())?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_codes_reject_the_whole_pool() -> TestResult {
        let store = MemoryCouponStore::new();

        let first = store
            .create_campaign(3, Timestamp::now(), &BlockCipherCodes::new())
            .await?;

        let mut codes = MockCodeGenerator::new();

        codes.expect_generate().returning(move |_, index| {
            if index == 2 {
                BlockCipherCodes::new().generate(first.id, 0)
            } else {
                Ok(format!("{index}가00000000"))
            }
        });

        let result = store.create_campaign(3, Timestamp::now(), &codes).await;

        assert!(
            matches!(result, Err(CouponsServiceError::DuplicateCode)),
            "expected DuplicateCode, got {result:?}"
        );
        assert_eq!(store.campaigns.read().map_err(|e| e.to_string())?.len(), 1);
        assert_eq!(store.codes.lock().map_err(|e| e.to_string())?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn issued_codes_are_listed_in_issue_order() -> TestResult {
        let store = MemoryCouponStore::new();
        let campaign = store
            .create_campaign(3, Timestamp::now(), &BlockCipherCodes::new())
            .await?;

        let mut issued = Vec::new();
        let mut previous = Timestamp::MIN;

        for _ in 0..3 {
            let coupon = store.reserve_coupon(campaign.id).await?;
            let issued_at = coupon.issued_at.ok_or("issued coupon has no timestamp")?;

            assert!(issued_at >= previous);

            previous = issued_at;
            issued.push(coupon.code);
        }

        let loaded = store.get_campaign_with_codes(campaign.id).await?;

        assert_eq!(loaded.issued_coupon_codes, issued);
        assert!(
            store
                .get_campaign(campaign.id)
                .await?
                .issued_coupon_codes
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_reservations_never_oversell() -> TestResult {
        let store = Arc::new(MemoryCouponStore::new());
        let campaign = store
            .create_campaign(100, Timestamp::now(), &BlockCipherCodes::new())
            .await?;

        let handles: Vec<_> = (0..250)
            .map(|_| {
                let store = Arc::clone(&store);

                tokio::spawn(async move { store.reserve_coupon(campaign.id).await })
            })
            .collect();

        let mut issued = HashSet::new();
        let mut exhausted = 0;

        for handle in handles {
            match handle.await? {
                Ok(coupon) => assert!(issued.insert(coupon.code), "code issued twice"),
                Err(CouponsServiceError::Exhausted) => exhausted += 1,
                Err(other) => return Err(other.into()),
            }
        }

        assert_eq!(issued.len(), 100);
        assert_eq!(exhausted, 150);

        Ok(())
    }
}
