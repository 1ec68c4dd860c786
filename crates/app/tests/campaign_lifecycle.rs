//! End-to-end campaign lifecycle over the in-memory store.

use std::{collections::HashSet, sync::Arc};

use coupon_app::{
    codes::{BlockCipherCodes, CODE_LENGTH, CodeGenerator},
    context::AppContext,
    domain::coupons::{CouponsServiceError, data::NewCampaign, recorder::NoopRecorder},
};
use jiff::{SignedDuration, Timestamp};
use testresult::TestResult;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn five_coupons_seven_requests() -> TestResult {
    let context = AppContext::in_memory(Arc::new(NoopRecorder));

    let campaign = context
        .coupons
        .create_campaign(NewCampaign {
            available_coupons: 5,
            start_date: Timestamp::now().checked_sub(SignedDuration::from_secs(1))?,
        })
        .await?;

    let handles: Vec<_> = (0..7)
        .map(|_| {
            let coupons = Arc::clone(&context.coupons);

            tokio::spawn(async move { coupons.issue_coupon(campaign.id).await })
        })
        .collect();

    let mut issued = HashSet::new();
    let mut exhausted = 0;

    for handle in handles {
        match handle.await? {
            Ok(coupon) => {
                assert_eq!(coupon.campaign_id, campaign.id);
                assert_eq!(coupon.code.chars().count(), CODE_LENGTH);
                assert!(issued.insert(coupon.code), "code issued twice");
            }
            Err(CouponsServiceError::Exhausted) => exhausted += 1,
            Err(other) => return Err(other.into()),
        }
    }

    assert_eq!(issued.len(), 5);
    assert_eq!(exhausted, 2);

    let loaded = context.coupons.get_campaign(campaign.id).await?;

    assert_eq!(loaded.available_coupons, 5);
    assert_eq!(
        loaded.issued_coupon_codes.iter().cloned().collect::<HashSet<_>>(),
        issued
    );

    let codes = BlockCipherCodes::new();
    let pool = (0..5)
        .map(|index| codes.generate(campaign.id, index))
        .collect::<Result<HashSet<_>, _>>()?;

    assert_eq!(pool, issued);

    Ok(())
}

#[tokio::test]
async fn future_campaign_refuses_issuance() -> TestResult {
    let context = AppContext::in_memory(Arc::new(NoopRecorder));

    let campaign = context
        .coupons
        .create_campaign(NewCampaign {
            available_coupons: 2,
            start_date: Timestamp::now().checked_add(SignedDuration::from_hours(24))?,
        })
        .await?;

    let result = context.coupons.issue_coupon(campaign.id).await;

    assert!(
        matches!(result, Err(CouponsServiceError::NotStarted)),
        "expected NotStarted, got {result:?}"
    );

    Ok(())
}
