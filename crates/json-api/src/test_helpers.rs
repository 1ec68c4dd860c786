//! Test helpers.

use std::sync::Arc;

use coupon_app::domain::coupons::{
    MockCouponsService,
    models::{Campaign, CampaignId, Coupon, CouponStatus},
};
use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};

use crate::state::State;

pub(crate) const START_DATE: &str = "2026-10-19T09:00:00Z";

pub(crate) fn start_date() -> Timestamp {
    START_DATE.parse().unwrap_or(Timestamp::UNIX_EPOCH)
}

pub(crate) fn make_campaign(id: i64, codes: &[&str]) -> Campaign {
    Campaign {
        id: CampaignId::from_i64(id),
        available_coupons: 5,
        start_date: start_date(),
        issued_coupon_codes: codes.iter().map(ToString::to_string).collect(),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_coupon(campaign: i64, code: &str) -> Coupon {
    Coupon {
        code: code.to_string(),
        campaign_id: CampaignId::from_i64(campaign),
        pool_index: 0,
        status: CouponStatus::Issued,
        issued_at: Some(Timestamp::UNIX_EPOCH),
        created_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn coupons_service(coupons: MockCouponsService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(State::with_coupons(Arc::new(coupons))))
            .push(route),
    )
}
