//! Coupon Repositories

mod campaigns;
mod coupons;

pub(crate) use campaigns::PgCampaignsRepository;
pub(crate) use coupons::PgCouponsRepository;
