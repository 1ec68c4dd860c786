//! Coupons Data

use jiff::Timestamp;

/// New Campaign Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCampaign {
    /// Size of the coupon pool. Must be positive.
    pub available_coupons: i64,

    /// Earliest moment coupons may be issued.
    pub start_date: Timestamp,
}
