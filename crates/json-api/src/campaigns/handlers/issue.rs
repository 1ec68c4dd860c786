//! Issue Coupon Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use coupon_app::domain::coupons::models::CampaignId;

use crate::{
    campaigns::{errors::into_status_error, models::CouponResponse},
    extensions::*,
};

/// Issue Coupon Handler
///
/// Issues the next available coupon of a started campaign.
#[endpoint(
    tags("campaigns"),
    summary = "Issue Coupon",
    responses(
        (status_code = StatusCode::CREATED, description = "Coupon issued"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::CONFLICT, description = "No coupons left"),
        (status_code = StatusCode::PRECONDITION_FAILED, description = "Campaign has not started"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<i64>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CouponResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let coupon = state
        .app
        .coupons
        .issue_coupon(CampaignId::from_i64(campaign.into_inner()))
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(coupon.into()))
}
