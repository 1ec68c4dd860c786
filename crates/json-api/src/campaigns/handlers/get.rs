//! Get Campaign Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use coupon_app::domain::coupons::models::CampaignId;

use crate::{
    campaigns::{errors::into_status_error, models::CampaignResponse},
    extensions::*,
};

/// Get Campaign Handler
///
/// Returns a campaign with its issued coupon codes.
#[endpoint(
    tags("campaigns"),
    summary = "Get Campaign",
    responses(
        (status_code = StatusCode::OK, description = "Campaign found"),
        (status_code = StatusCode::NOT_FOUND, description = "Campaign not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    campaign: PathParam<i64>,
    depot: &mut Depot,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let campaign = state
        .app
        .coupons
        .get_campaign(CampaignId::from_i64(campaign.into_inner()))
        .await
        .map_err(into_status_error)?;

    Ok(Json(campaign.into()))
}
