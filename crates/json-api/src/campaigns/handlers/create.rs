//! Create Campaign Handler

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use coupon_app::domain::coupons::data::NewCampaign;

use crate::{
    campaigns::{errors::into_status_error, models::CampaignResponse},
    extensions::*,
};

/// Create Campaign Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCampaignRequest {
    /// Number of coupons to pre-generate
    pub available_coupons: i64,

    /// RFC 3339 instant from which coupons may be issued
    pub start_date: String,
}

impl TryFrom<CreateCampaignRequest> for NewCampaign {
    type Error = StatusError;

    fn try_from(request: CreateCampaignRequest) -> Result<Self, Self::Error> {
        let start_date = request.start_date.parse::<Timestamp>().map_err(|_parse| {
            StatusError::bad_request().brief("start_date must be an RFC 3339 timestamp")
        })?;

        Ok(NewCampaign {
            available_coupons: request.available_coupons,
            start_date,
        })
    }
}

/// Create Campaign Handler
///
/// Creates a campaign and its full pool of coupons.
#[endpoint(
    tags("campaigns"),
    summary = "Create Campaign",
    responses(
        (status_code = StatusCode::CREATED, description = "Campaign created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCampaignRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CampaignResponse>, StatusError> {
    let state = depot.state_or_500()?;
    let campaign = NewCampaign::try_from(json.into_inner())?;

    let created = state
        .app
        .coupons
        .create_campaign(campaign)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/campaigns/{}", created.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}
