//! Errors

use salvo::http::StatusError;
use tracing::error;

use coupon_app::domain::coupons::CouponsServiceError;

pub(crate) fn into_status_error(error: CouponsServiceError) -> StatusError {
    match error {
        CouponsServiceError::NotFound => StatusError::not_found().brief("Campaign not found"),
        CouponsServiceError::NotStarted => {
            StatusError::precondition_failed().brief("Campaign has not started yet")
        }
        CouponsServiceError::Exhausted => StatusError::conflict().brief("No coupons left"),
        CouponsServiceError::InvalidCouponCount(_) => {
            StatusError::bad_request().brief(error.to_string())
        }
        CouponsServiceError::DuplicateCode
        | CouponsServiceError::CodeGeneration(_)
        | CouponsServiceError::Conflict
        | CouponsServiceError::InvalidReference
        | CouponsServiceError::MissingRequiredData
        | CouponsServiceError::InvalidData
        | CouponsServiceError::Sql(_) => {
            error!(error = ?error, "coupon operation failed");

            StatusError::internal_server_error()
        }
    }
}
