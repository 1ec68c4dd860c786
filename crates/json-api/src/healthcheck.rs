//! Healthcheck Handler

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extensions::*;

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Liveness check. Does not touch the coupon store.
#[endpoint(tags("health"), summary = "Health check endpoint")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Database readiness check. Answers 503 while the coupon database is unreachable.
#[endpoint(
    tags("health"),
    summary = "Database health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Database reachable"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Database unreachable"),
    ),
)]
pub(crate) async fn database_handler(
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<HealthResponse>, StatusError> {
    let state = depot.state_or_500()?;

    let status = match state.app.check_database().await {
        Ok(()) => "ok",
        Err(error) => {
            warn!(error = %error, "database health check failed");

            res.status_code(StatusCode::SERVICE_UNAVAILABLE);

            "unavailable"
        }
    };

    Ok(Json(HealthResponse {
        status: status.to_string(),
    }))
}
