//! Coupons service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::codes::CodeError;

#[derive(Debug, Error)]
pub enum CouponsServiceError {
    #[error("campaign not found")]
    NotFound,

    #[error("campaign has not started yet")]
    NotStarted,

    #[error("no coupons left")]
    Exhausted,

    #[error("available coupons must be between 1 and {max}, got {0}", max = i32::MAX)]
    InvalidCouponCount(i64),

    #[error("generated coupon code already exists")]
    DuplicateCode,

    #[error("failed to generate coupon code")]
    CodeGeneration(#[from] CodeError),

    #[error("coupon was claimed by a concurrent reservation")]
    Conflict,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CouponsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicateCode,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}
