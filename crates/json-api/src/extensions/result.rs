//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::error;

/// Map any error to a logged internal server error.
pub(crate) trait ResultExt<T> {
    fn or_500(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|source| {
            error!(%source, "{context}");

            StatusError::internal_server_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::ResultExt;

    #[test]
    fn errors_become_internal_server_errors() {
        let result: Result<(), &str> = Err("boom");

        let status = result.or_500("failed").err().map(|error| error.code);

        assert_eq!(status, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[test]
    fn values_pass_through() {
        assert_eq!(Ok::<_, &str>(7).or_500("unused").ok(), Some(7));
    }
}
