//! State

use std::sync::Arc;

use coupon_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Self {
        Self { app }
    }

    #[must_use]
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self::new(app))
    }

    /// Build state around an arbitrary coupons service.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_coupons(
        coupons: Arc<dyn coupon_app::domain::coupons::CouponsService>,
    ) -> Arc<Self> {
        Self::from_app_context(AppContext {
            coupons,
            database: None,
        })
    }
}
