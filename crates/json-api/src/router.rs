//! App Router

use salvo::Router;

use crate::campaigns;

pub(crate) fn app_router() -> Router {
    Router::with_path("campaigns")
        .post(campaigns::create::handler)
        .push(
            Router::with_path("{campaign}")
                .get(campaigns::get::handler)
                .push(Router::with_path("coupons").post(campaigns::issue::handler)),
        )
}
