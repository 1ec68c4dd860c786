//! Coupon JSON API Server

use std::{process, sync::Arc};

use salvo::{
    affix_state::inject,
    oapi::{OpenApi, swagger_ui::SwaggerUi},
    prelude::*,
    trailing_slash::remove_slash,
};
use tracing::{error, info};

use coupon_app::{context::AppContext, domain::coupons::recorder::IssuanceRecorder};

use crate::{
    config::{ServerConfig, db::StoreKind},
    observability::IssuanceMetrics,
    state::State,
};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod campaigns;
mod config;
mod extensions;
mod healthcheck;
mod observability;
mod router;
mod shutdown;
mod state;
#[cfg(test)]
mod test_helpers;

/// Coupon JSON API Server entry point
#[tokio::main]
pub async fn main() {
    let config = ServerConfig::load().unwrap_or_else(|e| {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized yet, must use eprintln for config errors"
        )]
        {
            eprintln!("Configuration error: {e}");
        }

        process::exit(1);
    });

    if let Err(init_error) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialize, must use eprintln"
        )]
        {
            eprintln!("{init_error}");
        }

        process::exit(1);
    }

    let recorder: Arc<dyn IssuanceRecorder> = Arc::new(IssuanceMetrics);

    let app = match (config.database.store, config.database.database_url.as_deref()) {
        (StoreKind::Memory, _) => {
            info!("using in-memory coupon store");

            AppContext::in_memory(recorder)
        }
        (StoreKind::Postgres, Some(url)) => {
            match AppContext::from_database_url(url, config.database.pool_settings(), recorder)
                .await
            {
                Ok(app) => app,
                Err(init_error) => {
                    error!(error = ?init_error, "failed to initialize app context");

                    process::exit(1);
                }
            }
        }
        (StoreKind::Postgres, None) => {
            error!("DATABASE_URL is required for the postgres store");

            process::exit(1);
        }
    };

    let addr = config.socket_addr();

    info!("Starting server on {addr}");

    let listener = TcpListener::new(addr).bind().await;

    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(observability::request_logging)
        .hoop(remove_slash())
        .hoop(inject(State::from_app_context(app)))
        .push(
            Router::with_path("healthcheck")
                .get(healthcheck::handler)
                .push(Router::with_path("db").get(healthcheck::database_handler)),
        )
        .push(Router::with_path("metrics").get(observability::metrics_handler))
        .push(router::app_router());

    let doc = OpenApi::new("Coupon API", env!("CARGO_PKG_VERSION")).merge_router(&router);

    let router = router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"));

    let server = Server::new(listener);

    let handle = server.handle();

    tokio::spawn(async move {
        if let Err(error) = shutdown::listen(handle).await {
            error!("failed to listen for shutdown signal: {error}");
        }
    });

    server.serve(router).await;

    info!("server stopped");
}
