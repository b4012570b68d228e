use std::net::{Ipv4Addr, SocketAddr};

use axum::{
    Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use super::{
    HttpApiDeps,
    middleware::RateLimiterConfig,
    v1::{
        challenge::ChallengeHttpApiController, profit::ProfitHttpApiController,
        proof::ProofHttpApiController, welcome::WelcomeHttpApiController,
        withdraw_signature::WithdrawSignatureHttpApiController,
    },
};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct HttpApiConfig {
    /// Whether the HTTP API server is enabled.
    pub enabled: bool,
    pub port: u16,
    pub rate_limiter: RateLimiterConfig,
}

pub(crate) struct HttpApiRouter {
    config: HttpApiConfig,
    router: Router,
}

/// Maximum request body size in bytes (64 KB)
const MAX_BODY_SIZE: usize = 64 * 1024;

impl HttpApiRouter {
    pub(crate) fn new(config: &HttpApiConfig, deps: HttpApiDeps) -> Self {
        let mut router = Router::new()
            .route("/", get(WelcomeHttpApiController::handle_request))
            .route("/v1/rnd", get(ChallengeHttpApiController::handle_request))
            .route("/v1/proof", post(ProofHttpApiController::handle_request))
            .route(
                "/v1/withdraw/signature",
                get(WithdrawSignatureHttpApiController::handle_request),
            )
            .route("/v1/profit", get(ProfitHttpApiController::handle_request))
            .with_state(deps);

        // Layer order (bottom-to-top, last added runs first):
        // 1. Rate limiter (innermost)
        // 2. Body size limit
        // 3. Request tracing
        // 4. CORS (outermost)

        if let Some(layer) = config.rate_limiter.build_layer() {
            router = router.layer(layer);
            tracing::info!(
                "Rate limiter enabled: {} requests per {} seconds (burst: {})",
                config.rate_limiter.max_requests,
                config.rate_limiter.time_window_seconds,
                config.rate_limiter.effective_burst_size()
            );
        } else {
            tracing::info!("Rate limiter disabled");
        }

        router = router
            .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        HttpApiRouter {
            config: config.to_owned(),
            router,
        }
    }

    pub(crate) async fn listen_and_handle_http_requests(self, shutdown_rx: oneshot::Receiver<()>) {
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.config.port));

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(error) => {
                tracing::error!(address = %addr, error = %error, "Failed to bind HTTP listener");
                return;
            }
        };
        tracing::info!(address = %addr, "HTTP API listening");

        // ConnectInfo<SocketAddr> feeds the per-IP rate limiter.
        let served = axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
            tracing::info!("HTTP server shutting down gracefully");
        })
        .await;

        if let Err(error) = served {
            tracing::error!(error = %error, "HTTP server failed");
        }
    }

    #[cfg(test)]
    fn into_router(self) -> Router {
        self.router
    }
}
