use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, request},
    routing::post,
};
use folio_adapters::{
    auth::JwtAuthConfig,
    config::AllowedOrigins,
    http::{
        AppState,
        routes::{
            check_username, forgot_password, login, resend_code, reset_password, sign_out, signup,
            verify_email,
        },
    },
};
use folio_core::{CredentialPolicy, EmailClient, RateLimiter, UserStore};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::tracing::{make_span_with_request_id, on_request, on_response};

/// The credential service: signup, session issuance, email verification and
/// password recovery, assembled as an axum router.
pub struct FolioService {
    router: Router,
}

impl FolioService {
    /// Wire up the routes against the given adapters. All handlers share one
    /// [`AppState`] behind an Arc.
    pub fn new<U, E, R>(
        user_store: U,
        email_client: E,
        rate_limiter: R,
        jwt_config: JwtAuthConfig,
        policy: CredentialPolicy,
    ) -> Self
    where
        U: UserStore + 'static,
        E: EmailClient + 'static,
        R: RateLimiter + 'static,
    {
        let state = Arc::new(AppState::new(
            user_store,
            email_client,
            rate_limiter,
            jwt_config,
            policy,
        ));

        let router = Router::new()
            .route("/signup", post(signup::<U, E, R>))
            .route("/login", post(login::<U, E, R>))
            .route("/verify-email", post(verify_email::<U, E, R>))
            .route("/resend-code", post(resend_code::<U, E, R>))
            .route("/forgot-password", post(forgot_password::<U, E, R>))
            .route("/reset-password", post(reset_password::<U, E, R>))
            .route("/check-username", post(check_username::<U, E, R>))
            .route("/sign-out", post(sign_out::<U, E, R>))
            .with_state(state);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the service into a router that can be nested under another
    /// application.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_credentials(true)
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the service as a standalone server.
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Credential service listening on {}", listener.local_addr()?);

        axum_server::Server::<std::net::SocketAddr>::from_listener(listener)
            .serve(router.into_make_service())
            .await
    }
}
