//! Web server
//!
//! Server-rendered pages for registration, login and the advisor dashboard.
//!
//! # Routes
//!
//! - GET  /           - Redirect to the dashboard or the login page
//! - GET  /register   - Registration form
//! - POST /register   - Create an account and sign in
//! - GET  /login      - Login form
//! - POST /login      - Sign in
//! - GET  /dashboard  - Profile summary and advisor form
//! - POST /advisor    - Ask the advisor
//! - POST /logout     - Sign out
//! - GET  /health     - JSON status

use crate::advisor::AdvisorResolver;
use crate::auth::{AuthError, PasswordHasher, TokenSigner};
use crate::config::Config;
use crate::db::{Database, SessionRepository, UserRepository};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use tower_http::trace::TraceLayer;

pub mod cookies;
pub mod forms;
pub mod handlers;
pub mod views;

pub use cookies::SessionCookies;

/// State shared by every handler
///
/// Built once at startup from the loaded [`Config`].
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub sessions: SessionRepository,
    pub advisor: AdvisorResolver,
    pub hasher: PasswordHasher,
    pub cookies: SessionCookies,
}

impl AppState {
    /// Build state with an explicit advisor
    pub fn new(config: &Config, db: &Database, advisor: AdvisorResolver) -> Result<Self, AuthError> {
        let signer = match config.session.secret() {
            Some(secret) => TokenSigner::new(&secret),
            None => {
                tracing::warn!(
                    "No session secret configured, using a random one; sessions will not survive a restart"
                );
                TokenSigner::ephemeral()?
            }
        };

        Ok(Self {
            users: db.users(),
            sessions: db.sessions(config.session.ttl()),
            advisor,
            hasher: PasswordHasher::new(config.security.password_iterations),
            cookies: SessionCookies::new(signer, &config.session),
        })
    }

    /// Build state with the advisor described by `config.advisor`
    pub fn from_config(config: &Config, db: &Database) -> Result<Self, AuthError> {
        Self::new(config, db, AdvisorResolver::from_config(&config.advisor))
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route(
            "/register",
            get(handlers::register_page).post(handlers::register),
        )
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/dashboard", get(handlers::dashboard))
        .route("/advisor", post(handlers::advisor))
        .route("/logout", post(handlers::logout))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(config: &Config, db: &Database, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(config, db).context("Failed to build server state")?;

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind to {}", address))?;
    let local = listener
        .local_addr()
        .context("Failed to get local address")?;

    tracing::info!("Compass listening on http://{}", local);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.await;
            tracing::info!("Web server shutting down gracefully");
        })
        .await
        .context("Web server error")?;

    Ok(())
}
