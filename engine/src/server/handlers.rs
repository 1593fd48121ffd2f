//! Route handlers
//!
//! Handlers never surface a 500: validation problems re-render the form that
//! caused them, auth problems land on the login page, and store failures show
//! the generic retry message.

use super::forms::{AdviceForm, LoginForm, RegisterForm};
use super::{views, AppState};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use sdk::errors::{AppError, AppErrorExt};
use sdk::types::{normalize_email, AdvisorRequest, UserProfile};
use serde_json::json;

/// GET /
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match current_user(&state, &headers).await {
        Ok(Some(_)) => Redirect::to("/dashboard").into_response(),
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => not_signed_in(&state, e),
    }
}

/// GET /register
pub async fn register_page() -> Html<String> {
    Html(views::register_page(None, &RegisterForm::default()))
}

/// POST /register
///
/// Creates the account and signs the new user in.
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    if let Err(e) = form.validate() {
        return register_failure(&e, &form);
    }

    let hasher = state.hasher.clone();
    let password = form.password.clone();
    let hash = match blocking(move || hasher.hash(&password)).await {
        Ok(Ok(hash)) => hash,
        Ok(Err(e)) => return register_failure(&AppError::from(e), &form),
        Err(e) => return register_failure(&e, &form),
    };

    let user = match state.users.create_user(&form.to_new_user(hash)).await {
        Ok(user) => user,
        Err(e) => {
            let e = AppError::from(e);
            if !e.is_validation() {
                tracing::error!("Failed to create user: {}", e);
            }
            return register_failure(&e, &form);
        }
    };

    tracing::info!(user_id = %user.id, "Registered new user");

    match state.sessions.create_session(&user.id).await {
        Ok(token) => signed_in(&state, &token),
        Err(e) => {
            tracing::error!(user_id = %user.id, "Failed to open session after registration: {}", e);
            Redirect::to("/login").into_response()
        }
    }
}

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(views::login_page(None, ""))
}

/// POST /login
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    if let Err(e) = form.validate() {
        return login_failure(&e, &form.email);
    }

    let user = match state
        .users
        .find_user_by_email(&normalize_email(&form.email))
        .await
    {
        Ok(user) => user,
        Err(e) => {
            let e = AppError::from(e);
            tracing::error!("Failed to look up user: {}", e);
            return login_failure(&e, &form.email);
        }
    };

    let hasher = state.hasher.clone();
    let password = form.password.clone();
    let verified = match user {
        Some(user) => {
            let stored = user.password_hash.clone();
            match blocking(move || hasher.verify(&password, &stored)).await {
                Ok(true) => Some(user),
                Ok(false) => None,
                Err(e) => return login_failure(&e, &form.email),
            }
        }
        None => {
            // Same cost as a real check
            if let Err(e) = blocking(move || hasher.dummy_verify(&password)).await {
                return login_failure(&e, &form.email);
            }
            None
        }
    };

    let Some(user) = verified else {
        tracing::info!("Rejected login attempt");
        return login_failure(&AppError::InvalidCredentials, &form.email);
    };

    match state.sessions.create_session(&user.id).await {
        Ok(token) => {
            tracing::info!(user_id = %user.id, "User logged in");
            signed_in(&state, &token)
        }
        Err(e) => {
            let e = AppError::from(e);
            tracing::error!(user_id = %user.id, "Failed to open session: {}", e);
            login_failure(&e, &form.email)
        }
    }
}

/// GET /dashboard
pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match current_user(&state, &headers).await {
        Ok(Some(user)) => Html(views::dashboard(&user, None)).into_response(),
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => not_signed_in(&state, e),
    }
}

/// POST /advisor
///
/// The profile is read again on every request so edits made elsewhere show
/// up in the very next answer.
pub async fn advisor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AdviceForm>,
) -> Response {
    let user = match current_user(&state, &headers).await {
        Ok(Some(user)) => user,
        Ok(None) => return Redirect::to("/login").into_response(),
        Err(e) => return not_signed_in(&state, e),
    };

    let request = AdvisorRequest::new(user, form.prompt.as_deref());
    let advice = state.advisor.resolve(&request).await;

    tracing::info!(
        user_id = %request.profile.id,
        source = ?advice.source,
        "Advice resolved"
    );

    Html(views::dashboard(
        &request.profile,
        Some((&request.prompt, &advice.text)),
    ))
    .into_response()
}

/// POST /logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = state.cookies.token(&headers) {
        if let Err(e) = state.sessions.destroy_session(&token).await {
            tracing::warn!("Failed to destroy session: {}", e);
        }
    }

    session_ended(&state)
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let advisor = if state.advisor.is_live() {
        "live"
    } else {
        "template"
    };

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "advisor": advisor,
    }))
}

/// Profile behind the request's session cookie
///
/// `Ok(None)` means no signed cookie was sent. A signed cookie whose session
/// is gone (logged out, expired, user deleted) is `AppError::SessionExpired`.
async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<Option<UserProfile>, AppError> {
    let Some(token) = state.cookies.token(headers) else {
        return Ok(None);
    };

    let Some(user_id) = state.sessions.resolve_session(&token).await? else {
        return Err(AppError::SessionExpired);
    };

    match state.users.find_user_by_id(&user_id).await? {
        Some(user) => Ok(Some(user)),
        None => {
            tracing::warn!(user_id = %user_id, "Session points at a missing user");
            Err(AppError::SessionExpired)
        }
    }
}

/// Stale sessions drop the cookie and go to the login page
fn not_signed_in(state: &AppState, error: AppError) -> Response {
    if error.is_auth() {
        tracing::debug!("{}", error);
        session_ended(state)
    } else {
        failure_page(&error)
    }
}

fn session_ended(state: &AppState) -> Response {
    (
        [(header::SET_COOKIE, state.cookies.clear())],
        Redirect::to("/login"),
    )
        .into_response()
}

fn signed_in(state: &AppState, token: &str) -> Response {
    (
        [(header::SET_COOKIE, state.cookies.set(token))],
        Redirect::to("/dashboard"),
    )
        .into_response()
}

fn status_for(error: &AppError) -> StatusCode {
    if error.is_validation() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else if error.is_auth() {
        StatusCode::UNAUTHORIZED
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

fn register_failure(error: &AppError, form: &RegisterForm) -> Response {
    (
        status_for(error),
        Html(views::register_page(Some(error.user_hint()), form)),
    )
        .into_response()
}

fn login_failure(error: &AppError, email: &str) -> Response {
    (
        status_for(error),
        Html(views::login_page(Some(error.user_hint()), email)),
    )
        .into_response()
}

fn failure_page(error: &AppError) -> Response {
    tracing::error!("Request failed: {}", error);
    (
        status_for(error),
        Html(views::error_page(error.user_hint())),
    )
        .into_response()
}

/// Run CPU-bound work (password hashing) off the async workers
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Persistence(format!("blocking task failed: {}", e)))
}
