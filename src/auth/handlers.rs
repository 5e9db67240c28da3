use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{CadastroForm, LoginForm, ProfileUpdatedResponse, UpdateProfileRequest},
        password,
        repo::{self, User},
    },
    error::ApiError,
    session::{
        clear_session_cookie, session_cookie, token_from_headers, Authenticated, SessionUser,
    },
    state::AppState,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Emails are trimmed and lowercased before every store operation, so the
/// UNIQUE column behaves case-insensitively.
pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// POST /cadastro (form). Redirects to /login on success, back to
/// /cadastro on any failure.
#[instrument(skip(state, form))]
pub async fn cadastro(State(state): State<AppState>, Form(form): Form<CadastroForm>) -> Redirect {
    let name = form.name.as_deref().unwrap_or("").trim().to_string();
    let email = normalize_email(form.email.as_deref().unwrap_or(""));
    let password = form.password.unwrap_or_default();

    if name.is_empty() || email.is_empty() || password.is_empty() {
        warn!("registration with missing fields");
        return Redirect::to("/cadastro");
    }
    if !is_valid_email(&email) {
        warn!(%email, "invalid email");
        return Redirect::to("/cadastro");
    }

    let hash = match password::hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Redirect::to("/cadastro");
        }
    };

    match User::create(&state.db, &name, &email, &hash).await {
        Ok(user) => {
            info!(user_id = user.id, email = %user.email, "user registered");
            Redirect::to("/login")
        }
        Err(e) if repo::is_unique_violation(&e) => {
            warn!(%email, "email already registered");
            Redirect::to("/cadastro")
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            Redirect::to("/cadastro")
        }
    }
}

/// POST /login (form). On success opens a session, hands the opaque token
/// to the browser and redirects to /perfil; any failure goes back to
/// /login without revealing whether the email or the password was wrong.
#[instrument(skip(state, form))]
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let email = normalize_email(form.email.as_deref().unwrap_or(""));
    let password = form.password.unwrap_or_default();

    if email.is_empty() || password.is_empty() {
        warn!("login with missing fields");
        return Redirect::to("/login").into_response();
    }

    match repo::authenticate(&state.db, &email, &password).await {
        Ok(Some(user)) => {
            let token = state.sessions.open(SessionUser {
                user_id: user.id,
                email: user.email.clone(),
                name: user.name.clone(),
            });
            info!(user_id = user.id, "user logged in");
            (
                [(
                    header::SET_COOKIE,
                    session_cookie(token, state.sessions.ttl()),
                )],
                Redirect::to("/perfil"),
            )
                .into_response()
        }
        Ok(None) => {
            warn!(%email, "login rejected");
            Redirect::to("/login").into_response()
        }
        Err(e) => {
            error!(error = %e, "authenticate failed");
            Redirect::to("/login").into_response()
        }
    }
}

/// GET /logout. Clears the session and the cookie unconditionally.
#[instrument(skip(state, headers))]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = token_from_headers(&headers) {
        state.sessions.close(token);
    }
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/"),
    )
}

/// POST /api/perfil/atualizar (JSON). Renames the user and patches the
/// live session so later page reads show the new name without re-login.
#[instrument(skip(state, auth, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth: Authenticated,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileUpdatedResponse>, ApiError> {
    let name = payload.name.as_deref().unwrap_or("").trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("O novo nome é obrigatório.".into()));
    }

    let updated = User::update_name(&state.db, auth.user.user_id, &name).await?;
    if !updated {
        return Err(ApiError::NotFound("Usuário não encontrado.".into()));
    }

    state.sessions.set_name(auth.token, &name);
    info!(user_id = auth.user.user_id, "profile name updated");
    Ok(Json(ProfileUpdatedResponse {
        success: true,
        message: "Perfil atualizado com sucesso.".into(),
        new_name: name,
    }))
}
