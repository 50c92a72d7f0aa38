use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            LoginRequest, ProfileResponse, ProfileUser, RegisterRequest, RegisterResponse,
            TokenResponse,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::{is_unique_violation, AppError},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register))
        .route("/sessions/password", post(authenticate))
        .route("/profile", get(get_profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    payload.email = payload.email.trim().to_lowercase();

    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::bad_request(
            "User with same e-mail already exists.",
            "Usuário com este e-mail já existe.",
        ));
    }

    let hash = hash_password(&payload.password)?;

    let user = User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &hash,
        payload.avatar_url.as_deref(),
    )
    .await
    .map_err(|e| {
        // Concurrent registration can still trip the unique index.
        if is_unique_violation(&e) {
            AppError::bad_request(
                "User with same e-mail already exists.",
                "Usuário com este e-mail já existe.",
            )
        } else {
            AppError::Database(e)
        }
    })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully.",
            display_message: "Conta criada com sucesso.",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn authenticate(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = User::find_by_email(&state.db, &payload.email)
        .await?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            AppError::bad_request("Invalid credentials.", "Credenciais inválidas.")
        })?;

    let Some(stored_hash) = user.password_hash.as_deref() else {
        warn!(user_id = %user.id, "social-only account attempted password login");
        return Err(AppError::bad_request(
            "User does not have a password, use social login.",
            "Usuário não possui senha, use login social.",
        ));
    };

    if !verify_password(&payload.password, stored_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::bad_request(
            "Invalid credentials.",
            "Credenciais inválidas.",
        ));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, "user authenticated");
    Ok(Json(TokenResponse { token }))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::bad_request("User not found.", "Usuário não encontrado."))?;

    Ok(Json(ProfileResponse {
        user: ProfileUser {
            id: user.id,
            name: user.name,
            email: user.email,
            avatar_url: user.avatar_url,
        },
    }))
}
