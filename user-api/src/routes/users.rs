/*
 * Copyright 2025 Security Union LLC
 *
 * Licensed under either of
 *
 * * Apache License, Version 2.0
 *   (http://www.apache.org/licenses/LICENSE-2.0)
 * * MIT license
 *   (http://opensource.org/licenses/MIT)
 *
 * at your option.
 */

//! User route handlers: login, logout, profile, lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use oauth2::CsrfToken;
use user_types::{
    requests::{LoginCallbackRequest, UpdateProfileRequest},
    responses::{
        LoginResponse, LoginUrlResponse, LogoutResponse, UserCountResponse, UserNameResponse,
        UserProfile,
    },
    APIResponse,
};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::identity::UNKNOWN;
use crate::oauth::{build_login_url, build_logout_url};
use crate::phone;
use crate::state::AppState;

/// GET /api/users/login/url
///
/// Returns the hosted UI URL with a fresh random `state`.
pub async fn login_url(
    State(state): State<AppState>,
) -> Result<Json<APIResponse<LoginUrlResponse>>, AppError> {
    let csrf_token = CsrfToken::new_random();
    let url = build_login_url(&state.cognito, csrf_token.secret());

    Ok(Json(APIResponse::ok(LoginUrlResponse {
        url,
        state: csrf_token.secret().clone(),
    })))
}

/// POST /api/users/login/callback
///
/// Exchanges the authorization code and provisions the user on first login.
pub async fn login_callback(
    State(state): State<AppState>,
    Json(body): Json<LoginCallbackRequest>,
) -> Result<Json<APIResponse<LoginResponse>>, AppError> {
    let code = body
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::invalid_request("code is required"))?;

    tracing::info!(
        state = body.state.as_deref().unwrap_or_default(),
        "Login callback received"
    );

    let session = state.login.complete(code).await.map_err(|e| {
        tracing::error!("Login callback failed: {e}");
        AppError::login_failed(&e.to_string())
    })?;

    let tokens = session.tokens;
    Ok(Json(APIResponse::ok(LoginResponse {
        access_token: tokens.access_token,
        id_token: tokens.id_token,
        refresh_token: tokens.refresh_token,
        token_type: tokens.token_type.unwrap_or_else(|| "Bearer".to_string()),
        expires_in: tokens.expires_in,
        user: session.identity.to_profile(),
    })))
}

/// POST /api/users/logout
///
/// Tokens are stateless, so logout only hands back the hosted UI logout URL.
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<APIResponse<LogoutResponse>>, AppError> {
    let user = user.require()?;
    tracing::info!("User {} logged out", user.user_id);

    Ok(Json(APIResponse::ok(LogoutResponse {
        user_id: user.user_id,
        message: "로그아웃 성공".to_string(),
        logout_url: build_logout_url(&state.cognito),
    })))
}

/// GET /api/users/me
pub async fn get_me(user: CurrentUser) -> Result<Json<APIResponse<UserProfile>>, AppError> {
    let user = user.require()?;
    Ok(Json(APIResponse::ok(user.to_profile())))
}

/// PUT /api/users/me
///
/// Partial update. A new phone number is normalized and must not be held by
/// another user.
pub async fn update_me(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<APIResponse<UserProfile>>, AppError> {
    let mut user = user.require()?;

    if let Some(name) = non_blank(body.user_name) {
        user.user_name = name;
    }
    if let Some(location) = non_blank(body.user_location) {
        user.user_location = location;
    }
    if let Some(raw) = non_blank(body.phone_number) {
        let normalized = phone::normalize(&raw);
        // Keeping one's current number is never a conflict, even if it is shared.
        if normalized != UNKNOWN && normalized != user.phone_number {
            if let Some(holder) = state.store.find_by_phone(&normalized).await? {
                if holder.user_id != user.user_id {
                    tracing::warn!(
                        "User {} tried to take phone number held by {}",
                        user.user_id,
                        holder.user_id
                    );
                    return Err(AppError::phone_number_taken(&normalized));
                }
            }
        }
        user.phone_number = normalized;
    }

    if !state.store.update(&user).await? {
        return Err(AppError::user_not_found(&user.user_id));
    }
    tracing::info!("Updated profile for user {}", user.user_id);

    Ok(Json(APIResponse::ok(user.to_profile())))
}

/// GET /api/users/count
pub async fn count_users(
    State(state): State<AppState>,
) -> Result<Json<APIResponse<UserCountResponse>>, AppError> {
    let count = state.store.count().await?;
    Ok(Json(APIResponse::ok(UserCountResponse { count })))
}

/// GET /api/users/{user_id}/name
pub async fn get_user_name(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<APIResponse<UserNameResponse>>, AppError> {
    let user = state
        .store
        .find(&user_id)
        .await?
        .ok_or_else(|| AppError::user_not_found(&user_id))?;

    Ok(Json(APIResponse::ok(UserNameResponse {
        user_id: user.user_id,
        user_name: user.user_name,
    })))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
