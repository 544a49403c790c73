//! `Authorization: tma <initData>` authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use super::{
    errors::ApiError,
    state::{AppState, AuthConfig},
};
use crate::init_data::{self, InitData};

const AUTH_SCHEME: &str = "tma ";

/// An authenticated Mini App launch, extracted from the request headers.
#[derive(Debug, Clone)]
pub struct TelegramAuth {
    /// The validated launch payload.
    pub init_data: InitData,
    /// Whether the launching user is on the admin allowlist.
    pub is_admin: bool,
}

/// A launch by a user on the admin allowlist.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub TelegramAuth);

impl<S> FromRequestParts<S> for TelegramAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        authenticate(&parts.headers, &state.auth)
    }
}

impl<S> FromRequestParts<S> for AdminAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = TelegramAuth::from_request_parts(parts, state).await?;
        if !auth.is_admin {
            return Err(ApiError::Forbidden);
        }
        Ok(AdminAuth(auth))
    }
}

/// Validates the `tma` credential in `headers`.
pub fn authenticate(headers: &HeaderMap, auth: &AuthConfig) -> Result<TelegramAuth, ApiError> {
    let bot_token = auth.bot_token.as_deref().ok_or(ApiError::Misconfigured)?;

    let raw = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(AUTH_SCHEME))
        .ok_or(ApiError::MissingInitData)?;

    let init_data = init_data::validate(raw, bot_token, auth.max_age_seconds)?;
    let is_admin = init_data.user_id().is_some_and(|id| auth.is_admin(id));
    tracing::debug!("Authenticated user {:?} (admin: {is_admin})", init_data.user_id());

    Ok(TelegramAuth { init_data, is_admin })
}
