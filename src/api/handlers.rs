use axum::Json;
use serde::Serialize;

use super::auth::{AdminAuth, TelegramAuth};
use crate::{
    deep_link::{StartParam, parse_start_param},
    init_data::WebAppUser,
};

/// The caller's identity as seen by the backend.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// The launching user, if the launch carried one.
    pub user: Option<WebAppUser>,
    /// Unix timestamp at which Telegram signed the launch.
    pub auth_date: i64,
    /// Query id of the launch, if any.
    pub query_id: Option<String>,
    /// The raw `start_param`, if any.
    pub start_param: Option<String>,
    /// `start_param` decoded as a deep link.
    pub launch: StartParam,
    /// Whether the user is on the admin allowlist.
    pub is_admin: bool,
}

impl From<TelegramAuth> for MeResponse {
    fn from(auth: TelegramAuth) -> Self {
        let init_data = auth.init_data;
        let launch = init_data.start_param.as_deref().map(parse_start_param).unwrap_or_default();

        Self {
            user: init_data.user,
            auth_date: init_data.auth_date,
            query_id: init_data.query_id,
            start_param: init_data.start_param,
            launch,
            is_admin: auth.is_admin,
        }
    }
}

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Returns the caller's identity.
pub async fn me(auth: TelegramAuth) -> Json<MeResponse> {
    Json(MeResponse::from(auth))
}

/// Returns the caller's identity, for admins only.
pub async fn admin_me(AdminAuth(auth): AdminAuth) -> Json<MeResponse> {
    Json(MeResponse::from(auth))
}
