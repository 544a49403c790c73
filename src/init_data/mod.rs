//! Validation of the signed launch payload (`initData`) that Telegram hands to
//! a Mini App.
//!
//! Telegram signs the payload in two stages: a secret key is derived as
//! `HMAC-SHA256(key = "WebAppData", message = bot_token)`, and the payload's
//! data-check-string is signed with that key. The data-check-string is every
//! field except `hash`, sorted by key, rendered as `key=value` and joined with
//! `\n`.


use std::collections::BTreeMap;

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Default freshness window for init data: 24 hours.
pub const DEFAULT_MAX_AGE_SECONDS: i64 = 86_400;

const WEB_APP_DATA_KEY: &[u8] = b"WebAppData";
const HASH_FIELD: &str = "hash";
const HASH_HEX_LEN: usize = 64;

/// Reasons a launch payload is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitDataError {
    /// The payload carries no `hash` field.
    #[error("Init data has no hash")]
    MissingHash,
    /// The `hash` does not match the payload.
    #[error("Init data signature does not match")]
    InvalidSignature,
    /// `auth_date` is missing or not an integer.
    #[error("Init data auth_date is missing or not an integer")]
    InvalidAuthDate,
    /// `auth_date` is older than the allowed age.
    #[error("Init data expired: signed {age}s ago, allowed {max_age}s")]
    Expired {
        /// Seconds since `auth_date`.
        age: i64,
        /// The configured maximum, in seconds.
        max_age: i64,
    },
    /// `user` is not valid user JSON.
    #[error("Init data user payload is invalid: {0}")]
    InvalidUserPayload(String),
}

type Result<T> = std::result::Result<T, InitDataError>;

/// The Telegram user embedded in init data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppUser {
    /// Telegram user id.
    pub id: u64,
    /// User's first name.
    pub first_name: String,
    /// User's last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Username without the leading `@`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// IETF language tag of the user's client.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,
    /// `true` for Telegram Premium users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_premium: Option<bool>,
    /// Profile photo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    /// Whether the bot may message the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allows_write_to_pm: Option<bool>,
}

/// One validated Mini App launch. Built per request and never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitData {
    /// Every signed field, `hash` excluded, keyed in byte order.
    pub fields: BTreeMap<String, String>,
    /// The hex signature supplied by the client.
    pub hash: String,
    /// Unix timestamp (seconds) at which Telegram signed the payload.
    pub auth_date: i64,
    /// The launching user. Absent for some launch contexts.
    pub user: Option<WebAppUser>,
    /// Query id for answering via `answerWebAppQuery`.
    pub query_id: Option<String>,
    /// Deep-link payload, passed through untouched.
    pub start_param: Option<String>,
    /// Type of the chat the app was opened from.
    pub chat_type: Option<String>,
    /// Global identifier of that chat.
    pub chat_instance: Option<String>,
}

impl InitData {
    /// Returns the id of the launching user, if the launch carried one.
    pub fn user_id(&self) -> Option<u64> {
        self.user.as_ref().map(|user| user.id)
    }
}

/// Validates `raw` against `bot_token` using the current time.
pub fn validate(raw: &str, bot_token: &str, max_age_seconds: i64) -> Result<InitData> {
    validate_at(raw, bot_token, max_age_seconds, Utc::now().timestamp())
}

/// Validates `raw` against `bot_token` as if the current time were `now`.
///
/// The signature is checked before freshness and the user payload, so a
/// forged payload is always reported as `InvalidSignature`.
pub fn validate_at(
    raw: &str,
    bot_token: &str,
    max_age_seconds: i64,
    now: i64,
) -> Result<InitData> {
    let mut fields = parse_fields(raw);
    let hash = fields.remove(HASH_FIELD).ok_or(InitDataError::MissingHash)?;

    if !is_lowercase_hex_digest(&hash) {
        return Err(InitDataError::InvalidSignature);
    }
    let expected = hex::decode(&hash).map_err(|_| InitDataError::InvalidSignature)?;
    signature_mac(&fields, bot_token)
        .verify_slice(&expected)
        .map_err(|_| InitDataError::InvalidSignature)?;

    let auth_date = fields
        .get("auth_date")
        .and_then(|value| value.parse::<i64>().ok())
        .ok_or(InitDataError::InvalidAuthDate)?;
    let age = now.saturating_sub(auth_date);
    if age > max_age_seconds {
        return Err(InitDataError::Expired { age, max_age: max_age_seconds });
    }

    let user = fields
        .get("user")
        .map(|raw_user| serde_json::from_str::<WebAppUser>(raw_user))
        .transpose()
        .map_err(|e| InitDataError::InvalidUserPayload(e.to_string()))?;

    Ok(InitData {
        query_id: fields.get("query_id").cloned(),
        start_param: fields.get("start_param").cloned(),
        chat_type: fields.get("chat_type").cloned(),
        chat_instance: fields.get("chat_instance").cloned(),
        hash,
        auth_date,
        user,
        fields,
    })
}

/// Computes the lowercase hex signature Telegram would attach to `fields`.
/// `fields` must not contain `hash`.
pub fn sign(fields: &BTreeMap<String, String>, bot_token: &str) -> String {
    hex::encode(signature_mac(fields, bot_token).finalize().into_bytes())
}

/// Builds a complete, correctly signed query string from `fields`.
#[cfg(any(test, feature = "test-utils"))]
pub fn signed_payload(fields: &[(&str, &str)], bot_token: &str) -> String {
    let map = fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let hash = sign(&map, bot_token);

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    serializer.extend_pairs(fields.iter());
    serializer.append_pair(HASH_FIELD, &hash);
    serializer.finish()
}

/// Telegram issues the digest as exactly 64 lowercase hex characters; any
/// other spelling of the same bytes is a different hash.
fn is_lowercase_hex_digest(hash: &str) -> bool {
    hash.len() == HASH_HEX_LEN && hash.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Parses a query string into a flat map. A repeated key keeps its last value.
fn parse_fields(raw: &str) -> BTreeMap<String, String> {
    url::form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
}

fn data_check_string(fields: &BTreeMap<String, String>) -> String {
    fields.iter().map(|(key, value)| format!("{key}={value}")).collect::<Vec<_>>().join("\n")
}

fn signature_mac(fields: &BTreeMap<String, String>, bot_token: &str) -> HmacSha256 {
    let mut secret = keyed_mac(WEB_APP_DATA_KEY);
    secret.update(bot_token.as_bytes());
    let secret_key = secret.finalize().into_bytes();

    let mut mac = keyed_mac(&secret_key);
    mac.update(data_check_string(fields).as_bytes());
    mac
}

/// expect is ok: HMAC accepts keys of any length.
fn keyed_mac(key: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length")
}
