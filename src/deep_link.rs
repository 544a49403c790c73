use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

const TELEGRAM_URL: &str = "https://t.me";

lazy_static! {
    static ref QUEST_RE: Regex = Regex::new(r"quest_([a-zA-Z0-9-]+)").expect("valid quest regex");
    static ref TEST_RE: Regex = Regex::new(r"test_([a-zA-Z0-9-]+)").expect("valid test regex");
    static ref REF_RE: Regex = Regex::new(r"ref_([0-9]+)").expect("valid ref regex");
    static ref SOURCE_RE: Regex = Regex::new(r"src_([A-Za-z0-9_]+)").expect("valid source regex");
}

/// Routing and referral intent carried by a Mini App `start_param`.
///
/// The encoding is `quest_<id>_test_<id>_ref_<id>_src_<source>` with absent
/// parts omitted. It is not a bijection: values containing `_` (or embedding
/// another `quest_`/`ref_` marker) do not survive a round trip. Links already
/// shared in chats use this exact scheme, so it is kept as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartParam {
    /// Quiz to open.
    pub quest_id: Option<String>,
    /// Personality test to open.
    pub test_id: Option<String>,
    /// User credited with the referral.
    pub ref_user_id: Option<u64>,
    /// Where the link was shared from, e.g. `inline`.
    pub source: Option<String>,
}

impl StartParam {
    /// Returns `true` if no part is set.
    pub fn is_empty(&self) -> bool {
        self.quest_id.is_none()
            && self.test_id.is_none()
            && self.ref_user_id.is_none()
            && self.source.is_none()
    }

    /// Encodes the present parts in fixed order.
    pub fn encode(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if let Some(quest_id) = &self.quest_id {
            parts.push(format!("quest_{quest_id}"));
        }
        if let Some(test_id) = &self.test_id {
            parts.push(format!("test_{test_id}"));
        }
        if let Some(ref_user_id) = self.ref_user_id {
            parts.push(format!("ref_{ref_user_id}"));
        }
        if let Some(source) = &self.source {
            parts.push(format!("src_{source}"));
        }
        parts.join("_")
    }

    /// Best-effort decode. Each part is searched for independently anywhere in
    /// `raw`; parts that cannot be found are left empty. Never fails.
    pub fn decode(raw: &str) -> Self {
        let capture = |re: &Regex| re.captures(raw).map(|caps| caps[1].to_string());

        Self {
            quest_id: capture(&QUEST_RE),
            test_id: capture(&TEST_RE),
            ref_user_id: capture(&REF_RE).and_then(|id| id.parse().ok()),
            source: capture(&SOURCE_RE),
        }
    }
}

/// Encodes `param` as a `start_param` string.
pub fn build_start_param(param: &StartParam) -> String {
    param.encode()
}

/// Decodes a `start_param` string. Unknown or malformed content is ignored.
pub fn parse_start_param(raw: &str) -> StartParam {
    StartParam::decode(raw)
}

/// Builds `t.me` links that open the Mini App.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiniAppLinks {
    bot_username: String,
    app_short_name: String,
}

impl MiniAppLinks {
    /// Creates links for `bot_username` (a leading `@` is ignored).
    pub fn new(bot_username: &str, app_short_name: &str) -> Self {
        Self {
            bot_username: bot_username.trim_start_matches('@').to_string(),
            app_short_name: app_short_name.to_string(),
        }
    }

    /// Returns `https://t.me/<bot>/<app>`, with `?startapp=<param>` appended
    /// when `param` has any part set.
    pub fn launch_url(&self, param: &StartParam) -> Result<Url, url::ParseError> {
        let mut url =
            Url::parse(&format!("{TELEGRAM_URL}/{}/{}", self.bot_username, self.app_short_name))?;
        if !param.is_empty() {
            url.query_pairs_mut().append_pair("startapp", &param.encode());
        }
        Ok(url)
    }
}
