//! Colon-delimited payloads carried by inline queries.
//!
//! The Mini App shares results by switching the user to an inline query whose
//! text is one of these payloads. When the bot receives the query it parses
//! the text back and renders a result card. Free text is percent-encoded and
//! may itself contain `:`; a trailing run of five or more digits is a referrer
//! user id.
//!
//! Parsers never fail loudly: malformed text yields `None`. Links travel
//! through chat history and inline caches, so partial garbage is expected.

#[cfg(test)]
mod tests;

const QUIZ_RESULT: &str = "quiz_result";
const TEST_RESULT: &str = "test_result";
const QUIZ_INVITE: &str = "quiz_invite";
const TEST_INVITE: &str = "test_invite";
const POLL: &str = "poll";

/// Shortest digit run treated as a referrer id.
const MIN_REF_DIGITS: usize = 5;

/// `quiz_result:<quizId>:<score>:<total>:<title>[:<ref>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResultPayload {
    /// Quiz identifier.
    pub quiz_id: String,
    /// Correct answers.
    pub score: u32,
    /// Number of questions.
    pub total: u32,
    /// Quiz title.
    pub quiz_title: String,
    /// Referrer encoded in the payload.
    pub ref_user_id: Option<u64>,
}

/// `test_result:<testId>:<resultTitle>[:<ref>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResultPayload {
    /// Test identifier.
    pub test_id: String,
    /// Title of the personality the user got.
    pub result_title: String,
    /// Referrer encoded in the payload.
    pub ref_user_id: Option<u64>,
}

/// `quiz_invite:<quizId>[:<title>][:<ref>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizInvitePayload {
    /// Quiz identifier.
    pub quiz_id: String,
    /// Quiz title.
    pub quiz_title: Option<String>,
    /// Referrer encoded in the payload.
    pub ref_user_id: Option<u64>,
}

/// `test_invite:<testId>[:<title>][:<ref>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInvitePayload {
    /// Test identifier.
    pub test_id: String,
    /// Test title.
    pub test_title: Option<String>,
    /// Referrer encoded in the payload.
    pub ref_user_id: Option<u64>,
}

/// `poll:<question>[:<ref>]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPayload {
    /// Poll question.
    pub question: String,
    /// Referrer encoded in the payload.
    pub ref_user_id: Option<u64>,
}

/// Any payload the bot knows how to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlinePayload {
    /// A finished quiz with its score.
    QuizResult(QuizResultPayload),
    /// A personality test result.
    TestResult(TestResultPayload),
    /// An invitation to a quiz.
    QuizInvite(QuizInvitePayload),
    /// An invitation to a test.
    TestInvite(TestInvitePayload),
    /// A poll question.
    Poll(PollPayload),
}

impl InlinePayload {
    /// Parses `query` with the parser matching its prefix.
    pub fn parse(query: &str) -> Option<Self> {
        match query.split(':').next()? {
            QUIZ_RESULT => parse_quiz_result_inline_query(query).map(Self::QuizResult),
            TEST_RESULT => parse_test_result_inline_query(query).map(Self::TestResult),
            QUIZ_INVITE => parse_quiz_invite_inline_query(query).map(Self::QuizInvite),
            TEST_INVITE => parse_test_invite_inline_query(query).map(Self::TestInvite),
            POLL => parse_poll_inline_query(query).map(Self::Poll),
            _ => None,
        }
    }

    /// The referrer encoded in the payload, if any.
    pub fn ref_user_id(&self) -> Option<u64> {
        match self {
            Self::QuizResult(p) => p.ref_user_id,
            Self::TestResult(p) => p.ref_user_id,
            Self::QuizInvite(p) => p.ref_user_id,
            Self::TestInvite(p) => p.ref_user_id,
            Self::Poll(p) => p.ref_user_id,
        }
    }

    /// Encodes the payload as inline query text.
    pub fn to_query(&self) -> String {
        let (body, ref_user_id) = match self {
            Self::QuizResult(p) => (
                format!(
                    "{QUIZ_RESULT}:{}:{}:{}:{}",
                    p.quiz_id,
                    p.score,
                    p.total,
                    urlencoding::encode(&p.quiz_title)
                ),
                p.ref_user_id,
            ),
            Self::TestResult(p) => (
                format!("{TEST_RESULT}:{}:{}", p.test_id, urlencoding::encode(&p.result_title)),
                p.ref_user_id,
            ),
            Self::QuizInvite(p) => (
                with_optional_text(format!("{QUIZ_INVITE}:{}", p.quiz_id), p.quiz_title.as_deref()),
                p.ref_user_id,
            ),
            Self::TestInvite(p) => (
                with_optional_text(format!("{TEST_INVITE}:{}", p.test_id), p.test_title.as_deref()),
                p.ref_user_id,
            ),
            Self::Poll(p) => {
                (format!("{POLL}:{}", urlencoding::encode(&p.question)), p.ref_user_id)
            }
        };

        match ref_user_id {
            Some(id) => format!("{body}:{id}"),
            None => body,
        }
    }
}

/// Parses `quiz_result:<quizId>:<score>:<total>:<title>[:<ref>]`.
pub fn parse_quiz_result_inline_query(query: &str) -> Option<QuizResultPayload> {
    let parts = segments(query, QUIZ_RESULT, 5)?;
    let quiz_id = non_empty(parts[0])?;
    let score = parts[1].parse().ok()?;
    let total = parts[2].parse().ok()?;
    let (text, ref_user_id) = split_ref(&parts[3..], false);

    Some(QuizResultPayload { quiz_id, score, total, quiz_title: decode_text(text)?, ref_user_id })
}

/// Parses `test_result:<testId>:<resultTitle>[:<ref>]`.
pub fn parse_test_result_inline_query(query: &str) -> Option<TestResultPayload> {
    let parts = segments(query, TEST_RESULT, 3)?;
    let test_id = non_empty(parts[0])?;
    let (text, ref_user_id) = split_ref(&parts[1..], false);

    Some(TestResultPayload { test_id, result_title: decode_text(text)?, ref_user_id })
}

/// Parses `quiz_invite:<quizId>[:<title>][:<ref>]`. A lone numeric segment is a referrer.
pub fn parse_quiz_invite_inline_query(query: &str) -> Option<QuizInvitePayload> {
    let parts = segments(query, QUIZ_INVITE, 2)?;
    let quiz_id = non_empty(parts[0])?;
    let (text, ref_user_id) = split_ref(&parts[1..], true);

    Some(QuizInvitePayload { quiz_id, quiz_title: decode_text(text), ref_user_id })
}

/// Parses `test_invite:<testId>[:<title>][:<ref>]`. A lone numeric segment is a referrer.
pub fn parse_test_invite_inline_query(query: &str) -> Option<TestInvitePayload> {
    let parts = segments(query, TEST_INVITE, 2)?;
    let test_id = non_empty(parts[0])?;
    let (text, ref_user_id) = split_ref(&parts[1..], true);

    Some(TestInvitePayload { test_id, test_title: decode_text(text), ref_user_id })
}

/// Parses `poll:<question>[:<ref>]`.
pub fn parse_poll_inline_query(query: &str) -> Option<PollPayload> {
    let parts = segments(query, POLL, 2)?;
    let (text, ref_user_id) = split_ref(&parts, false);

    Some(PollPayload { question: decode_text(text)?, ref_user_id })
}

/// Returns the encoded referrer, or the sender of the inline query when the
/// payload names none.
pub fn resolve_inline_ref_user_id(parsed_ref_user_id: Option<u64>, sender_user_id: u64) -> u64 {
    parsed_ref_user_id.unwrap_or(sender_user_id)
}

/// Splits `query` on `:` and returns the segments after `tag`, provided the
/// first segment is exactly `tag` and there are at least `min_segments`
/// segments in total.
fn segments<'a>(query: &'a str, tag: &str, min_segments: usize) -> Option<Vec<&'a str>> {
    let mut parts: Vec<&str> = query.split(':').collect();
    if parts.len() < min_segments || parts[0] != tag {
        return None;
    }
    parts.remove(0);
    Some(parts)
}

/// Strips a trailing referrer id from the free-text segments. A lone segment
/// is only taken as a referrer when `allow_single_part_ref` is set; otherwise
/// it stays text.
fn split_ref<'a, 'b>(parts: &'b [&'a str], allow_single_part_ref: bool) -> (&'b [&'a str], Option<u64>) {
    match parts.split_last() {
        Some((last, rest))
            if (!rest.is_empty() || allow_single_part_ref) && is_ref_segment(last) =>
        {
            match last.parse() {
                Ok(id) => (rest, Some(id)),
                Err(_) => (parts, None),
            }
        }
        _ => (parts, None),
    }
}

fn is_ref_segment(segment: &str) -> bool {
    segment.len() >= MIN_REF_DIGITS && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Rejoins free text with `:` and percent-decodes it. Text that is empty or
/// carries a malformed escape (`%zz`, a truncated UTF-8 sequence) is `None`.
fn decode_text(parts: &[&str]) -> Option<String> {
    let joined = parts.join(":");
    if has_malformed_escape(&joined) {
        return None;
    }
    let decoded = urlencoding::decode(&joined).ok()?;
    if decoded.is_empty() { None } else { Some(decoded.into_owned()) }
}

/// Returns `true` if some `%` is not followed by two hex digits.
fn has_malformed_escape(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !(bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit))
    })
}

fn non_empty(segment: &str) -> Option<String> {
    if segment.is_empty() { None } else { Some(segment.to_string()) }
}

fn with_optional_text(body: String, text: Option<&str>) -> String {
    match text {
        Some(text) => format!("{body}:{}", urlencoding::encode(text)),
        None => body,
    }
}
