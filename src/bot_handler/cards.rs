//! Inline result cards for shared payloads.

use crate::{
    deep_link::{MiniAppLinks, StartParam},
    inline_query::InlinePayload,
    messaging::ShareCard,
};

/// `src_` tag for launches coming from inline cards.
pub const INLINE_SOURCE: &str = "inline";

/// Builds the card for `payload`. The button opens the quiz or test the
/// payload refers to, credited to `ref_user_id`.
pub fn build_share_card(
    payload: &InlinePayload,
    ref_user_id: u64,
    links: &MiniAppLinks,
) -> Result<ShareCard, url::ParseError> {
    let mut launch = StartParam {
        ref_user_id: Some(ref_user_id),
        source: Some(INLINE_SOURCE.to_string()),
        ..StartParam::default()
    };

    let (id, title, description, text, button_text) = match payload {
        InlinePayload::QuizResult(p) => {
            launch.quest_id = Some(p.quiz_id.clone());
            (
                "quiz_result",
                format!("🏆 {}/{} in {}", p.score, p.total, p.quiz_title),
                "Share your quiz result".to_string(),
                format!("I scored {}/{} in \"{}\". Can you beat me?", p.score, p.total, p.quiz_title),
                "🎯 Take the quiz",
            )
        }
        InlinePayload::TestResult(p) => {
            launch.test_id = Some(p.test_id.clone());
            (
                "test_result",
                format!("✨ {}", p.result_title),
                "Share your test result".to_string(),
                format!("My result: {}. Find out yours!", p.result_title),
                "🔮 Take the test",
            )
        }
        InlinePayload::QuizInvite(p) => {
            launch.quest_id = Some(p.quiz_id.clone());
            (
                "quiz_invite",
                invite_title("🎯", "Quiz invitation", p.quiz_title.as_deref()),
                "Invite friends to the quiz".to_string(),
                invite_text("quiz", p.quiz_title.as_deref()),
                "🎯 Take the quiz",
            )
        }
        InlinePayload::TestInvite(p) => {
            launch.test_id = Some(p.test_id.clone());
            (
                "test_invite",
                invite_title("🔮", "Test invitation", p.test_title.as_deref()),
                "Invite friends to the test".to_string(),
                invite_text("test", p.test_title.as_deref()),
                "🔮 Take the test",
            )
        }
        InlinePayload::Poll(p) => (
            "poll",
            format!("📊 {}", p.question),
            "Share the poll".to_string(),
            format!("📊 {}\nVote in the app!", p.question),
            "🗳 Vote",
        ),
    };

    Ok(ShareCard {
        id: id.to_string(),
        title,
        description,
        text,
        button_text: button_text.to_string(),
        url: links.launch_url(&launch)?,
    })
}

/// The fallback card offered for queries that are not a known payload.
pub fn build_open_app_card(
    sender_user_id: u64,
    links: &MiniAppLinks,
) -> Result<ShareCard, url::ParseError> {
    let launch = StartParam {
        ref_user_id: Some(sender_user_id),
        source: Some(INLINE_SOURCE.to_string()),
        ..StartParam::default()
    };

    Ok(ShareCard {
        id: "open_app".to_string(),
        title: "🎮 Open the quiz app".to_string(),
        description: "Quizzes, personality tests and polls".to_string(),
        text: "Quizzes, personality tests and polls. Join me!".to_string(),
        button_text: "🚀 Open the app".to_string(),
        url: links.launch_url(&launch)?,
    })
}

fn invite_title(icon: &str, fallback: &str, title: Option<&str>) -> String {
    format!("{icon} {}", title.unwrap_or(fallback))
}

fn invite_text(kind: &str, title: Option<&str>) -> String {
    match title {
        Some(title) => format!("Join me in the {kind} \"{title}\"!"),
        None => format!("Join me in this {kind}!"),
    }
}
