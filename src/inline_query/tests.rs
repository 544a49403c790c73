use super::*;

#[test]
fn test_parse_quiz_result_with_ref() {
    let parsed =
        parse_quiz_result_inline_query("quiz_result:quiz-123:8:10:General%20Knowledge:70000123");

    assert_eq!(
        parsed,
        Some(QuizResultPayload {
            quiz_id: "quiz-123".to_string(),
            score: 8,
            total: 10,
            quiz_title: "General Knowledge".to_string(),
            ref_user_id: Some(70000123),
        })
    );
}

#[test]
fn test_parse_quiz_result_title_with_colons() {
    let parsed = parse_quiz_result_inline_query("quiz_result:q1:3:5:Rust:%20the:good%20parts:12345")
        .unwrap();
    assert_eq!(parsed.quiz_title, "Rust: the:good parts");
    assert_eq!(parsed.ref_user_id, Some(12345));
}

#[test]
fn test_parse_quiz_result_numeric_title_is_not_ref() {
    let parsed = parse_quiz_result_inline_query("quiz_result:q1:3:5:2024").unwrap();
    assert_eq!(parsed.quiz_title, "2024");
    assert_eq!(parsed.ref_user_id, None);

    let parsed = parse_quiz_result_inline_query("quiz_result:q1:3:5:70000123").unwrap();
    assert_eq!(parsed.quiz_title, "70000123");
    assert_eq!(parsed.ref_user_id, None);
}

#[test]
fn test_parse_quiz_result_short_trailing_digits_stay_in_title() {
    let parsed = parse_quiz_result_inline_query("quiz_result:q1:3:5:Top:100").unwrap();
    assert_eq!(parsed.quiz_title, "Top:100");
    assert_eq!(parsed.ref_user_id, None);
}

#[test]
fn test_parse_quiz_result_rejects_malformed() {
    // Too few segments.
    assert_eq!(parse_quiz_result_inline_query("quiz_result:quiz-123:8:10"), None);
    // Wrong prefix.
    assert_eq!(parse_quiz_result_inline_query("test_result:quiz-123:8:10:Title"), None);
    assert_eq!(parse_quiz_result_inline_query("quiz_results:quiz-123:8:10:Title"), None);
    // Non-numeric score.
    assert_eq!(parse_quiz_result_inline_query("quiz_result:quiz-123:eight:10:Title"), None);
    // Empty title after decoding.
    assert_eq!(parse_quiz_result_inline_query("quiz_result:quiz-123:8:10:"), None);
    assert_eq!(parse_quiz_result_inline_query("quiz_result:quiz-123:8:10::70000123"), None);
    // Empty quiz id.
    assert_eq!(parse_quiz_result_inline_query("quiz_result::8:10:Title"), None);
}

#[test]
fn test_malformed_escape_makes_text_unreadable() {
    // Bad hex and a truncated UTF-8 sequence are treated alike.
    assert_eq!(parse_quiz_result_inline_query("quiz_result:q:1:2:%zz"), None);
    assert_eq!(parse_quiz_result_inline_query("quiz_result:q:1:2:Top%2"), None);
    assert_eq!(parse_quiz_result_inline_query("quiz_result:q:1:2:%D0"), None);
    assert_eq!(parse_poll_inline_query("poll:50%"), None);

    // An escaped percent sign is fine.
    let parsed = parse_quiz_result_inline_query("quiz_result:q:1:2:100%25%20sure").unwrap();
    assert_eq!(parsed.quiz_title, "100% sure");

    // An optional invite title that cannot be read is dropped.
    let invite = parse_test_invite_inline_query("test_invite:t-7:%zz:70000123").unwrap();
    assert_eq!(invite.test_title, None);
    assert_eq!(invite.ref_user_id, Some(70000123));
}

#[test]
fn test_whitespace_title_is_kept() {
    let parsed = parse_quiz_result_inline_query("quiz_result:q:1:2:%20").unwrap();
    assert_eq!(parsed.quiz_title, " ");
}

#[test]
fn test_parse_test_result_without_ref() {
    let parsed =
        parse_test_result_inline_query("test_result:test-abc:%D0%AF%20%D0%B3%D0%B5%D1%80%D0%BE%D0%B9")
            .unwrap();

    assert_eq!(parsed.test_id, "test-abc");
    assert_eq!(parsed.result_title, "Я герой");
    assert_eq!(parsed.ref_user_id, None);
    assert_eq!(resolve_inline_ref_user_id(parsed.ref_user_id, 99000111), 99000111);
}

#[test]
fn test_parse_test_result_with_ref() {
    let parsed = parse_test_result_inline_query("test_result:t1:Introvert:55500011").unwrap();
    assert_eq!(parsed.result_title, "Introvert");
    assert_eq!(parsed.ref_user_id, Some(55500011));
    assert_eq!(resolve_inline_ref_user_id(parsed.ref_user_id, 99000111), 55500011);
}

#[test]
fn test_parse_test_result_rejects_malformed() {
    assert_eq!(parse_test_result_inline_query("test_result:t1"), None);
    assert_eq!(parse_test_result_inline_query("test_result:t1:"), None);
    assert_eq!(parse_test_result_inline_query("something else"), None);
}

#[test]
fn test_parse_quiz_invite_single_segment_is_ref() {
    let parsed = parse_quiz_invite_inline_query("quiz_invite:quiz-9:70000123").unwrap();
    assert_eq!(parsed.quiz_id, "quiz-9");
    assert_eq!(parsed.quiz_title, None);
    assert_eq!(parsed.ref_user_id, Some(70000123));
}

#[test]
fn test_parse_quiz_invite_variants() {
    let bare = parse_quiz_invite_inline_query("quiz_invite:quiz-9").unwrap();
    assert_eq!(bare.quiz_title, None);
    assert_eq!(bare.ref_user_id, None);

    let titled = parse_quiz_invite_inline_query("quiz_invite:quiz-9:Capitals%20of%20Europe:70000123")
        .unwrap();
    assert_eq!(titled.quiz_title.as_deref(), Some("Capitals of Europe"));
    assert_eq!(titled.ref_user_id, Some(70000123));

    assert_eq!(parse_quiz_invite_inline_query("quiz_invite"), None);
    assert_eq!(parse_quiz_invite_inline_query("quiz_invite:"), None);
}

#[test]
fn test_parse_test_invite_single_segment_is_ref() {
    let parsed = parse_test_invite_inline_query("test_invite:t-7:70000123").unwrap();
    assert_eq!(parsed.test_id, "t-7");
    assert_eq!(parsed.test_title, None);
    assert_eq!(parsed.ref_user_id, Some(70000123));

    let short = parse_test_invite_inline_query("test_invite:t-7:2024").unwrap();
    assert_eq!(short.test_title.as_deref(), Some("2024"));
    assert_eq!(short.ref_user_id, None);
}

#[test]
fn test_parse_test_invite() {
    let parsed = parse_test_invite_inline_query("test_invite:t-7:Who%20are%20you%3F").unwrap();
    assert_eq!(parsed.test_id, "t-7");
    assert_eq!(parsed.test_title.as_deref(), Some("Who are you?"));
    assert_eq!(parsed.ref_user_id, None);
}

#[test]
fn test_parse_poll() {
    let parsed = parse_poll_inline_query("poll:Cats%20or%20dogs%3F:70000123").unwrap();
    assert_eq!(parsed.question, "Cats or dogs?");
    assert_eq!(parsed.ref_user_id, Some(70000123));

    // A lone numeric segment is the question, not a referrer.
    let numeric = parse_poll_inline_query("poll:12345").unwrap();
    assert_eq!(numeric.question, "12345");
    assert_eq!(numeric.ref_user_id, None);

    assert_eq!(parse_poll_inline_query("poll"), None);
    assert_eq!(parse_poll_inline_query("poll:"), None);
}

#[test]
fn test_inline_payload_dispatches_on_prefix() {
    assert!(matches!(
        InlinePayload::parse("quiz_result:q:1:2:T"),
        Some(InlinePayload::QuizResult(_))
    ));
    assert!(matches!(InlinePayload::parse("test_result:t:R"), Some(InlinePayload::TestResult(_))));
    assert!(matches!(InlinePayload::parse("quiz_invite:q"), Some(InlinePayload::QuizInvite(_))));
    assert!(matches!(InlinePayload::parse("test_invite:t"), Some(InlinePayload::TestInvite(_))));
    assert!(matches!(InlinePayload::parse("poll:Q"), Some(InlinePayload::Poll(_))));
    assert_eq!(InlinePayload::parse("hello"), None);
    assert_eq!(InlinePayload::parse(""), None);
}

#[test]
fn test_to_query_is_read_back_by_parse() {
    let payloads = [
        InlinePayload::QuizResult(QuizResultPayload {
            quiz_id: "quiz-123".to_string(),
            score: 8,
            total: 10,
            quiz_title: "General Knowledge: 2024 edition".to_string(),
            ref_user_id: Some(70000123),
        }),
        InlinePayload::TestResult(TestResultPayload {
            test_id: "test-abc".to_string(),
            result_title: "Я герой".to_string(),
            ref_user_id: None,
        }),
        InlinePayload::QuizInvite(QuizInvitePayload {
            quiz_id: "quiz-9".to_string(),
            quiz_title: Some("Capitals".to_string()),
            ref_user_id: Some(70000123),
        }),
        InlinePayload::Poll(PollPayload {
            question: "Cats or dogs?".to_string(),
            ref_user_id: None,
        }),
    ];

    for payload in payloads {
        assert_eq!(InlinePayload::parse(&payload.to_query()), Some(payload.clone()));
    }
}

#[test]
fn test_to_query_format() {
    let payload = InlinePayload::QuizResult(QuizResultPayload {
        quiz_id: "quiz-123".to_string(),
        score: 8,
        total: 10,
        quiz_title: "General Knowledge".to_string(),
        ref_user_id: Some(70000123),
    });
    assert_eq!(payload.to_query(), "quiz_result:quiz-123:8:10:General%20Knowledge:70000123");
    assert_eq!(payload.ref_user_id(), Some(70000123));
}
