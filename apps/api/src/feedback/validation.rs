use serde_json::{Map, Value};

use crate::errors::AppError;

/// Upper bound on the resume text forwarded to the provider, in characters.
pub const MAX_RESUME_CHARS: usize = 6000;
/// Upper bound on the job description forwarded to the provider, in characters.
pub const MAX_JOB_DESC_CHARS: usize = 2000;

/// A validated, sanitized feedback request.
///
/// `job_role` is trimmed only. `resume_text` and `job_desc` are trimmed,
/// whitespace-collapsed and truncated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRequest {
    pub job_role: String,
    pub resume_text: String,
    pub job_desc: String,
}

/// Validates a raw request body and produces a sanitized `FeedbackRequest`.
///
/// FAIL conditions:
/// - Body is empty, not JSON, not an object, or an empty object → `InvalidPayload`
/// - A field is present with a non-string, non-null value → `InvalidPayload`
/// - `job_role` or `resume_text` is empty after trimming → `MissingRequiredField`
pub fn parse_feedback_request(body: &[u8]) -> Result<FeedbackRequest, AppError> {
    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => map,
        _ => return Err(AppError::no_payload()),
    };

    let job_role = text_field(&payload, "job_role")?;
    let resume_text = text_field(&payload, "resume_text")?;
    let job_desc = text_field(&payload, "job_desc")?;

    if resume_text.is_empty() || job_role.is_empty() {
        return Err(AppError::MissingRequiredField);
    }

    Ok(FeedbackRequest {
        job_role: job_role.to_string(),
        resume_text: sanitize(resume_text, MAX_RESUME_CHARS),
        job_desc: sanitize(job_desc, MAX_JOB_DESC_CHARS),
    })
}

/// Missing and `null` fields read as empty text.
fn text_field<'a>(payload: &'a Map<String, Value>, name: &str) -> Result<&'a str, AppError> {
    match payload.get(name) {
        None | Some(Value::Null) => Ok(""),
        Some(Value::String(s)) => Ok(s.trim_matches(is_space)),
        Some(_) => Err(AppError::InvalidPayload(format!(
            "Field '{name}' must be a string"
        ))),
    }
}

fn sanitize(text: &str, max_chars: usize) -> String {
    truncate_chars(&collapse_whitespace(text), max_chars).to_string()
}

/// Unicode whitespace plus the ASCII file/group/record/unit separators (U+001C..=U+001F).
pub fn is_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Replaces every run of whitespace (spaces, tabs, newlines, ...) with a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if is_space(c) {
            if !in_run {
                out.push(' ');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Keeps at most `max_chars` characters. Never splits a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn parse(value: Value) -> Result<FeedbackRequest, AppError> {
        parse_feedback_request(value.to_string().as_bytes())
    }

    #[test]
    fn test_valid_payload() {
        let r = parse(json!({
            "job_role": "  Backend Engineer ",
            "resume_text": "Built\n\n services.\t",
            "job_desc": " Rust   please "
        }))
        .unwrap();
        assert_eq!(r.job_role, "Backend Engineer");
        assert_eq!(r.resume_text, "Built services.");
        assert_eq!(r.job_desc, "Rust please");
    }

    #[test]
    fn test_job_desc_optional() {
        let r = parse(json!({"job_role": "QA", "resume_text": "Tested"})).unwrap();
        assert_eq!(r.job_desc, "");
    }

    #[test]
    fn test_job_role_not_collapsed() {
        let r = parse(json!({"job_role": "Staff  \t Engineer", "resume_text": "x"})).unwrap();
        assert_eq!(r.job_role, "Staff  \t Engineer");
    }

    #[test]
    fn test_job_role_not_capped() {
        let role = "r".repeat(10_000);
        let r = parse(json!({"job_role": role, "resume_text": "x"})).unwrap();
        assert_eq!(r.job_role.len(), 10_000);
    }

    #[test]
    fn test_empty_body_rejected() {
        assert!(matches!(
            parse_feedback_request(b""),
            Err(AppError::InvalidPayload(msg)) if msg == "No JSON payload provided"
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            parse_feedback_request(b"{\"job_role\": "),
            Err(AppError::InvalidPayload(_))
        ));
    }

    #[test]
    fn test_empty_object_rejected() {
        assert!(matches!(parse(json!({})), Err(AppError::InvalidPayload(_))));
    }

    #[test]
    fn test_non_object_rejected() {
        for value in [json!([1, 2]), json!("text"), json!(42), json!(null), json!(true)] {
            assert!(matches!(parse(value), Err(AppError::InvalidPayload(_))));
        }
    }

    #[test]
    fn test_non_string_field_rejected() {
        let err = parse(json!({"job_role": 7, "resume_text": "x"})).unwrap_err();
        assert!(matches!(err, AppError::InvalidPayload(msg) if msg.contains("job_role")));
    }

    #[test]
    fn test_null_field_treated_as_missing() {
        let err = parse(json!({"job_role": null, "resume_text": "x"})).unwrap_err();
        assert!(matches!(err, AppError::MissingRequiredField));
    }

    #[test]
    fn test_missing_resume_rejected() {
        assert!(matches!(
            parse(json!({"job_role": "QA"})),
            Err(AppError::MissingRequiredField)
        ));
    }

    #[test]
    fn test_whitespace_only_role_rejected() {
        assert!(matches!(
            parse(json!({"job_role": " \n\t ", "resume_text": "x"})),
            Err(AppError::MissingRequiredField)
        ));
    }

    #[test]
    fn test_unrelated_fields_only_is_missing_fields() {
        assert!(matches!(
            parse(json!({"name": "Ada"})),
            Err(AppError::MissingRequiredField)
        ));
    }

    #[test]
    fn test_resume_truncated_after_collapse() {
        let resume = "word   ".repeat(2000);
        let r = parse(json!({"job_role": "QA", "resume_text": resume})).unwrap();
        assert_eq!(r.resume_text.chars().count(), MAX_RESUME_CHARS);
        assert!(r.resume_text.starts_with("word word"));
    }

    #[test]
    fn test_job_desc_truncated() {
        let desc = "d".repeat(5000);
        let r = parse(json!({"job_role": "QA", "resume_text": "x", "job_desc": desc})).unwrap();
        assert_eq!(r.job_desc.chars().count(), MAX_JOB_DESC_CHARS);
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_separator_only_role_rejected() {
        assert!(matches!(
            parse(json!({"job_role": "\u{1f}", "resume_text": "x"})),
            Err(AppError::MissingRequiredField)
        ));
    }

    #[test]
    fn test_separators_trimmed_from_role() {
        let r = parse(json!({"job_role": "\u{1e}QA\u{1c}", "resume_text": "x"})).unwrap();
        assert_eq!(r.job_role, "QA");
    }

    #[test]
    fn test_separators_collapsed_in_resume() {
        let r = parse(json!({"job_role": "QA", "resume_text": "Built\u{1c}services\u{1f} \nfast"}))
            .unwrap();
        assert_eq!(r.resume_text, "Built services fast");
    }

    #[test]
    fn test_collapse_mixed_whitespace() {
        assert_eq!(collapse_whitespace("a \t\r\n b\u{00a0}\u{2003}c"), "a b c");
        assert_eq!(collapse_whitespace("  lead"), " lead");
        assert_eq!(collapse_whitespace(""), "");
    }

    proptest! {
        #[test]
        fn prop_collapse_is_idempotent(s in "\\PC*") {
            let once = collapse_whitespace(&s);
            prop_assert_eq!(collapse_whitespace(&once), once);
        }

        #[test]
        fn prop_collapse_leaves_no_double_whitespace(s in "[ a-z\t\n\r]{0,200}") {
            let collapsed = collapse_whitespace(&s);
            prop_assert!(!collapsed.contains("  "));
            prop_assert!(!collapsed.contains('\n'));
            prop_assert!(!collapsed.contains('\t'));
        }

        #[test]
        fn prop_sanitized_lengths_bounded(
            resume in "[a-zé \n]{1,9000}",
            desc in "[a-zé \n]{0,4000}",
        ) {
            let body = json!({"job_role": "QA", "resume_text": format!("x{resume}"), "job_desc": desc});
            let r = parse(body).unwrap();
            prop_assert!(r.resume_text.chars().count() <= MAX_RESUME_CHARS);
            prop_assert!(r.job_desc.chars().count() <= MAX_JOB_DESC_CHARS);
        }
    }
}
