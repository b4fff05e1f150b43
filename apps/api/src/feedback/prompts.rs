// Prompt constants for the feedback endpoint.

use crate::feedback::validation::FeedbackRequest;

/// Feedback prompt template. Replace `{job_role}`, `{resume_text}` and `{job_desc}` before sending.
pub const FEEDBACK_PROMPT_TEMPLATE: &str = r#"
You are a career coach AI assistant. Review the following resume text and provide detailed feedback tailored for the job role: {job_role}.

Resume: {resume_text}

Job Description: {job_desc}

Analyze for:
- Missing skills relevant to the role
- Suggestions to improve formatting, clarity, and tone
- Highlight vague or redundant language
- Recommendations to tailor experience & achievements
- Provide section-wise feedback (Education, Experience, Skills, etc.)
"#;

/// Builds the single user message sent to the provider.
///
/// Placeholders are expanded in a single pass over the template, so user text
/// that contains a placeholder token is kept literally.
pub fn build_feedback_prompt(request: &FeedbackRequest) -> String {
    let mut out = String::with_capacity(
        FEEDBACK_PROMPT_TEMPLATE.len()
            + request.job_role.len()
            + request.resume_text.len()
            + request.job_desc.len(),
    );

    let mut rest = FEEDBACK_PROMPT_TEMPLATE;
    while let Some(start) = rest.find('{') {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);

        let substitution = [
            ("{job_role}", request.job_role.as_str()),
            ("{resume_text}", request.resume_text.as_str()),
            ("{job_desc}", request.job_desc.as_str()),
        ]
        .into_iter()
        .find(|(placeholder, _)| tail.starts_with(placeholder));

        match substitution {
            Some((placeholder, value)) => {
                out.push_str(value);
                rest = &tail[placeholder.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
