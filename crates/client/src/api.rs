use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use lesson_core::model::{CourseLessonIndex, CourseSlug, LessonDescriptor, LessonKey, QuizAnswer};

use crate::records::SubmissionResponse;

/// Errors surfaced by lesson backends.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("request failed with status {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Invalid(#[from] lesson_core::Error),
}

/// Body of a lesson submission. The same endpoint grades quizzes and code;
/// the payload shape decides which.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubmissionPayload {
    Quiz { answers: Vec<QuizAnswer> },
    Code { language: String, code: String },
}

impl SubmissionPayload {
    #[must_use]
    pub fn is_quiz(&self) -> bool {
        matches!(self, Self::Quiz { .. })
    }
}

/// Backend contract consumed by the lesson session.
///
/// Implementations convert wire shapes into the domain at this boundary, so
/// callers only ever see canonical lessons and course indexes.
#[async_trait]
pub trait LessonApi: Send + Sync {
    /// Fetch a lesson with its problem or quiz.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other transport/decode errors.
    async fn fetch_lesson(&self, key: &LessonKey) -> Result<LessonDescriptor, ApiError>;

    /// Fetch a course and flatten it into its lesson order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the course cannot be fetched or decoded.
    async fn fetch_course(&self, course: &CourseSlug) -> Result<CourseLessonIndex, ApiError>;

    /// Submit quiz answers or code for grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decode failures. A failing grade is
    /// not an error.
    async fn submit_answer(
        &self,
        key: &LessonKey,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResponse, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::{ChoiceId, QuestionId};

    #[test]
    fn quiz_payload_serializes_answers_only() {
        let payload = SubmissionPayload::Quiz {
            answers: vec![QuizAnswer {
                question: QuestionId::new("q1"),
                selected_choice_id: ChoiceId::new("c2"),
            }],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "answers": [{ "question": "q1", "selected_choice_id": "c2" }] })
        );
    }

    #[test]
    fn code_payload_serializes_language_and_code() {
        let payload = SubmissionPayload::Code {
            language: "python".into(),
            code: "print(1)".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "language": "python", "code": "print(1)" })
        );
    }
}
