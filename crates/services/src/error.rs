//! Shared error types for the services crate.

use thiserror::Error;

use lesson_client::ApiError;
use lesson_core::model::{ChoiceId, LanguageId, LessonType, QuestionId};

/// Input rejected before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("no quiz answers selected")]
    NoAnswers,
    #[error("no language selected")]
    NoLanguage,
    #[error("language {0} is not allowed for this problem")]
    UnknownLanguage(LanguageId),
    #[error("choice {choice} does not belong to question {question}")]
    UnknownChoice {
        question: QuestionId,
        choice: ChoiceId,
    },
}

impl ValidationError {
    /// Text shown to the learner.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NoAnswers => "Please answer the question",
            Self::NoLanguage | Self::UnknownLanguage(_) => "Please select a language",
            Self::UnknownChoice { .. } => "Please pick one of the listed choices",
        }
    }
}

/// Lesson or course data could not be loaded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to load lesson: {0}")]
    Lesson(#[source] ApiError),
    #[error("failed to load course index: {0}")]
    Course(#[source] ApiError),
}

/// Errors emitted by the lesson session controller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no lesson is open")]
    NotOpen,
    #[error("lesson is not loaded")]
    NotLoaded,
    #[error("operation requires a {expected} lesson")]
    WrongMode { expected: LessonType },
    #[error("a submission is already in flight")]
    Busy,
    #[error("lesson changed while the request was in flight")]
    Stale,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("submission failed: {0}")]
    Transport(#[source] ApiError),
}
