use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    ids::{LessonId, LessonSlug},
    problem::Problem,
    quiz::Quiz,
};

//
// ─── LESSON TYPES ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonType {
    Quiz,
    Judge,
}

impl LessonType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Judge => "judge",
        }
    }
}

impl FromStr for LessonType {
    type Err = LessonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiz" => Ok(Self::Quiz),
            "judge" => Ok(Self::Judge),
            _ => Err(LessonError::UnknownType(s.to_owned())),
        }
    }
}

impl fmt::Display for LessonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learner progress on a lesson. Only ever moves forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    #[default]
    Incomplete,
    Completed,
}

impl ProgressStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
        }
    }

    #[must_use]
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Graded content of a lesson. Exactly one variant per lesson type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonContent {
    Quiz(Quiz),
    Judge(Problem),
}

impl LessonContent {
    #[must_use]
    pub fn lesson_type(&self) -> LessonType {
        match self {
            Self::Quiz(_) => LessonType::Quiz,
            Self::Judge(_) => LessonType::Judge,
        }
    }
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// A lesson as loaded for one session view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDescriptor {
    id: LessonId,
    slug: LessonSlug,
    title: String,
    content_md: String,
    progress: ProgressStatus,
    content: LessonContent,
}

impl LessonDescriptor {
    #[must_use]
    pub fn new(
        id: LessonId,
        slug: LessonSlug,
        title: impl Into<String>,
        content_md: impl Into<String>,
        content: LessonContent,
    ) -> Self {
        Self {
            id,
            slug,
            title: title.into(),
            content_md: content_md.into(),
            progress: ProgressStatus::Incomplete,
            content,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressStatus) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn slug(&self) -> &LessonSlug {
        &self.slug
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content_md(&self) -> &str {
        &self.content_md
    }

    #[must_use]
    pub fn progress(&self) -> ProgressStatus {
        self.progress
    }

    #[must_use]
    pub fn lesson_type(&self) -> LessonType {
        self.content.lesson_type()
    }

    #[must_use]
    pub fn content(&self) -> &LessonContent {
        &self.content
    }

    #[must_use]
    pub fn problem(&self) -> Option<&Problem> {
        match &self.content {
            LessonContent::Judge(problem) => Some(problem),
            LessonContent::Quiz(_) => None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&Quiz> {
        match &self.content {
            LessonContent::Quiz(quiz) => Some(quiz),
            LessonContent::Judge(_) => None,
        }
    }

    /// Marks the lesson completed. Returns `true` if this changed the status.
    pub fn mark_completed(&mut self) -> bool {
        let changed = !self.progress.is_completed();
        self.progress = ProgressStatus::Completed;
        changed
    }
}

//
// ─── LESSON ERRORS ─────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("unknown lesson type: {0:?}")]
    UnknownType(String),

    #[error("judge lesson has no problem attached")]
    MissingProblem,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz_lesson() -> LessonDescriptor {
        LessonDescriptor::new(
            LessonId::new("l1"),
            LessonSlug::parse("intro").unwrap(),
            "Intro",
            "# Hello",
            LessonContent::Quiz(Quiz::default()),
        )
    }

    #[test]
    fn lesson_type_parses_case_insensitively() {
        assert_eq!("QUIZ".parse::<LessonType>().unwrap(), LessonType::Quiz);
        assert_eq!(" judge ".parse::<LessonType>().unwrap(), LessonType::Judge);
        assert!(matches!(
            "video".parse::<LessonType>(),
            Err(LessonError::UnknownType(_))
        ));
    }

    #[test]
    fn completion_is_monotonic() {
        let mut lesson = quiz_lesson();
        assert_eq!(lesson.progress(), ProgressStatus::Incomplete);

        assert!(lesson.mark_completed());
        assert!(!lesson.mark_completed());
        assert_eq!(lesson.progress(), ProgressStatus::Completed);
    }

    #[test]
    fn content_accessors_follow_the_variant() {
        let lesson = quiz_lesson();
        assert_eq!(lesson.lesson_type(), LessonType::Quiz);
        assert!(lesson.quiz().is_some());
        assert!(lesson.problem().is_none());
    }
}
