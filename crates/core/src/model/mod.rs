mod course;
mod ids;
mod lesson;
mod problem;
mod quiz;
mod submission;

pub use ids::{
    ChoiceId, CourseSlug, LanguageId, LessonId, LessonKey, LessonSlug, ParseSlugError,
    QuestionId, TestCaseId, lesson_path,
};

pub use course::{CourseLessonIndex, LessonNeighbors, NextLesson, PrevLesson};
pub use lesson::{LessonContent, LessonDescriptor, LessonError, LessonType, ProgressStatus};
pub use problem::{Language, Problem, SampleTestCase};
pub use quiz::{Choice, Question, Quiz, QuizAnswer, SelectedAnswers};
pub use submission::{SubmissionOutcome, TestCaseResult, Verdict, failure_label};
