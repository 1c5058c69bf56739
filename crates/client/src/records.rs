//! Wire shapes returned by the lessons backend.
//!
//! The backend has accumulated alternate spellings over time (questions at
//! two levels, `options` vs `choices`, three course shapes, two submission
//! envelopes). Records accept all of them and `into_*` conversions produce
//! one canonical domain value, so nothing downstream re-checks shapes.

use serde::{Deserialize, Deserializer};

use lesson_core::model::{
    Choice, ChoiceId, CourseLessonIndex, Language, LanguageId, LessonContent, LessonDescriptor,
    LessonError, LessonId, LessonSlug, LessonType, Problem, ProgressStatus, Question, QuestionId,
    Quiz, SampleTestCase, TestCaseId,
};

/// Ids arrive as UUID strings from the main backend and as integers from
/// older fixtures.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    RawId::deserialize(deserializer).map(RawId::into_string)
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<RawId>::deserialize(deserializer).map(|id| id.map(RawId::into_string))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

// ─── Lesson ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub starter_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleRecord {
    #[serde(default, deserialize_with = "opt_id_string")]
    pub id: Option<String>,
    #[serde(default, alias = "input")]
    pub input_data: Option<String>,
    #[serde(default)]
    pub expected_output: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProblemRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "languages")]
    pub allowed_languages: Vec<LanguageRecord>,
    #[serde(default)]
    pub sample_testcases: Vec<SampleRecord>,
    #[serde(default)]
    pub starter_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, alias = "options")]
    pub choices: Vec<ChoiceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizRecord {
    #[serde(default)]
    pub questions: Vec<QuestionRecord>,
}

/// Lesson detail as served by `GET courses/{course}/{lesson}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LessonRecord {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub slug: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub content_md: Option<String>,
    #[serde(default)]
    pub progress: Option<ProgressRecord>,
    #[serde(default)]
    pub problem: Option<ProblemRecord>,
    #[serde(default)]
    pub quiz: Option<QuizRecord>,
    /// Legacy location of quiz questions.
    #[serde(default)]
    pub questions: Option<Vec<QuestionRecord>>,
}

impl LanguageRecord {
    fn into_language(self) -> Language {
        Language {
            id: LanguageId::new(self.id),
            key: self.key,
            starter_code: non_empty(self.starter_code),
        }
    }
}

impl SampleRecord {
    fn into_sample(self) -> SampleTestCase {
        SampleTestCase {
            id: self.id.map(TestCaseId::new),
            input: self.input_data.unwrap_or_default(),
            expected_output: self.expected_output.unwrap_or_default(),
        }
    }
}

impl ProblemRecord {
    #[must_use]
    pub fn into_problem(self) -> Problem {
        Problem::new(
            self.title,
            self.allowed_languages
                .into_iter()
                .map(LanguageRecord::into_language)
                .collect(),
            self.sample_testcases
                .into_iter()
                .map(SampleRecord::into_sample)
                .collect(),
        )
        .with_starter_code(self.starter_code)
    }
}

impl QuestionRecord {
    fn into_question(self) -> Question {
        Question {
            id: QuestionId::new(self.id),
            text: self.text,
            choices: self
                .choices
                .into_iter()
                .map(|choice| Choice {
                    id: ChoiceId::new(choice.id),
                    text: choice.text,
                })
                .collect(),
        }
    }
}

impl LessonRecord {
    /// Convert the record into the canonical domain lesson.
    ///
    /// # Errors
    ///
    /// Returns `lesson_core::Error` for an invalid slug, an unknown lesson
    /// type, or a judge lesson without a problem.
    pub fn into_lesson(self) -> Result<LessonDescriptor, lesson_core::Error> {
        let slug = LessonSlug::parse(&self.slug)?;
        let kind: LessonType = self.kind.parse()?;

        let content = match kind {
            LessonType::Quiz => {
                let questions = self
                    .quiz
                    .map(|quiz| quiz.questions)
                    .or(self.questions)
                    .unwrap_or_default();
                LessonContent::Quiz(Quiz::new(
                    questions
                        .into_iter()
                        .map(QuestionRecord::into_question)
                        .collect(),
                ))
            }
            LessonType::Judge => {
                let problem = self.problem.ok_or(LessonError::MissingProblem)?;
                LessonContent::Judge(problem.into_problem())
            }
        };

        let progress = match self.progress.and_then(|p| p.status) {
            Some(status) if status.eq_ignore_ascii_case("completed") => ProgressStatus::Completed,
            _ => ProgressStatus::Incomplete,
        };

        Ok(LessonDescriptor::new(
            LessonId::new(self.id),
            slug,
            self.title,
            self.content_md.unwrap_or_default(),
            content,
        )
        .with_progress(progress))
    }
}

// ─── Course ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct CourseLessonRecord {
    #[serde(default)]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChapterRecord {
    #[serde(default)]
    pub lessons: Vec<CourseLessonRecord>,
}

/// Course payload. Variants are tried in priority order: a flat `lessons`
/// list, then `chapters[].lessons`, then a bare array of lessons.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CourseRecord {
    Flat { lessons: Vec<CourseLessonRecord> },
    Chapters { chapters: Vec<ChapterRecord> },
    Bare(Vec<CourseLessonRecord>),
    /// Any other object: no lessons to navigate.
    Unrecognized(serde::de::IgnoredAny),
}

impl CourseRecord {
    /// Flatten into the course's lesson order. Entries without a valid slug
    /// are skipped.
    #[must_use]
    pub fn into_index(self) -> CourseLessonIndex {
        let lessons: Vec<CourseLessonRecord> = match self {
            Self::Flat { lessons } | Self::Bare(lessons) => lessons,
            Self::Chapters { chapters } => chapters
                .into_iter()
                .flat_map(|chapter| chapter.lessons)
                .collect(),
            Self::Unrecognized(_) => Vec::new(),
        };

        lessons
            .into_iter()
            .filter_map(|lesson| lesson.slug)
            .filter_map(|slug| LessonSlug::parse(&slug).ok())
            .collect()
    }
}

// ─── Submission ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TestRecord {
    #[serde(default, alias = "id", deserialize_with = "opt_id_string")]
    pub test_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub runtime_ms: Option<u64>,
    #[serde(default)]
    pub memory_kb: Option<u64>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
}

/// Judge result body, either nested under `summary` or inlined at the top
/// level of the response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResultBody {
    #[serde(default)]
    pub final_status: Option<String>,
    #[serde(default)]
    pub tests: Option<Vec<TestRecord>>,
    #[serde(default)]
    pub compile_output: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Raw response to `POST courses/{course}/{lesson}/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionResponse {
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub summary: Option<ResultBody>,
    #[serde(default)]
    pub next_url: Option<String>,
    #[serde(default, deserialize_with = "opt_id_string")]
    pub submission_id: Option<String>,
    #[serde(flatten)]
    pub body: ResultBody,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn index_of(value: serde_json::Value) -> Vec<String> {
        let record: CourseRecord = serde_json::from_value(value).unwrap();
        record
            .into_index()
            .slugs()
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect()
    }

    #[test]
    fn all_course_shapes_flatten_to_the_same_order() {
        let flat = json!({
            "slug": "rust",
            "lessons": [{ "slug": "a" }, { "slug": "b" }, { "slug": "c" }]
        });
        let chapters = json!({ "chapters": [
            { "lessons": [{ "slug": "a" }, { "slug": "b" }] },
            { "lessons": [{ "slug": "c" }] }
        ] });
        let bare = json!([{ "slug": "a" }, { "slug": "b" }, { "slug": "c" }]);

        let expected = vec!["a", "b", "c"];
        assert_eq!(index_of(flat), expected);
        assert_eq!(index_of(chapters), expected);
        assert_eq!(index_of(bare), expected);
    }

    #[test]
    fn flat_lessons_take_priority_over_chapters() {
        let both = json!({
            "lessons": [{ "slug": "flat" }],
            "chapters": [{ "lessons": [{ "slug": "nested" }] }]
        });
        assert_eq!(index_of(both), vec!["flat"]);
    }

    #[test]
    fn null_lessons_fall_back_to_chapters_and_missing_chapter_lessons_are_empty() {
        let value = json!({
            "lessons": null,
            "chapters": [{ "title": "empty" }, { "lessons": [{ "slug": "x" }] }]
        });
        assert_eq!(index_of(value), vec!["x"]);
    }

    #[test]
    fn unrecognized_course_yields_empty_index() {
        assert!(index_of(json!({ "title": "no lessons" })).is_empty());
    }

    #[test]
    fn quiz_questions_fall_back_to_legacy_field_and_options() {
        let record: LessonRecord = serde_json::from_value(json!({
            "id": 7,
            "slug": "quiz-1/",
            "title": "Quiz",
            "type": "QUIZ",
            "content_md": null,
            "progress": null,
            "questions": [{ "id": "q1", "text": "2+2?", "options": [{ "id": "c1", "text": "4" }] }]
        }))
        .unwrap();

        let lesson = record.into_lesson().unwrap();
        let quiz = lesson.quiz().unwrap();
        assert_eq!(lesson.id().as_str(), "7");
        assert_eq!(lesson.slug().as_str(), "quiz-1");
        assert_eq!(lesson.content_md(), "");
        assert_eq!(lesson.progress(), ProgressStatus::Incomplete);
        assert_eq!(quiz.questions().len(), 1);
        assert_eq!(quiz.questions()[0].choices[0].text, "4");
    }

    #[test]
    fn judge_lesson_requires_problem() {
        let record: LessonRecord = serde_json::from_value(json!({
            "id": "l1", "slug": "sum", "title": "Sum", "type": "judge"
        }))
        .unwrap();

        let err = record.into_lesson().unwrap_err();
        assert_eq!(err, lesson_core::Error::Lesson(LessonError::MissingProblem));
    }

    #[test]
    fn judge_lesson_reads_languages_and_samples() {
        let record: LessonRecord = serde_json::from_value(json!({
            "id": "l1", "slug": "sum", "title": "Sum", "type": "judge",
            "content_md": "Add two numbers",
            "progress": { "status": "completed" },
            "problem": {
                "title": "A+B",
                "allowed_languages": [
                    {
                        "id": "py",
                        "key": "python",
                        "starter_code": "a, b = map(int, input().split())"
                    },
                    { "id": "cc", "key": "cpp", "starter_code": "" }
                ],
                "sample_testcases": [{ "id": 1, "input_data": "1 2", "expected_output": "3" }]
            }
        }))
        .unwrap();

        let lesson = record.into_lesson().unwrap();
        let problem = lesson.problem().unwrap();
        assert_eq!(lesson.progress(), ProgressStatus::Completed);
        assert_eq!(problem.languages().len(), 2);
        assert_eq!(problem.languages()[1].starter_code, None);
        assert_eq!(problem.samples()[0].input, "1 2");
        assert_eq!(problem.samples()[0].id, Some(TestCaseId::new("1")));
    }

    #[test]
    fn submission_response_accepts_both_envelopes() {
        let nested: SubmissionResponse = serde_json::from_value(json!({
            "passed": false,
            "status": "wa",
            "summary": {
                "final_status": "wa",
                "tests": [{ "test_id": "t1", "status": "wa", "hidden": false }]
            },
            "next_url": "/rust/b/"
        }))
        .unwrap();
        assert_eq!(nested.status.as_deref(), Some("wa"));
        assert_eq!(nested.summary.unwrap().tests.unwrap().len(), 1);
        assert!(nested.body.tests.is_none());

        let inline: SubmissionResponse = serde_json::from_value(json!({
            "passed": true,
            "final_status": "ac",
            "tests": [{ "status": "ok", "runtime_ms": 12 }]
        }))
        .unwrap();
        assert!(inline.summary.is_none());
        assert_eq!(inline.body.final_status.as_deref(), Some("ac"));
        assert_eq!(inline.body.tests.unwrap()[0].runtime_ms, Some(12));
    }
}
