use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lesson_client::SubmissionPayload;
use lesson_core::model::{
    ChoiceId, LanguageId, LessonContent, LessonDescriptor, LessonKey, LessonNeighbors, LessonType,
    Problem, QuestionId, Quiz, SelectedAnswers, SubmissionOutcome,
};

use super::navigation::PendingNavigation;
use crate::error::{SessionError, ValidationError};

/// Console panel shown under the editor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConsoleTab {
    #[default]
    Test,
    Sample,
    Status,
}

impl ConsoleTab {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Sample => "sample",
            Self::Status => "status",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// The three ways a learner can submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitKind {
    Quiz,
    /// Non-scoring preview of a code submission.
    Run,
    /// Scored code submission; can complete the lesson.
    Submit,
}

impl SubmitKind {
    #[must_use]
    pub fn code(is_final_submit: bool) -> Self {
        if is_final_submit {
            Self::Submit
        } else {
            Self::Run
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Run => "run",
            Self::Submit => "submit",
        }
    }

    /// Whether success marks the lesson completed and moves on.
    #[must_use]
    pub fn completes_lesson(self) -> bool {
        matches!(self, Self::Quiz | Self::Submit)
    }
}

//
// ─── MODES ─────────────────────────────────────────────────────────────────────
//

/// Quiz-side session state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizMode {
    selected: SelectedAnswers,
}

impl QuizMode {
    #[must_use]
    pub fn selected(&self) -> &SelectedAnswers {
        &self.selected
    }

    pub(crate) fn select(
        &mut self,
        quiz: &Quiz,
        question: QuestionId,
        choice: ChoiceId,
    ) -> Result<(), ValidationError> {
        let known = quiz
            .question(&question)
            .is_some_and(|q| q.has_choice(&choice));
        if !known {
            return Err(ValidationError::UnknownChoice { question, choice });
        }
        self.selected.select(question, choice);
        Ok(())
    }

    fn prepare(&self) -> Result<SubmissionPayload, ValidationError> {
        let answers = self.selected.to_answers();
        if answers.is_empty() {
            return Err(ValidationError::NoAnswers);
        }
        Ok(SubmissionPayload::Quiz { answers })
    }
}

/// Judge-side session state: editor contents, language and console.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JudgeMode {
    code: String,
    language_id: Option<LanguageId>,
    language_key: Option<String>,
    tab: ConsoleTab,
    is_submit_mode: bool,
    outcome: Option<SubmissionOutcome>,
}

impl JudgeMode {
    #[must_use]
    pub fn new(problem: &Problem) -> Self {
        let default = problem.default_language();
        Self {
            code: problem.initial_code(),
            language_id: default.map(|lang| lang.id.clone()),
            language_key: default.map(|lang| lang.key.clone()),
            tab: ConsoleTab::default(),
            is_submit_mode: false,
            outcome: None,
        }
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn language_id(&self) -> Option<&LanguageId> {
        self.language_id.as_ref()
    }

    #[must_use]
    pub fn language_key(&self) -> Option<&str> {
        self.language_key.as_deref()
    }

    #[must_use]
    pub fn tab(&self) -> ConsoleTab {
        self.tab
    }

    #[must_use]
    pub fn is_submit_mode(&self) -> bool {
        self.is_submit_mode
    }

    #[must_use]
    pub fn outcome(&self) -> Option<&SubmissionOutcome> {
        self.outcome.as_ref()
    }

    pub(crate) fn set_code(&mut self, code: String) {
        self.code = code;
    }

    pub(crate) fn set_tab(&mut self, tab: ConsoleTab) {
        self.tab = tab;
    }

    /// Switches language; the editor is reset to the language's starter code
    /// when it has one.
    pub(crate) fn select_language(
        &mut self,
        problem: &Problem,
        id: &LanguageId,
    ) -> Result<(), ValidationError> {
        let lang = problem
            .language(id)
            .ok_or_else(|| ValidationError::UnknownLanguage(id.clone()))?;
        self.language_id = Some(lang.id.clone());
        self.language_key = Some(lang.key.clone());
        if let Some(starter) = lang.starter_code.as_deref().filter(|s| !s.is_empty()) {
            self.code = starter.to_owned();
        }
        Ok(())
    }

    /// Validates and starts an execution: clears the previous outcome and
    /// records which mode the result will be shown in.
    fn prepare(&mut self, is_final_submit: bool) -> Result<SubmissionPayload, ValidationError> {
        let language = self.language_key.clone().ok_or(ValidationError::NoLanguage)?;
        self.outcome = None;
        self.is_submit_mode = is_final_submit;
        Ok(SubmissionPayload::Code {
            language,
            code: self.code.clone(),
        })
    }

    pub(crate) fn record_outcome(&mut self, outcome: SubmissionOutcome) {
        self.outcome = Some(outcome);
    }
}

/// Per-lesson-type behavior. Each variant knows how to build its submission
/// and carries the state its view renders from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LessonMode {
    Quiz(QuizMode),
    Judge(JudgeMode),
}

impl LessonMode {
    #[must_use]
    pub fn for_lesson(lesson: &LessonDescriptor) -> Self {
        match lesson.content() {
            LessonContent::Quiz(_) => Self::Quiz(QuizMode::default()),
            LessonContent::Judge(problem) => Self::Judge(JudgeMode::new(problem)),
        }
    }

    #[must_use]
    pub fn lesson_type(&self) -> LessonType {
        match self {
            Self::Quiz(_) => LessonType::Quiz,
            Self::Judge(_) => LessonType::Judge,
        }
    }

    /// What the primary "submit" action means for this mode.
    #[must_use]
    pub fn default_submit(&self) -> SubmitKind {
        match self {
            Self::Quiz(_) => SubmitKind::Quiz,
            Self::Judge(_) => SubmitKind::Submit,
        }
    }

    pub(crate) fn prepare(&mut self, kind: SubmitKind) -> Result<SubmissionPayload, SessionError> {
        match (self, kind) {
            (Self::Quiz(quiz), SubmitKind::Quiz) => Ok(quiz.prepare()?),
            (Self::Judge(judge), SubmitKind::Run) => Ok(judge.prepare(false)?),
            (Self::Judge(judge), SubmitKind::Submit) => Ok(judge.prepare(true)?),
            (Self::Quiz(_), SubmitKind::Run | SubmitKind::Submit) => Err(SessionError::WrongMode {
                expected: LessonType::Judge,
            }),
            (Self::Judge(_), SubmitKind::Quiz) => Err(SessionError::WrongMode {
                expected: LessonType::Quiz,
            }),
        }
    }
}

//
// ─── SHARED SESSION STATE ──────────────────────────────────────────────────────
//

#[derive(Debug)]
pub(crate) struct LoadedLesson {
    pub(crate) lesson: LessonDescriptor,
    pub(crate) mode: LessonMode,
}

impl LoadedLesson {
    pub(crate) fn new(lesson: LessonDescriptor) -> Self {
        let mode = LessonMode::for_lesson(&lesson);
        Self { lesson, mode }
    }

    pub(crate) fn judge_mut(&mut self) -> Result<(&Problem, &mut JudgeMode), SessionError> {
        let wrong_mode = SessionError::WrongMode {
            expected: LessonType::Judge,
        };
        let problem = self.lesson.problem().ok_or_else(|| wrong_mode.clone())?;
        match &mut self.mode {
            LessonMode::Judge(judge) => Ok((problem, judge)),
            LessonMode::Quiz(_) => Err(wrong_mode),
        }
    }

    pub(crate) fn quiz_mut(&mut self) -> Result<(&Quiz, &mut QuizMode), SessionError> {
        let wrong_mode = SessionError::WrongMode {
            expected: LessonType::Quiz,
        };
        let quiz = self.lesson.quiz().ok_or_else(|| wrong_mode.clone())?;
        match &mut self.mode {
            LessonMode::Quiz(mode) => Ok((quiz, mode)),
            LessonMode::Judge(_) => Err(wrong_mode),
        }
    }
}

/// State of the one lesson view a controller drives. `generation` changes on
/// every reset; async completions carrying an older generation are dropped.
#[derive(Debug, Default)]
pub(crate) struct SessionInner {
    pub(crate) key: Option<LessonKey>,
    pub(crate) generation: u64,
    pub(crate) phase: LoadPhase,
    pub(crate) loaded: Option<LoadedLesson>,
    pub(crate) neighbors: LessonNeighbors,
    pub(crate) submitting: bool,
    pub(crate) pending_navigation: Option<PendingNavigation>,
    pub(crate) navigation_seq: u64,
}

impl SessionInner {
    /// Starts a fresh session for `key`. Everything keyed to the previous
    /// lesson is dropped, including a scheduled navigation.
    pub(crate) fn reset(&mut self, key: LessonKey) -> u64 {
        self.cancel_navigation();
        self.key = Some(key);
        self.generation += 1;
        self.phase = LoadPhase::Loading;
        self.loaded = None;
        self.neighbors = LessonNeighbors::default();
        self.submitting = false;
        self.generation
    }

    pub(crate) fn cancel_navigation(&mut self) {
        if let Some(pending) = self.pending_navigation.take() {
            pending.cancel();
        }
    }

    pub(crate) fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            key: self.key.clone(),
            phase: self.phase,
            lesson: self.loaded.as_ref().map(|l| l.lesson.clone()),
            mode: self.loaded.as_ref().map(|l| l.mode.clone()),
            neighbors: self.neighbors.clone(),
            submitting: self.submitting,
            pending_navigation: self
                .pending_navigation
                .as_ref()
                .map(|p| p.path().to_owned()),
        }
    }
}

pub(crate) type SharedSession = Arc<Mutex<SessionInner>>;

/// A panic while holding the lock cannot leave the session half-written in a
/// way later readers care about, so poisoning is ignored.
pub(crate) fn lock(shared: &Mutex<SessionInner>) -> MutexGuard<'_, SessionInner> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read-only copy of the session for view models.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub key: Option<LessonKey>,
    pub phase: LoadPhase,
    pub lesson: Option<LessonDescriptor>,
    pub mode: Option<LessonMode>,
    pub neighbors: LessonNeighbors,
    pub submitting: bool,
    /// Route a delayed navigation will open, if one is scheduled.
    pub pending_navigation: Option<String>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn judge(&self) -> Option<&JudgeMode> {
        match &self.mode {
            Some(LessonMode::Judge(judge)) => Some(judge),
            _ => None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizMode> {
        match &self.mode {
            Some(LessonMode::Quiz(quiz)) => Some(quiz),
            _ => None,
        }
    }
}
