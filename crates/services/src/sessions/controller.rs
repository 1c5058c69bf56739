use std::sync::{Arc, Mutex};

use tracing::{debug, error, info, warn};

use lesson_client::LessonApi;
use lesson_core::model::{
    ChoiceId, LanguageId, LessonKey, LessonNeighbors, NextLesson, PrevLesson, QuestionId,
    lesson_path,
};

use super::messages;
use super::pipeline::{SubmissionPipeline, SubmitReport};
use super::state::{
    ConsoleTab, LoadPhase, LoadedLesson, SessionInner, SessionSnapshot, SharedSession, SubmitKind,
    lock,
};
use crate::config::SessionConfig;
use crate::course_index::CourseIndexResolver;
use crate::error::{LoadError, SessionError};
use crate::ports::{Navigator, Notice, Notifier};

/// Drives one lesson view: loading, editing, submitting and moving on.
///
/// All methods take `&self`; state lives behind a lock that is never held
/// across an await. Opening a new lesson invalidates every completion still
/// in flight for the previous one.
pub struct LessonSessionController {
    api: Arc<dyn LessonApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    resolver: CourseIndexResolver,
    pipeline: SubmissionPipeline,
    shared: SharedSession,
}

impl LessonSessionController {
    #[must_use]
    pub fn new(
        api: Arc<dyn LessonApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        config: SessionConfig,
    ) -> Self {
        let shared: SharedSession = Arc::new(Mutex::new(SessionInner::default()));
        let pipeline = SubmissionPipeline::new(
            Arc::clone(&api),
            Arc::clone(&notifier),
            Arc::clone(&navigator),
            Arc::clone(&shared),
            config.navigation_delay,
        );
        Self {
            resolver: CourseIndexResolver::new(Arc::clone(&api)),
            api,
            notifier,
            navigator,
            pipeline,
            shared,
        }
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Points the session at `key` and loads the lesson and its neighbors
    /// concurrently.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Load` if the lesson cannot be fetched, or
    /// `SessionError::Stale` if another lesson was opened meanwhile. A course
    /// index failure is not an error; navigation just stays unresolved.
    pub async fn open(&self, key: LessonKey) -> Result<(), SessionError> {
        self.reset(key);
        let (lesson, _neighbors) = tokio::join!(self.load_lesson(), self.resolve_navigation());
        lesson
    }

    /// Forgets everything about the current lesson and cancels any scheduled
    /// navigation.
    pub fn reset(&self, key: LessonKey) {
        let generation = lock(&self.shared).reset(key.clone());
        debug!(%key, generation, "session reset");
    }

    /// Fetches the current lesson and initializes its mode.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotOpen` before `reset`/`open`,
    /// `SessionError::Load` on fetch failure and `SessionError::Stale` if the
    /// lesson changed while fetching.
    pub async fn load_lesson(&self) -> Result<(), SessionError> {
        let (key, generation) = self.current()?;
        let fetched = self.api.fetch_lesson(&key).await;

        let mut inner = lock(&self.shared);
        if inner.generation != generation {
            debug!(%key, "discarding lesson fetched for a previous session");
            return Err(SessionError::Stale);
        }
        match fetched {
            Ok(lesson) => {
                info!(%key, kind = %lesson.lesson_type(), "lesson loaded");
                inner.loaded = Some(LoadedLesson::new(lesson));
                inner.phase = LoadPhase::Ready;
                Ok(())
            }
            Err(err) => {
                inner.phase = LoadPhase::Failed;
                drop(inner);
                error!(%key, error = %err, "failed to load lesson");
                self.notifier
                    .notify(Notice::Error(messages::LOAD_FAILED.to_owned()));
                Err(LoadError::Lesson(err).into())
            }
        }
    }

    /// Resolves and stores the lesson's neighbors.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotOpen` before `reset`/`open` and
    /// `SessionError::Stale` if the lesson changed while resolving.
    pub async fn resolve_navigation(&self) -> Result<LessonNeighbors, SessionError> {
        let (key, generation) = self.current()?;
        let neighbors = self.resolver.resolve(&key).await;

        let mut inner = lock(&self.shared);
        if inner.generation != generation {
            debug!(%key, "discarding course index for a previous session");
            return Err(SessionError::Stale);
        }
        inner.neighbors = neighbors.clone();
        Ok(neighbors)
    }

    fn current(&self) -> Result<(LessonKey, u64), SessionError> {
        let inner = lock(&self.shared);
        let key = inner.key.clone().ok_or(SessionError::NotOpen)?;
        Ok((key, inner.generation))
    }

    fn with_loaded<R>(
        &self,
        f: impl FnOnce(&mut LoadedLesson) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        let mut inner = lock(&self.shared);
        if inner.key.is_none() {
            return Err(SessionError::NotOpen);
        }
        let loaded = inner.loaded.as_mut().ok_or(SessionError::NotLoaded)?;
        f(loaded)
    }

    //
    // ─── EDITING ───────────────────────────────────────────────────────────────
    //

    /// Records the learner's choice for a quiz question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongMode` outside quiz lessons and a
    /// validation error for choices the question does not offer.
    pub fn select_answer(
        &self,
        question: QuestionId,
        choice: ChoiceId,
    ) -> Result<(), SessionError> {
        self.with_loaded(|loaded| {
            let (quiz, mode) = loaded.quiz_mut()?;
            Ok(mode.select(quiz, question, choice)?)
        })
    }

    /// Replaces the editor contents.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongMode` outside judge lessons.
    pub fn set_code(&self, code: impl Into<String>) -> Result<(), SessionError> {
        let code = code.into();
        self.with_loaded(|loaded| {
            loaded.judge_mut()?.1.set_code(code);
            Ok(())
        })
    }

    /// Switches the editor language.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::WrongMode` outside judge lessons and a
    /// validation error for languages the problem does not allow.
    pub fn select_language(&self, id: &LanguageId) -> Result<(), SessionError> {
        self.with_loaded(|loaded| {
            let (problem, judge) = loaded.judge_mut()?;
            Ok(judge.select_language(problem, id)?)
        })
    }

    /// # Errors
    ///
    /// Returns `SessionError::WrongMode` outside judge lessons.
    pub fn set_console_tab(&self, tab: ConsoleTab) -> Result<(), SessionError> {
        self.with_loaded(|loaded| {
            loaded.judge_mut()?.1.set_tab(tab);
            Ok(())
        })
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Submits the selected quiz answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Busy` while another submission is in flight,
    /// a validation error when nothing is selected and
    /// `SessionError::Transport` when the request fails. A failing grade is
    /// an `Ok(SubmitReport::Failed)`.
    pub async fn submit_quiz(&self) -> Result<SubmitReport, SessionError> {
        self.pipeline.submit(SubmitKind::Quiz).await
    }

    /// Runs (`false`) or submits (`true`) the editor contents.
    ///
    /// # Errors
    ///
    /// Same as [`Self::submit_quiz`], with a validation error when no
    /// language is selected.
    pub async fn submit_code(&self, is_final_submit: bool) -> Result<SubmitReport, SessionError> {
        self.pipeline.submit(SubmitKind::code(is_final_submit)).await
    }

    /// Primary action of the current lesson: quiz submit or final code
    /// submit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotLoaded` before the lesson is loaded, plus
    /// everything [`Self::submit_quiz`] and [`Self::submit_code`] return.
    pub async fn submit(&self) -> Result<SubmitReport, SessionError> {
        let kind = self.with_loaded(|loaded| Ok(loaded.mode.default_submit()))?;
        self.pipeline.submit(kind).await
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Opens the next lesson, or the course root when there is none.
    /// Returns the path navigated to.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotOpen` before `reset`/`open`.
    pub fn go_next(&self) -> Result<String, SessionError> {
        let (path, last) = {
            let mut inner = lock(&self.shared);
            inner.cancel_navigation();
            let key = inner.key.as_ref().ok_or(SessionError::NotOpen)?;
            match &inner.neighbors.next {
                Some(NextLesson::Lesson(slug)) => (lesson_path(&key.course, slug), false),
                Some(NextLesson::Last) => (key.course.root_path(), true),
                None => {
                    warn!(%key, "next lesson unknown; returning to course");
                    (key.course.root_path(), false)
                }
            }
        };
        if last {
            self.notifier
                .notify(Notice::Success(messages::FINAL_LESSON.to_owned()));
        }
        self.navigator.navigate(&path);
        Ok(path)
    }

    /// Opens the previous lesson, or the course root from the first lesson.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotOpen` before `reset`/`open`.
    pub fn go_back(&self) -> Result<String, SessionError> {
        let path = {
            let mut inner = lock(&self.shared);
            inner.cancel_navigation();
            let key = inner.key.as_ref().ok_or(SessionError::NotOpen)?;
            match &inner.neighbors.prev {
                Some(PrevLesson::Lesson(slug)) => lesson_path(&key.course, slug),
                Some(PrevLesson::First) | None => key.course.root_path(),
            }
        };
        self.navigator.navigate(&path);
        Ok(path)
    }

    //
    // ─── READ SIDE ─────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.shared).snapshot()
    }

    #[must_use]
    pub fn has_pending_navigation(&self) -> bool {
        lock(&self.shared).pending_navigation.is_some()
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        lock(&self.shared).submitting
    }
}

impl Drop for LessonSessionController {
    fn drop(&mut self) {
        lock(&self.shared).cancel_navigation();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_client::InMemoryLessonApi;
    use lesson_core::model::{CourseSlug, LessonSlug};

    use crate::ports::{RecordingNavigator, RecordingNotifier};

    fn controller(
        api: InMemoryLessonApi,
    ) -> (LessonSessionController, RecordingNotifier, RecordingNavigator) {
        let notifier = RecordingNotifier::new();
        let navigator = RecordingNavigator::new();
        let controller = LessonSessionController::new(
            Arc::new(api),
            Arc::new(notifier.clone()),
            Arc::new(navigator.clone()),
            SessionConfig::default(),
        );
        (controller, notifier, navigator)
    }

    #[tokio::test]
    async fn operations_before_open_are_rejected() {
        let (controller, _, _) = controller(InMemoryLessonApi::new());
        assert_eq!(controller.load_lesson().await, Err(SessionError::NotOpen));
        assert_eq!(controller.go_next(), Err(SessionError::NotOpen));
        assert_eq!(controller.set_code("x"), Err(SessionError::NotOpen));
        assert_eq!(controller.snapshot().phase, LoadPhase::Idle);
    }

    #[tokio::test]
    async fn missing_lesson_fails_load_and_notifies() {
        let (controller, notifier, _) = controller(InMemoryLessonApi::new());

        let err = controller
            .open(LessonKey::parse("rust", "nope").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, SessionError::Load(LoadError::Lesson(_))));
        assert_eq!(controller.snapshot().phase, LoadPhase::Failed);
        assert_eq!(
            notifier.last(),
            Some(Notice::Error(messages::LOAD_FAILED.to_owned()))
        );
    }

    #[tokio::test]
    async fn navigation_falls_back_to_course_root() {
        let api = InMemoryLessonApi::new();
        let index = ["a", "b"]
            .iter()
            .map(|s| LessonSlug::parse(s).unwrap())
            .collect();
        api.insert_course(CourseSlug::parse("rust").unwrap(), index)
            .unwrap();
        let (controller, notifier, navigator) = controller(api);

        controller.reset(LessonKey::parse("rust", "a").unwrap());
        controller.resolve_navigation().await.unwrap();
        assert_eq!(controller.go_back().unwrap(), "/rust");
        assert_eq!(controller.go_next().unwrap(), "/rust/b");

        controller.reset(LessonKey::parse("rust", "b").unwrap());
        controller.resolve_navigation().await.unwrap();
        assert_eq!(controller.go_next().unwrap(), "/rust");
        assert_eq!(
            notifier.last(),
            Some(Notice::Success(messages::FINAL_LESSON.to_owned()))
        );
        assert_eq!(navigator.paths(), vec!["/rust", "/rust/b", "/rust"]);
    }
}
