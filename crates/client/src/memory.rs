use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Semaphore;

use lesson_core::model::{CourseLessonIndex, CourseSlug, LessonDescriptor, LessonKey};

use crate::api::{ApiError, LessonApi, SubmissionPayload};
use crate::records::SubmissionResponse;

#[derive(Default)]
struct MemoryState {
    lessons: HashMap<LessonKey, LessonDescriptor>,
    courses: HashMap<CourseSlug, CourseLessonIndex>,
    responses: VecDeque<Result<SubmissionResponse, ApiError>>,
    submissions: Vec<(LessonKey, SubmissionPayload)>,
    lesson_error: Option<ApiError>,
    course_error: Option<ApiError>,
    lesson_fetches: usize,
    course_fetches: usize,
}

/// Simple in-memory backend for testing and prototyping.
///
/// Submission results are scripted: each `submit_answer` pops the next queued
/// response. Every submission is logged before it resolves, so callers can
/// count network calls even while a request is held by the gate.
#[derive(Clone, Default)]
pub struct InMemoryLessonApi {
    state: Arc<Mutex<MemoryState>>,
    gate: Option<Arc<Semaphore>>,
}

/// Holds submissions in flight until released. See
/// [`InMemoryLessonApi::with_submission_gate`].
#[derive(Clone)]
pub struct SubmissionGate {
    permits: Arc<Semaphore>,
}

impl SubmissionGate {
    /// Lets exactly one held submission resolve.
    pub fn release_one(&self) {
        self.permits.add_permits(1);
    }
}

impl InMemoryLessonApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every submission wait until the returned gate releases it.
    #[must_use]
    pub fn with_submission_gate(mut self) -> (Self, SubmissionGate) {
        let permits = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&permits));
        (self, SubmissionGate { permits })
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, ApiError> {
        self.state
            .lock()
            .map_err(|e| ApiError::Transport(e.to_string()))
    }

    /// Registers a lesson under the given route key.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn insert_lesson(&self, key: LessonKey, lesson: LessonDescriptor) -> Result<(), ApiError> {
        self.lock()?.lessons.insert(key, lesson);
        Ok(())
    }

    /// Registers a course's flattened lesson order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn insert_course(
        &self,
        course: CourseSlug,
        index: CourseLessonIndex,
    ) -> Result<(), ApiError> {
        self.lock()?.courses.insert(course, index);
        Ok(())
    }

    /// Queues the result of the next submission.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn push_response(
        &self,
        response: Result<SubmissionResponse, ApiError>,
    ) -> Result<(), ApiError> {
        self.lock()?.responses.push_back(response);
        Ok(())
    }

    /// Makes every lesson fetch fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn fail_lessons(&self, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.lesson_error = Some(error);
        Ok(())
    }

    /// Makes every course fetch fail with `error`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn fail_courses(&self, error: ApiError) -> Result<(), ApiError> {
        self.lock()?.course_error = Some(error);
        Ok(())
    }

    /// Payloads submitted so far, in call order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn submissions(&self) -> Result<Vec<(LessonKey, SubmissionPayload)>, ApiError> {
        Ok(self.lock()?.submissions.clone())
    }

    /// Number of lesson and course fetches so far.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the state lock is poisoned.
    pub fn fetch_counts(&self) -> Result<(usize, usize), ApiError> {
        let guard = self.lock()?;
        Ok((guard.lesson_fetches, guard.course_fetches))
    }
}

#[async_trait]
impl LessonApi for InMemoryLessonApi {
    async fn fetch_lesson(&self, key: &LessonKey) -> Result<LessonDescriptor, ApiError> {
        let mut guard = self.lock()?;
        guard.lesson_fetches += 1;
        if let Some(err) = guard.lesson_error.clone() {
            return Err(err);
        }
        guard.lessons.get(key).cloned().ok_or(ApiError::NotFound)
    }

    async fn fetch_course(&self, course: &CourseSlug) -> Result<CourseLessonIndex, ApiError> {
        let mut guard = self.lock()?;
        guard.course_fetches += 1;
        if let Some(err) = guard.course_error.clone() {
            return Err(err);
        }
        guard.courses.get(course).cloned().ok_or(ApiError::NotFound)
    }

    async fn submit_answer(
        &self,
        key: &LessonKey,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResponse, ApiError> {
        self.lock()?
            .submissions
            .push((key.clone(), payload.clone()));

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            permit.forget();
        }

        self.lock()?
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::LessonSlug;

    fn key() -> LessonKey {
        LessonKey::parse("rust", "intro").unwrap()
    }

    #[tokio::test]
    async fn scripted_responses_are_returned_in_order() {
        let api = InMemoryLessonApi::new();
        api.push_response(Ok(SubmissionResponse {
            passed: Some(false),
            ..SubmissionResponse::default()
        }))
        .unwrap();
        api.push_response(Err(ApiError::HttpStatus(500))).unwrap();

        let payload = SubmissionPayload::Code {
            language: "python".into(),
            code: String::new(),
        };
        let first = api.submit_answer(&key(), &payload).await.unwrap();
        assert_eq!(first.passed, Some(false));
        let second = api.submit_answer(&key(), &payload).await.unwrap_err();
        assert_eq!(second, ApiError::HttpStatus(500));
        assert_eq!(api.submissions().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn course_lookup_and_failure_toggle() {
        let api = InMemoryLessonApi::new();
        let course = CourseSlug::parse("rust").unwrap();
        let index: CourseLessonIndex = ["a", "b"]
            .iter()
            .map(|s| LessonSlug::parse(s).unwrap())
            .collect();
        api.insert_course(course.clone(), index.clone()).unwrap();

        assert_eq!(api.fetch_course(&course).await.unwrap(), index);

        api.fail_courses(ApiError::Transport("offline".into())).unwrap();
        assert!(api.fetch_course(&course).await.is_err());
        assert_eq!(api.fetch_counts().unwrap(), (0, 2));
    }

    #[tokio::test]
    async fn gate_holds_submission_until_released() {
        let (api, gate) = InMemoryLessonApi::new().with_submission_gate();
        api.push_response(Ok(SubmissionResponse::default())).unwrap();

        let payload = SubmissionPayload::Quiz { answers: vec![] };
        let pending = {
            let api = api.clone();
            tokio::spawn(async move { api.submit_answer(&key(), &payload).await })
        };

        tokio::task::yield_now().await;
        assert_eq!(api.submissions().unwrap().len(), 1);
        assert!(!pending.is_finished());

        gate.release_one();
        assert!(pending.await.unwrap().is_ok());
    }
}
