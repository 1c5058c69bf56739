use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use lesson_client::{ApiError, LessonApi, SubmissionPayload, SubmissionResponse};
use lesson_core::model::{LessonKey, NextLesson, lesson_path};

use super::messages;
use super::navigation::PendingNavigation;
use super::state::{LessonMode, SessionInner, SharedSession, SubmitKind, lock};
use crate::error::SessionError;
use crate::normalize::normalize;
use crate::ports::{Navigator, Notice, Notifier};

/// Correlates the log lines of one submission attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttemptId(Uuid);

impl AttemptId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How a graded submission ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitReport {
    /// `navigation` is the route that opens once the delay elapses; `None`
    /// for runs and for the last lesson of a course.
    Passed { navigation: Option<String> },
    /// `label` is the verdict text for code submissions.
    Failed { label: Option<String> },
}

impl SubmitReport {
    #[must_use]
    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed { .. })
    }
}

/// Holds the session's submitting flag. Dropping the ticket clears it, so an
/// abandoned or panicking submission cannot wedge the session.
struct SubmissionTicket {
    shared: SharedSession,
    generation: u64,
    attempt: AttemptId,
}

impl SubmissionTicket {
    fn issue(shared: &SharedSession, inner: &mut SessionInner) -> Self {
        inner.submitting = true;
        Self {
            shared: Arc::clone(shared),
            generation: inner.generation,
            attempt: AttemptId::new(),
        }
    }
}

impl Drop for SubmissionTicket {
    fn drop(&mut self) {
        let mut inner = lock(&self.shared);
        // After a reset the flag belongs to the new lesson.
        if inner.generation == self.generation {
            inner.submitting = false;
        }
    }
}

type Finished = (Result<SubmitReport, SessionError>, Vec<Notice>);

/// Sends submissions, grades their results into the session and schedules
/// the move to the next lesson.
#[derive(Clone)]
pub(crate) struct SubmissionPipeline {
    api: Arc<dyn LessonApi>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    shared: SharedSession,
    navigation_delay: Duration,
}

impl SubmissionPipeline {
    pub(crate) fn new(
        api: Arc<dyn LessonApi>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        shared: SharedSession,
        navigation_delay: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            navigator,
            shared,
            navigation_delay,
        }
    }

    pub(crate) async fn submit(&self, kind: SubmitKind) -> Result<SubmitReport, SessionError> {
        let (ticket, key, payload) = match self.begin(kind) {
            Ok(started) => started,
            Err(err) => {
                if let SessionError::Validation(invalid) = &err {
                    self.notifier
                        .notify(Notice::Error(invalid.user_message().to_owned()));
                }
                return Err(err);
            }
        };

        let span = info_span!(
            "submission",
            attempt = %ticket.attempt,
            kind = kind.as_str(),
            course = %key.course,
            lesson = %key.lesson,
        );
        let response = self
            .api
            .submit_answer(&key, &payload)
            .instrument(span.clone())
            .await;
        let (report, notices) = span.in_scope(|| self.finish(&ticket, kind, &key, response));

        drop(ticket);
        for notice in notices {
            self.notifier.notify(notice);
        }
        report
    }

    /// Validates and claims the in-flight slot in one critical section.
    fn begin(
        &self,
        kind: SubmitKind,
    ) -> Result<(SubmissionTicket, LessonKey, SubmissionPayload), SessionError> {
        let mut inner = lock(&self.shared);
        let key = inner.key.clone().ok_or(SessionError::NotOpen)?;
        if inner.submitting {
            debug!(kind = kind.as_str(), "submission ignored while another is in flight");
            return Err(SessionError::Busy);
        }
        let payload = inner
            .loaded
            .as_mut()
            .ok_or(SessionError::NotLoaded)?
            .mode
            .prepare(kind)?;
        let ticket = SubmissionTicket::issue(&self.shared, &mut inner);
        Ok((ticket, key, payload))
    }

    fn finish(
        &self,
        ticket: &SubmissionTicket,
        kind: SubmitKind,
        key: &LessonKey,
        response: Result<SubmissionResponse, ApiError>,
    ) -> Finished {
        let mut inner = lock(&self.shared);
        if inner.generation != ticket.generation {
            warn!("lesson changed while grading; discarding result");
            return (Err(SessionError::Stale), Vec::new());
        }

        let response = match response {
            Ok(response) => response,
            Err(err) => {
                error!(error = %err, "submission request failed");
                let message = match kind {
                    SubmitKind::Quiz => messages::QUIZ_TRANSPORT,
                    SubmitKind::Run | SubmitKind::Submit => messages::CODE_TRANSPORT,
                };
                return (
                    Err(SessionError::Transport(err)),
                    vec![Notice::Error(message.to_owned())],
                );
            }
        };

        let mut notices = Vec::new();
        let (passed, label) = match kind {
            SubmitKind::Quiz => {
                let passed = response.passed == Some(true);
                info!(passed, "quiz graded");
                notices.push(if passed {
                    Notice::Success(messages::QUIZ_PASSED.to_owned())
                } else {
                    Notice::Error(messages::QUIZ_FAILED.to_owned())
                });
                (passed, None)
            }
            SubmitKind::Run | SubmitKind::Submit => {
                let outcome = normalize(response);
                let passed = outcome.is_success();
                let label = outcome.failure_label();
                info!(
                    passed,
                    verdict = ?outcome.final_status,
                    tests = outcome.tests.len(),
                    "code graded"
                );
                if let Some(LessonMode::Judge(judge)) = inner.loaded.as_mut().map(|l| &mut l.mode) {
                    judge.record_outcome(outcome);
                }
                if passed {
                    let message = if kind == SubmitKind::Submit {
                        messages::CODE_ACCEPTED
                    } else {
                        messages::RUN_PASSED
                    };
                    notices.push(Notice::Success(message.to_owned()));
                    (true, None)
                } else {
                    notices.push(Notice::Error(messages::code_failed(&label)));
                    (false, Some(label))
                }
            }
        };

        if !passed {
            return (Ok(SubmitReport::Failed { label }), notices);
        }
        if !kind.completes_lesson() {
            return (Ok(SubmitReport::Passed { navigation: None }), notices);
        }
        let navigation = self.complete_lesson(&mut inner, key, &mut notices);
        (Ok(SubmitReport::Passed { navigation }), notices)
    }

    fn complete_lesson(
        &self,
        inner: &mut SessionInner,
        key: &LessonKey,
        notices: &mut Vec<Notice>,
    ) -> Option<String> {
        let newly_completed = inner
            .loaded
            .as_mut()
            .is_some_and(|loaded| loaded.lesson.mark_completed());
        if newly_completed {
            info!("lesson completed");
        }

        match &inner.neighbors.next {
            Some(NextLesson::Lesson(slug)) => {
                let path = lesson_path(&key.course, slug);
                self.schedule_navigation(inner, path.clone());
                Some(path)
            }
            Some(NextLesson::Last) => {
                notices.push(Notice::Success(messages::FINAL_LESSON.to_owned()));
                None
            }
            None => {
                warn!("next lesson unresolved; staying on completed lesson");
                None
            }
        }
    }

    fn schedule_navigation(&self, inner: &mut SessionInner, path: String) {
        inner.navigation_seq += 1;
        debug!(%path, delay_ms = self.navigation_delay.as_millis(), "scheduling navigation");
        let pending = PendingNavigation::schedule(
            Arc::clone(&self.shared),
            Arc::clone(&self.navigator),
            inner.navigation_seq,
            path,
            self.navigation_delay,
        );
        if let Some(previous) = inner.pending_navigation.replace(pending) {
            previous.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn shared_with_key() -> SharedSession {
        let shared: SharedSession = Arc::new(Mutex::new(SessionInner::default()));
        lock(&shared).reset(LessonKey::parse("rust", "intro").unwrap());
        shared
    }

    #[test]
    fn dropping_ticket_clears_submitting() {
        let shared = shared_with_key();
        let ticket = SubmissionTicket::issue(&shared, &mut lock(&shared));
        assert!(lock(&shared).submitting);

        drop(ticket);

        assert!(!lock(&shared).submitting);
    }

    #[test]
    fn stale_ticket_leaves_new_lesson_alone() {
        let shared = shared_with_key();
        let ticket = SubmissionTicket::issue(&shared, &mut lock(&shared));
        {
            let mut inner = lock(&shared);
            inner.reset(LessonKey::parse("rust", "next").unwrap());
            inner.submitting = true;
        }

        drop(ticket);

        assert!(lock(&shared).submitting);
    }

    #[test]
    fn attempt_ids_are_unique() {
        assert_ne!(AttemptId::new(), AttemptId::new());
    }
}
