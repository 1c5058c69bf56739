use std::sync::Arc;

use tracing::{debug, warn};

use lesson_client::LessonApi;
use lesson_core::model::{CourseLessonIndex, CourseSlug, LessonKey, LessonNeighbors};

use crate::error::LoadError;

/// Resolves where a lesson sits within its course.
#[derive(Clone)]
pub struct CourseIndexResolver {
    api: Arc<dyn LessonApi>,
}

impl CourseIndexResolver {
    #[must_use]
    pub fn new(api: Arc<dyn LessonApi>) -> Self {
        Self { api }
    }

    /// Fetch a course's flattened lesson order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Course` when the course cannot be fetched.
    pub async fn fetch_index(&self, course: &CourseSlug) -> Result<CourseLessonIndex, LoadError> {
        self.api.fetch_course(course).await.map_err(LoadError::Course)
    }

    /// Previous/next lessons for `key`.
    ///
    /// Never fails: a fetch error or a lesson missing from the course leaves
    /// both sides absent, and the UI falls back to the course root.
    pub async fn resolve(&self, key: &LessonKey) -> LessonNeighbors {
        let index = match self.fetch_index(&key.course).await {
            Ok(index) => index,
            Err(err) => {
                warn!(
                    course = %key.course,
                    error = %err,
                    "course index unavailable; navigation disabled"
                );
                return LessonNeighbors::default();
            }
        };

        let neighbors = index.neighbors(&key.lesson);
        if neighbors.is_resolved() {
            debug!(
                course = %key.course,
                lesson = %key.lesson,
                ?neighbors,
                "resolved lesson neighbors"
            );
        } else {
            warn!(
                course = %key.course,
                lesson = %key.lesson,
                lessons = index.len(),
                "lesson not found in course index"
            );
        }
        neighbors
    }
}
