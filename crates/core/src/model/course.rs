use crate::model::ids::{CourseSlug, LessonSlug, lesson_path};

/// Flat, ordered lesson sequence of a course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseLessonIndex {
    slugs: Vec<LessonSlug>,
}

impl CourseLessonIndex {
    #[must_use]
    pub fn new(slugs: Vec<LessonSlug>) -> Self {
        Self { slugs }
    }

    #[must_use]
    pub fn slugs(&self) -> &[LessonSlug] {
        &self.slugs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Position of the first lesson with the same normalized slug.
    #[must_use]
    pub fn position(&self, slug: &LessonSlug) -> Option<usize> {
        self.slugs.iter().position(|candidate| candidate == slug)
    }

    /// Neighbors of `slug`. Both sides are absent when the slug is not part of
    /// the course.
    #[must_use]
    pub fn neighbors(&self, slug: &LessonSlug) -> LessonNeighbors {
        let Some(index) = self.position(slug) else {
            return LessonNeighbors::default();
        };

        let prev = if index == 0 {
            PrevLesson::First
        } else {
            PrevLesson::Lesson(self.slugs[index - 1].clone())
        };
        let next = match self.slugs.get(index + 1) {
            Some(slug) => NextLesson::Lesson(slug.clone()),
            None => NextLesson::Last,
        };

        LessonNeighbors {
            prev: Some(prev),
            next: Some(next),
        }
    }
}

impl FromIterator<LessonSlug> for CourseLessonIndex {
    fn from_iter<T: IntoIterator<Item = LessonSlug>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// What lies before the current lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrevLesson {
    /// The current lesson opens the course.
    First,
    Lesson(LessonSlug),
}

/// What lies after the current lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextLesson {
    /// The current lesson closes the course.
    Last,
    Lesson(LessonSlug),
}

impl NextLesson {
    /// Route of the next lesson; `None` for the `Last` sentinel.
    #[must_use]
    pub fn path(&self, course: &CourseSlug) -> Option<String> {
        match self {
            Self::Last => None,
            Self::Lesson(slug) => Some(lesson_path(course, slug)),
        }
    }
}

impl PrevLesson {
    /// Route of the previous lesson; `None` for the `First` sentinel.
    #[must_use]
    pub fn path(&self, course: &CourseSlug) -> Option<String> {
        match self {
            Self::First => None,
            Self::Lesson(slug) => Some(lesson_path(course, slug)),
        }
    }
}

/// Resolved position of a lesson within its course. Absent sides mean
/// navigation is unavailable (unknown lesson or index not loaded).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonNeighbors {
    pub prev: Option<PrevLesson>,
    pub next: Option<NextLesson>,
}

impl LessonNeighbors {
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.prev.is_some() || self.next.is_some()
    }

    /// Concrete route of the next lesson, if there is one.
    #[must_use]
    pub fn next_path(&self, course: &CourseSlug) -> Option<String> {
        self.next.as_ref().and_then(|next| next.path(course))
    }
}
