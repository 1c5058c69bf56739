use thiserror::Error;

use crate::model::{LessonError, ParseSlugError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Lesson(#[from] LessonError),
    #[error(transparent)]
    Slug(#[from] ParseSlugError),
}
