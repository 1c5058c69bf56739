use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Backend identifiers are opaque strings (UUIDs in practice). The core never
/// interprets them beyond equality.
macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

opaque_id!(
    /// Unique identifier for a Lesson
    LessonId
);
opaque_id!(
    /// Unique identifier for a quiz Question
    QuestionId
);
opaque_id!(
    /// Unique identifier for a Choice within a question
    ChoiceId
);
opaque_id!(
    /// Unique identifier for a judge Language
    LanguageId
);
opaque_id!(
    /// Unique identifier for a judge test case
    TestCaseId
);

// ─── Slugs ─────────────────────────────────────────────────────────────────────

/// Error type for parsing a slug from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} slug: {raw:?}")]
pub struct ParseSlugError {
    kind: &'static str,
    raw: String,
}

/// Strips a single trailing separator, matching how routes are written.
fn trim_separator(raw: &str) -> &str {
    raw.trim().strip_suffix('/').unwrap_or(raw.trim())
}

fn parse_slug(raw: &str, kind: &'static str) -> Result<String, ParseSlugError> {
    let trimmed = trim_separator(raw);
    if trimmed.is_empty() || trimmed.contains('/') {
        return Err(ParseSlugError {
            kind,
            raw: raw.to_owned(),
        });
    }
    Ok(trimmed.to_owned())
}

/// URL slug of a course.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CourseSlug(String);

impl CourseSlug {
    /// Parses a course slug, dropping one trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns `ParseSlugError` for empty slugs or slugs with inner separators.
    pub fn parse(raw: &str) -> Result<Self, ParseSlugError> {
        parse_slug(raw, "course").map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Route of the course overview page.
    #[must_use]
    pub fn root_path(&self) -> String {
        format!("/{}", self.0)
    }
}

/// URL slug of a lesson.
///
/// Equality and hashing are case-insensitive and ignore one trailing
/// separator, so `"Intro/"` and `"intro"` name the same lesson. The spelling
/// as given (minus the separator) is kept for building routes.
#[derive(Clone)]
pub struct LessonSlug {
    raw: String,
    key: String,
}

impl LessonSlug {
    /// Parses a lesson slug, dropping one trailing `/`.
    ///
    /// # Errors
    ///
    /// Returns `ParseSlugError` for empty slugs or slugs with inner separators.
    pub fn parse(raw: &str) -> Result<Self, ParseSlugError> {
        let raw = parse_slug(raw, "lesson")?;
        let key = raw.to_lowercase();
        Ok(Self { raw, key })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Normalized comparison key (lowercase, no trailing separator).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for LessonSlug {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LessonSlug {}

impl Hash for LessonSlug {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Debug for CourseSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CourseSlug({})", self.0)
    }
}

impl fmt::Debug for LessonSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonSlug({})", self.raw)
    }
}

impl fmt::Display for CourseSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for LessonSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for CourseSlug {
    type Err = ParseSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl FromStr for LessonSlug {
    type Err = ParseSlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ─── Serde ─────────────────────────────────────────────────────────────────────

impl Serialize for LessonSlug {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for LessonSlug {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl Serialize for CourseSlug {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CourseSlug {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Identifies one lesson view: the pair of route parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LessonKey {
    pub course: CourseSlug,
    pub lesson: LessonSlug,
}

impl LessonKey {
    #[must_use]
    pub fn new(course: CourseSlug, lesson: LessonSlug) -> Self {
        Self { course, lesson }
    }

    /// Parses both route parameters.
    ///
    /// # Errors
    ///
    /// Returns `ParseSlugError` if either slug is invalid.
    pub fn parse(course: &str, lesson: &str) -> Result<Self, ParseSlugError> {
        Ok(Self::new(CourseSlug::parse(course)?, LessonSlug::parse(lesson)?))
    }

    /// Route of this lesson, `/{course}/{lesson}`.
    #[must_use]
    pub fn path(&self) -> String {
        lesson_path(&self.course, &self.lesson)
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.course, self.lesson)
    }
}

/// Route of a lesson within a course.
#[must_use]
pub fn lesson_path(course: &CourseSlug, lesson: &LessonSlug) -> String {
    format!("/{}/{}", course.as_str(), lesson.as_str())
}
