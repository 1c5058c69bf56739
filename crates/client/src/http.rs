use std::env;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use lesson_core::model::{CourseLessonIndex, CourseSlug, LessonDescriptor, LessonKey};

use crate::api::{ApiError, LessonApi, SubmissionPayload};
use crate::records::{CourseRecord, LessonRecord, SubmissionResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1/";

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: Url,
    pub token: Option<String>,
}

impl ApiConfig {
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if `raw` is not an absolute URL.
    pub fn new(raw_base_url: &str) -> Result<Self, ApiError> {
        Ok(Self {
            base_url: parse_base_url(raw_base_url)?,
            token: None,
        })
    }

    /// Reads `LESSON_API_BASE_URL` and `LESSON_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the configured base URL is malformed.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var("LESSON_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let token = env::var("LESSON_API_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());
        Ok(Self::new(&base_url)?.with_token(token))
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }
}

/// Relative joins drop the last path segment unless the base ends in `/`.
fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_owned()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::HttpStatus(status.as_u16())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// `LessonApi` over the lessons REST backend.
#[derive(Clone)]
pub struct HttpLessonApi {
    client: Client,
    config: ApiConfig,
}

impl HttpLessonApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config
            .base_url
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{path}: {e}")))
    }

    fn course_url(&self, course: &CourseSlug) -> Result<Url, ApiError> {
        self.url(&format!("courses/{}/", course.as_str()))
    }

    fn lesson_url(&self, key: &LessonKey) -> Result<Url, ApiError> {
        self.url(&format!(
            "courses/{}/{}/",
            key.course.as_str(),
            key.lesson.as_str()
        ))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %response.url(), "lesson api request failed");
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self.authorize(self.client.get(url)).send().await?;
        Self::decode(response).await
    }
}

#[async_trait]
impl LessonApi for HttpLessonApi {
    async fn fetch_lesson(&self, key: &LessonKey) -> Result<LessonDescriptor, ApiError> {
        let record: LessonRecord = self.get_json(self.lesson_url(key)?).await?;
        Ok(record.into_lesson()?)
    }

    async fn fetch_course(&self, course: &CourseSlug) -> Result<CourseLessonIndex, ApiError> {
        let record: CourseRecord = self.get_json(self.course_url(course)?).await?;
        Ok(record.into_index())
    }

    async fn submit_answer(
        &self,
        key: &LessonKey,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionResponse, ApiError> {
        let url = self.lesson_url(key)?;
        debug!(%url, quiz = payload.is_quiz(), "POST submission");
        let response = self
            .authorize(self.client.post(url))
            .json(payload)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash_so_joins_keep_prefix() {
        let api = HttpLessonApi::new(ApiConfig::new("https://example.test/api/v1").unwrap());
        let key = LessonKey::parse("rust", "Intro").unwrap();
        assert_eq!(
            api.lesson_url(&key).unwrap().as_str(),
            "https://example.test/api/v1/courses/rust/Intro/"
        );
        assert_eq!(
            api.course_url(&key.course).unwrap().as_str(),
            "https://example.test/api/v1/courses/rust/"
        );
    }

    #[test]
    fn relative_base_url_is_rejected() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
