#![forbid(unsafe_code)]

pub mod api;
pub mod http;
pub mod memory;
pub mod records;

pub use api::{ApiError, LessonApi, SubmissionPayload};
pub use http::{ApiConfig, HttpLessonApi};
pub use memory::{InMemoryLessonApi, SubmissionGate};
pub use records::{ResultBody, SubmissionResponse, TestRecord};
