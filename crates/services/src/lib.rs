#![forbid(unsafe_code)]

pub mod config;
pub mod course_index;
pub mod error;
pub mod normalize;
pub mod ports;
pub mod sessions;

pub use config::SessionConfig;
pub use course_index::CourseIndexResolver;
pub use error::{LoadError, SessionError, ValidationError};
pub use normalize::normalize;
pub use ports::{Navigator, Notice, Notifier, RecordingNavigator, RecordingNotifier};

pub use sessions::{
    ConsoleTab, JudgeMode, LessonMode, LessonSessionController, LoadPhase, QuizMode,
    SessionSnapshot, SubmitKind, SubmitReport,
};
