mod controller;
pub mod messages;
mod navigation;
mod pipeline;
mod state;

// Public API of the lesson session subsystem.
pub use crate::error::SessionError;
pub use controller::LessonSessionController;
pub use pipeline::{AttemptId, SubmitReport};
pub use state::{
    ConsoleTab, JudgeMode, LessonMode, LoadPhase, QuizMode, SessionSnapshot, SubmitKind,
};
