//! View models for the lesson screen. Pure projections of a
//! [`services::SessionSnapshot`]; no rendering toolkit involved.

#![forbid(unsafe_code)]

pub mod vm;

pub use vm::{ConsoleVm, LessonScreenVm, LessonVm, NavBarVm};
