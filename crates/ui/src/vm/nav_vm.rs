use serde::Serialize;
use services::SessionSnapshot;

/// Previous/next controls above the lesson.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NavBarVm {
    pub has_prev: bool,
    pub has_next: bool,
    /// Next stays locked until the lesson is completed.
    pub next_disabled: bool,
}

impl From<&SessionSnapshot> for NavBarVm {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let completed = snapshot
            .lesson
            .as_ref()
            .is_some_and(|lesson| lesson.progress().is_completed());
        Self {
            has_prev: snapshot.neighbors.prev.is_some(),
            has_next: snapshot.neighbors.next.is_some(),
            next_disabled: !completed,
        }
    }
}
