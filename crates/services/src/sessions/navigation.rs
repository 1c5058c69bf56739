use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::state::{SharedSession, lock};
use crate::ports::Navigator;

/// A route change waiting out its delay.
///
/// The task only navigates if it is still the session's pending navigation
/// when it wakes: a reset, a newer schedule or an explicit cancel all clear
/// or replace it first.
#[derive(Debug)]
pub(crate) struct PendingNavigation {
    id: u64,
    path: String,
    handle: JoinHandle<()>,
}

impl PendingNavigation {
    pub(crate) fn schedule(
        shared: SharedSession,
        navigator: Arc<dyn Navigator>,
        id: u64,
        path: String,
        delay: Duration,
    ) -> Self {
        let target = path.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let still_pending = {
                let mut inner = lock(&shared);
                let current = inner
                    .pending_navigation
                    .as_ref()
                    .is_some_and(|pending| pending.id == id);
                if current {
                    inner.pending_navigation = None;
                }
                current
            };
            if still_pending {
                info!(path = %target, "navigating to next lesson");
                navigator.navigate(&target);
            } else {
                debug!(path = %target, "scheduled navigation superseded");
            }
        });
        Self { id, path, handle }
    }

    pub(crate) fn path(&self) -> &str {
        &self.path
    }

    pub(crate) fn cancel(self) {
        debug!(path = %self.path, "cancelling scheduled navigation");
        self.handle.abort();
    }
}
