//! Deferred work handed to the embedding event loop.
//!
//! The controller never awaits anything itself. Operations that have to wait
//! (a search fetch, the focus and blur delays) return a [`PickerTask`]; the
//! event loop awaits it and passes the resulting [`Completion`] back to
//! [`PickerController::complete`](crate::PickerController::complete).

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::error::SourceResult;
use crate::source::{ChoiceResponse, ChoiceSource};

/// Delay before focusing the query field, so the view can unhide it first.
pub const FOCUS_DELAY: Duration = Duration::from_millis(250);

/// Delay before a blur closes the results.
///
/// A click on a result arrives after the blur it causes; it is only honored
/// if it is processed within this window.
pub const BLUR_DELAY: Duration = Duration::from_millis(250);

/// Outcome of a finished task.
#[derive(Debug)]
pub enum Completion {
    /// A search finished. `seq` identifies the search that produced it.
    Search {
        seq: u64,
        result: SourceResult<ChoiceResponse>,
    },
    /// The focus delay elapsed.
    Focus,
    /// The blur delay elapsed. `token` identifies the blur that scheduled it.
    Blur { token: u64 },
}

/// What a task is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Search,
    Focus,
    Blur,
}

/// A pending piece of controller work.
#[must_use = "tasks do nothing unless awaited and completed"]
pub struct PickerTask {
    kind: TaskKind,
    future: BoxFuture<'static, Completion>,
}

impl PickerTask {
    pub(crate) fn search(seq: u64, source: Arc<dyn ChoiceSource>, query: String) -> Self {
        let future = async move {
            let result = source.get_choices(&query).await;
            Completion::Search { seq, result }
        };
        Self {
            kind: TaskKind::Search,
            future: future.boxed(),
        }
    }

    pub(crate) fn delayed(kind: TaskKind, delay: Duration, completion: Completion) -> Self {
        let future = async move {
            tokio::time::sleep(delay).await;
            completion
        };
        Self {
            kind,
            future: future.boxed(),
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }
}

impl IntoFuture for PickerTask {
    type Output = Completion;
    type IntoFuture = BoxFuture<'static, Completion>;

    fn into_future(self) -> Self::IntoFuture {
        self.future
    }
}

impl std::fmt::Debug for PickerTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PickerTask")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
