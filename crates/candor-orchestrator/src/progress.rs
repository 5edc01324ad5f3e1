//! Progress signalling and cooperative cancellation

use candor_domain::RunId;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Progress events emitted while a run executes
///
/// An explicit event-channel contract for observers (a UI layer, the CLI)
/// instead of ambient shared state.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    /// The run started; `total_prompts` dispatches are planned
    RunStarted {
        /// The run in progress
        run_id: RunId,
        /// How many prompts the catalog holds for this program
        total_prompts: usize,
    },
    /// One attempt for one prompt was dispatched
    PromptStarted {
        /// Which prompt
        prompt_id: String,
        /// 1-based attempt number
        attempt: u32,
    },
    /// One prompt resolved, successfully or terminally
    PromptResolved {
        /// Which prompt
        prompt_id: String,
        /// Whether a validated payload was obtained
        success: bool,
    },
    /// The run finished (completed or cancelled)
    RunFinished {
        /// The run that finished
        run_id: RunId,
        /// Prompts with a validated payload
        resolved: usize,
        /// Prompts that failed terminally
        failed: usize,
    },
}

/// Sender half of the progress channel
pub type ProgressSender = tokio::sync::mpsc::UnboundedSender<ProgressEvent>;

/// Cooperative cancellation token
///
/// The orchestrator checks the token between prompt dispatches. An
/// in-flight model call is allowed to complete or time out; its result is
/// discarded when the token fired while it was running.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create an unfired token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; idempotent
    pub fn cancel(&self) {
        self.inner.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.inner.load(Ordering::SeqCst)
    }
}
