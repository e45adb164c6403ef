//! Observation hooks for request processing.
//!
//! The orchestrator emits an [`Event`] on every state transition and when
//! provider output falls back to heuristic parsing. Handlers are optional
//! and purely observational; they cannot alter the outcome.

use std::sync::Arc;

use crate::normalize::ParsePath;

/// Lifecycle state of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Validated,
    Generating,
    Generated,
    Materializing,
    Done,
    /// Validation failed; the provider was never called.
    Rejected,
    /// The provider call or document insert failed.
    Failed,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestState::Received => "received",
            RequestState::Validated => "validated",
            RequestState::Generating => "generating",
            RequestState::Generated => "generated",
            RequestState::Materializing => "materializing",
            RequestState::Done => "done",
            RequestState::Rejected => "rejected",
            RequestState::Failed => "failed",
        }
    }

    /// No further transitions follow a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestState::Done | RequestState::Rejected | RequestState::Failed
        )
    }
}

impl std::fmt::Display for RequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted while a request is processed.
#[derive(Debug, Clone)]
pub enum Event {
    /// The request moved between states.
    StateChanged {
        from: RequestState,
        to: RequestState,
    },
    /// Provider output was normalized.
    Normalized {
        /// Which extraction path ran.
        path: ParsePath,
    },
    /// A document was inserted.
    DocumentCreated { id: u64 },
}

/// Receiver for [`Event`]s.
///
/// # Example
///
/// ```
/// use pagegen::events::{Event, EventHandler};
///
/// struct PrintHandler;
///
/// impl EventHandler for PrintHandler {
///     fn on_event(&self, event: Event) {
///         if let Event::StateChanged { from, to } = event {
///             println!("{} -> {}", from, to);
///         }
///     }
/// }
/// ```
pub trait EventHandler: Send + Sync {
    fn on_event(&self, event: Event);
}

/// Emit an event if a handler is present. No-op otherwise.
pub(crate) fn emit(handler: &Option<Arc<dyn EventHandler>>, event: Event) {
    if let Some(ref h) = handler {
        h.on_event(event);
    }
}

/// An [`EventHandler`] backed by a closure.
///
/// ```
/// use pagegen::events::{Event, FnEventHandler};
/// use std::sync::Arc;
///
/// let handler = Arc::new(FnEventHandler(|event: Event| {
///     if let Event::DocumentCreated { id } = event {
///         println!("created {}", id);
///     }
/// }));
/// ```
pub struct FnEventHandler<F: Fn(Event) + Send + Sync>(pub F);

impl<F: Fn(Event) + Send + Sync> EventHandler for FnEventHandler<F> {
    fn on_event(&self, event: Event) {
        (self.0)(event);
    }
}
