//! Notification emitter: transient "added to cart" toasts.
//!
//! Each toast walks `Hidden -> Showing -> Visible -> Hiding -> Removed`.
//! `Showing` is emitted synchronously from [`Notifier::show`], so the toast
//! is in the tree before its visible state is applied and the show
//! transition animates. The remaining phases are driven by a tokio task per
//! toast; the task only sends [`ToastEvent`]s, the host applies them.
//!
//! Under [`OverlapPolicy::Replace`] a new toast aborts the pending task of
//! the previous one and removes it immediately.
//!
//! Every send for a toast goes through its delivery lock, which records the
//! last phase sent. Once `Removed` is recorded nothing else is sent for that
//! toast, even from a task poll already running on another worker when the
//! task was aborted.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::NotificationConfig;

/// Errors that can occur when creating a [`Notifier`].
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Timers need a tokio runtime and none is running.
    #[error("notifications require a running tokio runtime")]
    NoRuntime,
}

/// Lifecycle phase of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    /// Not yet in the tree.
    Hidden,
    /// Inserted, visible state not yet applied.
    Showing,
    /// Fully shown.
    Visible,
    /// Hide transition running.
    Hiding,
    /// Taken out of the tree.
    Removed,
}

impl ToastPhase {
    /// The phase that follows this one, or `None` once removed.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Hidden => Some(Self::Showing),
            Self::Showing => Some(Self::Visible),
            Self::Visible => Some(Self::Hiding),
            Self::Hiding => Some(Self::Removed),
            Self::Removed => None,
        }
    }

    /// Whether the toast carries its visible style in this phase.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Identifier of one toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(pub(crate) u64);

impl ToastId {
    /// Get the underlying value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A toast phase change for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastEvent {
    pub id: ToastId,
    pub message: String,
    pub phase: ToastPhase,
}

/// What happens when a toast is shown while another one is still pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// The new toast replaces the pending one.
    #[default]
    Replace,
    /// Toasts stack; each runs its own full lifecycle.
    Stack,
}

impl FromStr for OverlapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "stack" => Ok(Self::Stack),
            other => Err(format!("unknown overlap policy '{other}' (expected replace or stack)")),
        }
    }
}

/// Last phase sent for one toast.
type Delivered = Arc<Mutex<ToastPhase>>;

struct PendingToast {
    id: ToastId,
    message: String,
    delivered: Delivered,
    task: JoinHandle<()>,
}

struct Active {
    config: NotificationConfig,
    handle: Handle,
    events: mpsc::UnboundedSender<ToastEvent>,
    pending: Vec<PendingToast>,
    next_id: u64,
}

/// Emits toasts on a channel.
pub struct Notifier {
    active: Option<Active>,
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.active {
            Some(active) => f
                .debug_struct("Notifier")
                .field("config", &active.config)
                .field("pending", &active.pending.len())
                .finish(),
            None => f.write_str("Notifier(silent)"),
        }
    }
}

impl Notifier {
    /// Create a notifier bound to the current tokio runtime.
    ///
    /// Returns the notifier and the receiver the host drains to apply
    /// toast phases.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::NoRuntime`] when called outside a runtime.
    pub fn new(
        config: NotificationConfig,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ToastEvent>), NotifyError> {
        let handle = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;
        let (events, receiver) = mpsc::unbounded_channel();

        let notifier = Self {
            active: Some(Active {
                config,
                handle,
                events,
                pending: Vec::new(),
                next_id: 1,
            }),
        };
        Ok((notifier, receiver))
    }

    /// A notifier that only logs, for hosts without a toast area.
    #[must_use]
    pub const fn silent() -> Self {
        Self { active: None }
    }

    /// Show a toast.
    ///
    /// Returns the new toast's id, or `None` for a silent notifier.
    pub fn show(&mut self, message: &str) -> Option<ToastId> {
        let Some(active) = self.active.as_mut() else {
            tracing::info!(message, "Notification");
            return None;
        };

        active.pending.retain(|toast| !toast.task.is_finished());

        if active.config.overlap == OverlapPolicy::Replace {
            for toast in active.pending.drain(..) {
                tracing::debug!(toast_id = %toast.id, "Replacing pending toast");
                deliver(
                    &active.events,
                    &toast.delivered,
                    ToastEvent {
                        id: toast.id,
                        message: toast.message,
                        phase: ToastPhase::Removed,
                    },
                );
                toast.task.abort();
            }
        }

        let id = ToastId(active.next_id);
        active.next_id += 1;

        let delivered = Arc::new(Mutex::new(ToastPhase::Hidden));
        deliver(
            &active.events,
            &delivered,
            ToastEvent {
                id,
                message: message.to_string(),
                phase: ToastPhase::Showing,
            },
        );

        let steps = [
            (active.config.show_delay, ToastPhase::Visible),
            (active.config.display_duration, ToastPhase::Hiding),
            (active.config.hide_duration, ToastPhase::Removed),
        ];
        let events = active.events.clone();
        let task_delivered = Arc::clone(&delivered);
        let task_message = message.to_string();
        let task = active.handle.spawn(async move {
            for (delay, phase) in steps {
                tokio::time::sleep(delay).await;
                let event = ToastEvent {
                    id,
                    message: task_message.clone(),
                    phase,
                };
                if !deliver(&events, &task_delivered, event) {
                    return;
                }
            }
        });

        active.pending.push(PendingToast {
            id,
            message: message.to_string(),
            delivered,
            task,
        });

        Some(id)
    }

    /// Number of toasts whose lifecycle is still running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.active.as_ref().map_or(0, |active| {
            active
                .pending
                .iter()
                .filter(|toast| !toast.task.is_finished())
                .count()
        })
    }
}

impl Drop for Notifier {
    fn drop(&mut self) {
        if let Some(active) = self.active.as_mut() {
            for toast in active.pending.drain(..) {
                toast.task.abort();
            }
        }
    }
}

/// Send `event` unless its toast was already removed.
///
/// Returns whether the event was sent. The lock is held across the send so
/// events of one toast reach the channel in the order they are recorded.
fn deliver(
    events: &mpsc::UnboundedSender<ToastEvent>,
    delivered: &Mutex<ToastPhase>,
    event: ToastEvent,
) -> bool {
    let mut last = delivered.lock().unwrap_or_else(PoisonError::into_inner);
    if *last == ToastPhase::Removed {
        return false;
    }

    let phase = event.phase;
    if events.send(event).is_err() {
        tracing::debug!("Toast receiver dropped");
        return false;
    }
    *last = phase;
    true
}
