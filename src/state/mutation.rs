// Post actions: delete and title update.
// Runs mutations in the background and tracks their status for the detail pane.
// Mutations do not invalidate or touch the query caches.

use std::collections::HashMap;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::api::BlogApi;

/// Title sent by the "update title" action.
pub const UPDATED_TITLE: &str = "Updated from blogem";

/// Which action a mutation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Delete,
    UpdateTitle,
}

impl MutationKind {
    pub fn pending_message(&self) -> &'static str {
        match self {
            MutationKind::Delete => "Deleting the post...",
            MutationKind::UpdateTitle => "Updating the post...",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            MutationKind::Delete => "Error deleting the post",
            MutationKind::UpdateTitle => "Error updating the post",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            MutationKind::Delete => "Post has (not) been deleted",
            MutationKind::UpdateTitle => "Post title has (not) been updated",
        }
    }
}

/// Progress of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Error(String),
    Success,
}

/// Completed mutation reported by a spawned task.
#[derive(Debug)]
struct MutationResult {
    kind: MutationKind,
    post_id: u64,
    outcome: Result<(), String>,
}

/// Tracks the delete and update actions per post.
pub struct MutationState {
    statuses: HashMap<(MutationKind, u64), MutationStatus>,
    tx: UnboundedSender<MutationResult>,
    rx: UnboundedReceiver<MutationResult>,
    pending: usize,
}

impl Default for MutationState {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            statuses: HashMap::new(),
            tx,
            rx,
            pending: 0,
        }
    }
}

impl MutationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status of `kind` for `post_id`. Never-started actions read as idle.
    pub fn status(&self, kind: MutationKind, post_id: u64) -> &MutationStatus {
        const IDLE: &MutationStatus = &MutationStatus::Idle;
        self.statuses.get(&(kind, post_id)).unwrap_or(IDLE)
    }

    /// Start `kind` against `post_id`. Ignored while the same action is
    /// pending for that post.
    pub fn start<A: BlogApi>(&mut self, kind: MutationKind, post_id: u64, api: &A) -> bool {
        if *self.status(kind, post_id) == MutationStatus::Pending {
            debug!(?kind, post_id, "mutation already pending, ignoring");
            return false;
        }

        self.statuses.insert((kind, post_id), MutationStatus::Pending);
        self.pending += 1;
        info!(?kind, post_id, "starting mutation");

        let api = api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = match kind {
                MutationKind::Delete => api.delete_post(post_id).await,
                MutationKind::UpdateTitle => {
                    api.update_post(post_id, UPDATED_TITLE).await.map(|_| ())
                }
            };
            let _ = tx.send(MutationResult {
                kind,
                post_id,
                outcome: outcome.map_err(|e| e.to_string()),
            });
        });
        true
    }

    fn apply(&mut self, result: MutationResult) {
        self.pending = self.pending.saturating_sub(1);

        let MutationResult {
            kind,
            post_id,
            outcome,
        } = result;
        let status = match outcome {
            Ok(()) => {
                info!(?kind, post_id, "mutation succeeded");
                MutationStatus::Success
            }
            Err(error) => {
                warn!(?kind, post_id, %error, "mutation failed");
                MutationStatus::Error(error)
            }
        };
        self.statuses.insert((kind, post_id), status);
    }

    /// Apply every finished mutation. Returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.rx.try_recv() {
            self.apply(result);
            applied += 1;
        }
        applied
    }

    /// Wait for every pending mutation to finish.
    pub async fn settle(&mut self) {
        while self.pending > 0 {
            match self.rx.recv().await {
                Some(result) => self.apply(result),
                None => break,
            }
        }
    }
}
