//! Debounced draft autosave engine.
//!
//! A spawned actor owns the debounce timer and the notion of which task is
//! active. Edits arm a pending write stamped with the task id they were
//! typed into; the write lands only after the configured quiescence, and
//! only if that task is still the active one when the timer fires. This is
//! what keeps a settling debounce from one task from leaking into the slot
//! of the task the user switched to.
//!
//! The first edit after an activation is the buffer initialization echo
//! (the session loading the draft or server transcript into the editor)
//! and is never written.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::store::{Draft, DraftStore};

/// Default quiescence before a buffer snapshot is written.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(500);

enum Command {
    Activate(Option<String>),
    Edit(String),
    Clear {
        task_id: String,
        ack: oneshot::Sender<()>,
    },
}

struct PendingWrite {
    task_id: String,
    text: String,
    deadline: Instant,
}

/// Handle to the autosave actor.
///
/// Dropping the handle cancels the actor; [`DraftAutosave::shutdown`]
/// additionally waits for the final flush to finish.
pub struct DraftAutosave {
    tx: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl DraftAutosave {
    /// Spawn the actor against a draft store.
    pub fn spawn(store: Arc<dyn DraftStore>, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let worker = Worker {
            store,
            delay,
            active: None,
            primed: false,
            pending: None,
        };
        let handle = tokio::spawn(worker.run(rx, cancel.clone()));
        Self {
            tx,
            cancel,
            handle: Some(handle),
        }
    }

    /// Switch the active task. `None` deactivates autosave entirely (no
    /// assigned task). The next edit is treated as buffer initialization.
    pub fn activate(&self, task_id: Option<&str>) {
        let _ = self.tx.send(Command::Activate(task_id.map(str::to_string)));
    }

    /// Notify the engine of the current buffer contents.
    pub fn edit(&self, text: &str) {
        let _ = self.tx.send(Command::Edit(text.to_string()));
    }

    /// Remove the stored draft for `task_id` and disarm any pending write
    /// for it. Returns once the removal has happened, so callers can rely
    /// on a revisited task loading the server transcript.
    pub async fn clear(&self, task_id: &str) {
        let (ack, done) = oneshot::channel();
        let command = Command::Clear {
            task_id: task_id.to_string(),
            ack,
        };
        if self.tx.send(command).is_ok() {
            let _ = done.await;
        }
    }

    /// Stop the actor, flushing a settling write for the active task.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for DraftAutosave {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct Worker {
    store: Arc<dyn DraftStore>,
    delay: Duration,
    active: Option<String>,
    primed: bool,
    pending: Option<PendingWrite>,
}

impl Worker {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Command>, cancel: CancellationToken) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    // Apply everything already queued before the final
                    // flush, so work sent just before shutdown is kept.
                    while let Ok(command) = rx.try_recv() {
                        self.apply(command).await;
                    }
                    self.flush().await;
                    break;
                }
                command = rx.recv() => {
                    match command {
                        Some(command) => self.apply(command).await,
                        None => {
                            self.flush().await;
                            break;
                        }
                    }
                }
                _ = flush_timer(self.pending.as_ref().map(|p| p.deadline)) => {
                    self.flush().await;
                }
            }
        }
    }

    async fn apply(&mut self, command: Command) {
        match command {
            Command::Activate(task_id) => {
                self.active = task_id;
                self.primed = false;
            }
            Command::Edit(text) => {
                let Some(task_id) = self.active.clone() else {
                    return;
                };
                if !self.primed {
                    // Buffer initialization echo, not typed input.
                    self.primed = true;
                    return;
                }
                self.pending = Some(PendingWrite {
                    task_id,
                    text,
                    deadline: Instant::now() + self.delay,
                });
            }
            Command::Clear { task_id, ack } => {
                if self.pending.as_ref().is_some_and(|p| p.task_id == task_id) {
                    self.pending = None;
                }
                self.store.remove(&task_id).await;
                let _ = ack.send(());
            }
        }
    }

    /// Write out the pending snapshot, unless the task it was typed into
    /// is no longer the active one.
    async fn flush(&mut self) {
        let Some(write) = self.pending.take() else {
            return;
        };
        if self.active.as_deref() == Some(write.task_id.as_str()) {
            self.store.save(&write.task_id, &Draft::new(write.text)).await;
        } else {
            tracing::debug!(
                task_id = %write.task_id,
                "Discarding draft write for an inactive task"
            );
        }
    }
}

async fn flush_timer(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
