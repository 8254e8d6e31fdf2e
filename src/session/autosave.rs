// src/session/autosave.rs
//! Debounced autosave worker
//!
//! One background task owns the pending deadline. Every `touch` replaces it,
//! saves run inside the task loop so two of them can never overlap, and
//! `flush`/`shutdown` are explicit commands answered over a oneshot.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::error::{Result, VaultError};

/// Whatever the worker persists when the window closes.
#[async_trait]
pub trait SaveTarget: Send + Sync + 'static {
    async fn save(&self) -> Result<()>;
}

/// Outcome of the most recent autosave activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Idle,
    /// An edit is waiting for the quiescence window to close.
    Pending,
    Saved { writes: u64 },
    Failed(String),
}

enum Command {
    Touch,
    Flush(oneshot::Sender<Result<()>>),
    Cancel(oneshot::Sender<()>),
    Shutdown {
        flush: bool,
        reply: oneshot::Sender<Result<()>>,
    },
}

/// Handle to the autosave worker.
pub struct Autosave {
    command_tx: mpsc::UnboundedSender<Command>,
    status_rx: watch::Receiver<SaveStatus>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Autosave {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// `flush_on_drop` decides what happens to a pending edit if every handle is
    /// dropped without an explicit [`Autosave::shutdown`].
    pub fn spawn(target: Arc<dyn SaveTarget>, debounce: Duration, flush_on_drop: bool) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);

        let worker = Worker {
            target,
            debounce,
            flush_on_drop,
            status_tx,
            writes: 0,
        };
        let task = tokio::spawn(worker.run(command_rx));

        Self {
            command_tx,
            status_rx,
            task: Mutex::new(Some(task)),
        }
    }

    /// Restart the quiescence window.
    pub fn touch(&self) {
        if self.command_tx.send(Command::Touch).is_err() {
            warn!("Autosave worker gone; edit will not be saved");
        }
    }

    /// Save now if an edit is pending. A no-op otherwise.
    pub async fn flush(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Flush(reply))?;
        rx.await.map_err(|_| worker_gone())?
    }

    /// Drop a pending edit without saving it.
    pub async fn cancel(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Cancel(reply))?;
        rx.await.map_err(|_| worker_gone())
    }

    /// Stop the worker, flushing first when `flush` is set.
    pub async fn shutdown(&self, flush: bool) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        let result = match self.send(Command::Shutdown { flush, reply }) {
            Ok(()) => rx.await.map_err(|_| worker_gone())?,
            Err(err) => Err(err),
        };

        if let Some(task) = self.task.lock().await.take() {
            let _ = task.await;
        }
        result
    }

    pub fn status(&self) -> SaveStatus {
        self.status_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status_rx.clone()
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.command_tx.send(cmd).map_err(|_| worker_gone())
    }
}

fn worker_gone() -> VaultError {
    VaultError::Storage("autosave worker stopped".into())
}

struct Worker {
    target: Arc<dyn SaveTarget>,
    debounce: Duration,
    flush_on_drop: bool,
    status_tx: watch::Sender<SaveStatus>,
    writes: u64,
}

impl Worker {
    async fn run(mut self, mut command_rx: mpsc::UnboundedReceiver<Command>) {
        let mut deadline: Option<Instant> = None;

        loop {
            let armed = deadline;
            let window = async move {
                match armed {
                    Some(at) => sleep_until(at).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                cmd = command_rx.recv() => match cmd {
                    Some(Command::Touch) => {
                        deadline = Some(Instant::now() + self.debounce);
                        self.status_tx.send_replace(SaveStatus::Pending);
                    }
                    Some(Command::Flush(reply)) => {
                        let result = if deadline.take().is_some() {
                            self.save().await
                        } else {
                            Ok(())
                        };
                        let _ = reply.send(result);
                    }
                    Some(Command::Cancel(reply)) => {
                        if deadline.take().is_some() {
                            debug!("Pending autosave discarded");
                            self.status_tx.send_replace(SaveStatus::Idle);
                        }
                        let _ = reply.send(());
                    }
                    Some(Command::Shutdown { flush, reply }) => {
                        let result = match deadline.take() {
                            Some(_) if flush => self.save().await,
                            Some(_) => {
                                warn!("Session closed with an unsaved edit; discarding it");
                                Ok(())
                            }
                            None => Ok(()),
                        };
                        let _ = reply.send(result);
                        break;
                    }
                    None => {
                        if deadline.is_some() && self.flush_on_drop {
                            let _ = self.save().await;
                        }
                        break;
                    }
                },
                _ = window => {
                    deadline = None;
                    let _ = self.save().await;
                }
            }
        }

        debug!("Autosave worker stopped after {} write(s)", self.writes);
    }

    async fn save(&mut self) -> Result<()> {
        match self.target.save().await {
            Ok(()) => {
                self.writes += 1;
                info!(writes = self.writes, "Autosave complete");
                self.status_tx
                    .send_replace(SaveStatus::Saved { writes: self.writes });
                Ok(())
            }
            Err(err) => {
                warn!("Autosave failed: {}", err);
                self.status_tx.send_replace(SaveStatus::Failed(err.to_string()));
                Err(err)
            }
        }
    }
}
