//! Task submission and lifetime management
//!
//! The [`Manager`] owns the limiter and the sending half of the message
//! channel. Each submission becomes one tokio task; the caller keeps a
//! [`TaskHandle`] per submission instead of the manager indexing them.

use crate::Result;
use crate::config::EngineConfig;
use crate::error::{InternalError, ValidationError};
use crate::hashing::AlgorithmRegistry;
use crate::limiter::Limiter;
use crate::message::{Message, MessageStream, TaskId};
use crate::request::WorkRequest;
use crate::task::HashingTask;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Schedules hashing tasks and funnels their messages into one stream
#[derive(Debug)]
pub struct Manager {
    config: EngineConfig,
    registry: Arc<AlgorithmRegistry>,
    limiter: Limiter,
    tx: mpsc::Sender<Message>,
    next_id: AtomicU64,
    root: CancellationToken,
    tracker: TaskTracker,
}

impl Manager {
    /// Create a manager and the stream its tasks report to
    ///
    /// Zero values in `config` fall back to their defaults.
    pub fn new(config: EngineConfig, registry: Arc<AlgorithmRegistry>) -> (Self, MessageStream) {
        let config = config.normalized();
        let (tx, rx) = mpsc::channel(config.channel_capacity);
        let manager = Self {
            limiter: Limiter::new(config.concurrency),
            config,
            registry,
            tx,
            next_id: AtomicU64::new(0),
            root: CancellationToken::new(),
            tracker: TaskTracker::new(),
        };
        (manager, MessageStream::new(rx))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<AlgorithmRegistry> {
        &self.registry
    }

    pub fn limiter(&self) -> &Limiter {
        &self.limiter
    }

    /// Submit one request under a fresh token tied to [`Manager::cancel_all`]
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit_one(&self, request: WorkRequest) -> TaskHandle {
        let token = self.root.child_token();
        self.submit_one_with_token(request, token)
    }

    /// Submit one request cancelled by a caller supplied token
    pub fn submit_one_with_token(&self, request: WorkRequest, token: CancellationToken) -> TaskHandle {
        let id = TaskId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let file = request.file_path().to_path_buf();

        let task = HashingTask {
            id,
            request,
            registry: Arc::clone(&self.registry),
            tx: self.tx.clone(),
            cancel: token.clone(),
            buffer_size: self.config.buffer_size,
        };
        let join = self.tracker.spawn(task.run(self.limiter.clone()));

        TaskHandle {
            id,
            file,
            token,
            join,
        }
    }

    /// Submit a batch of requests
    ///
    /// An empty batch is reported on the stream as a batch-level
    /// `NoFileToHash` error and returned as the same error.
    pub async fn submit_many<I>(&self, requests: I) -> Result<Vec<TaskHandle>>
    where
        I: IntoIterator<Item = WorkRequest>,
    {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|request| self.submit_one(request))
            .collect();

        if handles.is_empty() {
            debug!("Empty batch submitted");
            let error = ValidationError::NoFileToHash;
            let _ = self.tx.send(Message::batch_error(error.clone().into())).await;
            return Err(error.into());
        }
        Ok(handles)
    }

    /// Cancel every task submitted through [`Manager::submit_one`] or
    /// [`Manager::submit_many`], including ones submitted afterwards
    pub fn cancel_all(&self) {
        debug!("Cancelling all tasks");
        self.root.cancel();
    }

    /// Token that [`Manager::cancel_all`] cancels
    pub fn root_token(&self) -> &CancellationToken {
        &self.root
    }

    /// Tasks that have not sent `Exited` yet
    pub fn live_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Stop accepting work and wait for every task to exit
    ///
    /// Once this returns, the stream ends after its last buffered message.
    pub async fn join(self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

/// Caller side of one submitted task
#[derive(Debug)]
pub struct TaskHandle {
    id: TaskId,
    file: PathBuf,
    token: CancellationToken,
    join: JoinHandle<()>,
}

impl TaskHandle {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Request cancellation; no effect once the task has finished
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait until the task has sent `Exited`
    pub async fn wait(self) -> Result<()> {
        self.join
            .await
            .map_err(|e| InternalError::task_panicked(e.to_string()).into())
    }
}
