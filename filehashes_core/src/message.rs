//! Messages emitted by hashing tasks
//!
//! Every task reports through one shared stream. Messages from one task
//! arrive in emission order; messages of different tasks interleave.

use crate::error::Error;
use crate::hashing::{AlgorithmId, Checksum};
use crate::request::WorkRequest;
use crate::state::ResumeState;
use futures::Stream;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Per-manager task identifier, assigned at submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened to a task
#[derive(Debug, Clone)]
pub enum Event {
    /// Admitted by the manager; waiting for a concurrency slot
    Scheduled,
    /// Hashing from byte 0
    Started,
    /// Hashing continues from the given state
    Restored(ResumeState),
    /// Percentage of the file processed
    ProgressUpdated(u8),
    /// Cancelled; resubmit the carried request to continue
    Stopped(WorkRequest),
    Error(Error),
    Done(BTreeMap<AlgorithmId, Checksum>),
    /// The task is gone and its concurrency slot, if any, is free
    Exited,
}

impl Event {
    /// Wire name of the event kind
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Scheduled => "scheduled",
            Event::Started => "started",
            Event::Restored(_) => "restored",
            Event::ProgressUpdated(_) => "progress_updated",
            Event::Stopped(_) => "stopped",
            Event::Error(_) => "error",
            Event::Done(_) => "done",
            Event::Exited => "exited",
        }
    }

    /// Done, Error and Stopped end a task's work
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Stopped(_) | Event::Error(_) | Event::Done(_))
    }
}

/// One entry of the message stream
///
/// Serialized as `{"id": .., "type": .., "request": .., "data": ..}`.
/// Batch-level errors carry neither id nor request.
#[derive(Debug, Clone)]
pub struct Message {
    pub task_id: Option<TaskId>,
    pub request: Option<WorkRequest>,
    pub event: Event,
}

impl Message {
    pub(crate) fn task(task_id: TaskId, request: &WorkRequest, event: Event) -> Self {
        Self {
            task_id: Some(task_id),
            request: Some(request.clone()),
            event,
        }
    }

    pub(crate) fn batch_error(error: Error) -> Self {
        Self {
            task_id: None,
            request: None,
            event: Event::Error(error),
        }
    }
}

impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_struct("Message", 4)?;
        out.serialize_field("id", &self.task_id)?;
        out.serialize_field("type", self.event.kind())?;
        out.serialize_field("request", &self.request)?;
        match &self.event {
            Event::Scheduled | Event::Started | Event::Exited => {
                out.serialize_field("data", &Option::<()>::None)?
            }
            Event::Restored(state) => out.serialize_field("data", state)?,
            Event::ProgressUpdated(progress) => out.serialize_field("data", progress)?,
            Event::Stopped(request) => out.serialize_field("data", request)?,
            Event::Error(error) => out.serialize_field("data", &error.to_string())?,
            Event::Done(checksums) => out.serialize_field("data", checksums)?,
        }
        out.end()
    }
}

/// Receiving half of the manager's message channel
///
/// Ends once the manager and every task it spawned are gone.
#[derive(Debug)]
pub struct MessageStream {
    rx: mpsc::Receiver<Message>,
}

impl MessageStream {
    pub(crate) fn new(rx: mpsc::Receiver<Message>) -> Self {
        Self { rx }
    }

    /// Receive the next message, `None` once the stream has ended
    pub async fn recv(&mut self) -> Option<Message> {
        self.rx.recv().await
    }

    /// Stop accepting messages; running tasks notice and wind down
    pub fn close(&mut self) {
        self.rx.close();
    }
}

impl Stream for MessageStream {
    type Item = Message;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
