//! Life of a single hashing task
//!
//! ```text
//! Scheduled -> BeforeStart -> Stopped
//!                          -> Running -> Done | Error | Stopped
//! every path ends with Exited
//! ```
//!
//! The async half waits for a limiter unit and supervises; the read and
//! digest loop runs on the blocking pool and talks to the stream with
//! `blocking_send`.

use crate::Result;
use crate::error::{InternalError, IoError, ValidationError};
use crate::hashing::{Accumulator, AlgorithmId, AlgorithmRegistry, Checksum};
use crate::limiter::Limiter;
use crate::message::{Event, Message, TaskId};
use crate::request::WorkRequest;
use crate::state::{ResumeState, StateBlob};
use log::{debug, trace, warn};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Everything a task needs, owned so it can move onto the blocking pool
pub(crate) struct HashingTask {
    pub id: TaskId,
    pub request: WorkRequest,
    pub registry: Arc<AlgorithmRegistry>,
    pub tx: mpsc::Sender<Message>,
    pub cancel: CancellationToken,
    pub buffer_size: usize,
}

/// How the running phase ended when it did not fail
enum Outcome {
    Done(BTreeMap<AlgorithmId, Checksum>),
    Stopped(WorkRequest),
    /// Nobody is listening any more
    Abandoned,
}

impl HashingTask {
    /// Drive the task from admission to `Exited`
    pub(crate) async fn run(self, limiter: Limiter) {
        let id = self.id;
        debug!("Task {id} scheduled: {}", self.request);
        if !self.send(Event::Scheduled).await {
            return;
        }

        let Some(permit) = limiter.acquire(&self.cancel).await else {
            debug!("Task {id} cancelled before start");
            let stopped = Event::Stopped(self.request.clone());
            if self.send(stopped).await {
                self.send(Event::Exited).await;
            }
            return;
        };
        trace!("Task {id} running, {} of {} units in use", limiter.in_use(), limiter.capacity());

        let request = self.request.clone();
        let tx = self.tx.clone();
        let result = tokio::task::spawn_blocking(move || self.run_blocking()).await;

        if let Err(join_error) = result {
            warn!("Task {id} panicked while hashing: {join_error}");
            let error = InternalError::task_panicked(join_error.to_string());
            let _ = tx
                .send(Message::task(id, &request, Event::Error(error.into())))
                .await;
        }

        drop(permit);
        let _ = tx.send(Message::task(id, &request, Event::Exited)).await;
    }

    async fn send(&self, event: Event) -> bool {
        self.tx
            .send(Message::task(self.id, &self.request, event))
            .await
            .is_ok()
    }

    fn send_blocking(&self, event: Event) -> bool {
        self.tx
            .blocking_send(Message::task(self.id, &self.request, event))
            .is_ok()
    }

    /// Running phase; sends the terminal message itself
    fn run_blocking(self) {
        let id = self.id;
        let terminal = match self.hash_file() {
            Ok(Outcome::Done(checksums)) => {
                debug!("Task {id} done");
                Event::Done(checksums)
            }
            Ok(Outcome::Stopped(request)) => {
                debug!("Task {id} stopped: {request}");
                Event::Stopped(request)
            }
            Ok(Outcome::Abandoned) => {
                debug!("Task {id} abandoned, message stream closed");
                return;
            }
            Err(error) => {
                debug!("Task {id} failed: {error}");
                Event::Error(error)
            }
        };
        self.send_blocking(terminal);
    }

    /// Validate, open, optionally restore, then read until EOF or cancellation
    ///
    /// The file handle never outlives this call, so it is closed before the
    /// terminal message goes out.
    fn hash_file(&self) -> Result<Outcome> {
        self.request.validate(&self.registry)?;
        let mut accumulators = self.create_accumulators()?;

        let path = self.request.file_path();
        let mut file = File::open(path).map_err(|e| IoError::open_failure(path, e))?;
        let metadata = file
            .metadata()
            .map_err(|e| IoError::open_failure(path, e))?;
        if metadata.is_dir() {
            return Err(IoError::file_is_directory(path).into());
        }
        let file_size = metadata.len();

        let mut progress = ProgressTracker::new(file_size);
        let mut summed_size = 0u64;

        match self.request.resume_state() {
            Some(state) => {
                restore(&mut accumulators, state, file_size)?;
                file.seek(SeekFrom::Start(state.summed_size))
                    .map_err(|e| IoError::seek_failure(path, e))?;
                summed_size = state.summed_size;
                debug!("Task {} restored at byte {summed_size}", self.id);

                if !self.send_blocking(Event::Restored(state.clone())) {
                    return Ok(Outcome::Abandoned);
                }
                let restored = progress.restore(state.progress);
                if !self.send_blocking(Event::ProgressUpdated(restored)) {
                    return Ok(Outcome::Abandoned);
                }
            }
            None => {
                if !self.send_blocking(Event::Started) {
                    return Ok(Outcome::Abandoned);
                }
            }
        }

        if file_size > 0 {
            let mut buffer = vec![0u8; self.buffer_size];
            loop {
                if self.cancel.is_cancelled() {
                    let state = snapshot(&accumulators, summed_size, progress.last());
                    let stopped = match state {
                        Some(state) => self.request.resumed_at(state),
                        None => self.request.restarted(),
                    };
                    return Ok(Outcome::Stopped(stopped));
                }
                if self.tx.is_closed() {
                    return Ok(Outcome::Abandoned);
                }

                let read = match file.read(&mut buffer) {
                    Ok(0) => break,
                    Ok(read) => read,
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) => return Err(IoError::read_failure(path, e).into()),
                };
                for (_, accumulator) in accumulators.iter_mut() {
                    accumulator.write(&buffer[..read])?;
                }
                summed_size += read as u64;

                if let Some(percent) = progress.advance(summed_size) {
                    trace!("Task {} at {percent}%", self.id);
                    if !self.send_blocking(Event::ProgressUpdated(percent)) {
                        return Ok(Outcome::Abandoned);
                    }
                }
            }
        } else if let Some(percent) = progress.advance(0) {
            if !self.send_blocking(Event::ProgressUpdated(percent)) {
                return Ok(Outcome::Abandoned);
            }
        }

        let checksums = accumulators
            .iter()
            .map(|(id, accumulator)| (id.clone(), accumulator.final_checksum()))
            .collect();
        Ok(Outcome::Done(checksums))
    }

    fn create_accumulators(&self) -> Result<Vec<(AlgorithmId, Box<dyn Accumulator>)>> {
        self.request
            .algorithms()
            .iter()
            .map(|id| {
                let algorithm = self
                    .registry
                    .get(id)
                    .ok_or_else(|| ValidationError::algorithm_unavailable(id))?;
                Ok((id.clone(), algorithm.create_accumulator()))
            })
            .collect()
    }
}

/// Load every accumulator from `state`
fn restore(
    accumulators: &mut [(AlgorithmId, Box<dyn Accumulator>)],
    state: &ResumeState,
    file_size: u64,
) -> Result<()> {
    if state.summed_size > file_size {
        return Err(ValidationError::invalid_resume_state(format!(
            "summed size {} exceeds file size {file_size}",
            state.summed_size
        ))
        .into());
    }
    for (id, accumulator) in accumulators.iter_mut() {
        let blob = state
            .per_algorithm_state
            .get(id)
            .ok_or_else(|| ValidationError::invalid_resume_state(format!("missing state for {id}")))?;
        accumulator.import_state(blob.as_bytes())?;
        if accumulator.bytes_written() != state.summed_size {
            return Err(ValidationError::invalid_resume_state(format!(
                "{id} state covers {} bytes but summed size is {}",
                accumulator.bytes_written(),
                state.summed_size
            ))
            .into());
        }
    }
    Ok(())
}

/// Export every accumulator, `None` if any of them cannot be exported
fn snapshot(
    accumulators: &[(AlgorithmId, Box<dyn Accumulator>)],
    summed_size: u64,
    progress: u8,
) -> Option<ResumeState> {
    let mut datas = BTreeMap::new();
    for (id, accumulator) in accumulators {
        match accumulator.export_state() {
            Ok(bytes) => {
                datas.insert(id.clone(), StateBlob::new(bytes));
            }
            Err(error) => {
                warn!("Cannot save {id} state, the file will be hashed from the start: {error}");
                return None;
            }
        }
    }
    Some(ResumeState::new(summed_size, progress, datas))
}

/// Percentage bookkeeping; never reports the same or a lower value twice
///
/// Starts from 0 as if it had been reported, so a fresh task's first update
/// is 1% (or 100% for an empty file).
struct ProgressTracker {
    file_size: u64,
    last: u8,
}

impl ProgressTracker {
    fn new(file_size: u64) -> Self {
        Self { file_size, last: 0 }
    }

    fn restore(&mut self, saved: u8) -> u8 {
        self.last = saved;
        saved
    }

    fn last(&self) -> u8 {
        self.last
    }

    /// The percentage to emit for `summed_size`, if it moved forward
    fn advance(&mut self, summed_size: u64) -> Option<u8> {
        let percent = percent(summed_size, self.file_size);
        if percent <= self.last {
            return None;
        }
        self.last = percent;
        Some(percent)
    }
}

fn percent(summed_size: u64, file_size: u64) -> u8 {
    if file_size == 0 {
        return 100;
    }
    let percent = (u128::from(summed_size) * 100 / u128::from(file_size)).min(100);
    percent as u8
}
