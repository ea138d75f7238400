//! Hash command orchestrator
//!
//! Submits one request per file (plus any saved resume requests), prints
//! messages as they arrive, and on interruption saves every stopped
//! request so a later `--resume` run can continue them.

use crate::config::AppConfig;
use crate::output::{OutputFormatter, emit};
use anyhow::{Context, Result};
use filehashes_core::{
    AlgorithmId, AlgorithmRegistry, Event, Manager, Message, MessageStream, WorkRequest,
};
use log::{debug, info, warn};
use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Exit code when the run was interrupted
pub const EXIT_INTERRUPTED: i32 = 130;

/// Inputs of one hashing run
#[derive(Debug, Clone, Default)]
pub struct HashOptions {
    pub files: Vec<PathBuf>,
    /// Saved requests to resubmit
    pub resume: Option<PathBuf>,
}

/// What happened during a run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub done: usize,
    pub failed: usize,
    pub stopped: Vec<WorkRequest>,
    pub interrupted: bool,
    /// Where stopped requests were written, if anywhere
    pub saved_to: Option<PathBuf>,
}

impl RunSummary {
    fn record(&mut self, message: &Message) {
        match &message.event {
            Event::Done(_) => self.done += 1,
            Event::Error(_) => self.failed += 1,
            Event::Stopped(request) => self.stopped.push(request.clone()),
            _ => {}
        }
    }

    /// 130 when interrupted, 1 when anything failed, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.interrupted {
            EXIT_INTERRUPTED
        } else if self.failed > 0 {
            1
        } else {
            0
        }
    }
}

/// Orchestrator for the hash command
pub struct HashOrchestrator {
    config: AppConfig,
    registry: Arc<AlgorithmRegistry>,
}

impl HashOrchestrator {
    pub fn new(config: AppConfig, registry: AlgorithmRegistry) -> Result<Self> {
        config
            .engine
            .clone()
            .normalized()
            .validate()
            .context("Invalid engine configuration")?;
        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    /// Algorithms requested through configuration and flags
    pub fn algorithms(&self) -> Vec<AlgorithmId> {
        self.config
            .hashing
            .algorithms
            .iter()
            .map(AlgorithmId::new)
            .collect()
    }

    /// Build the request list: saved requests first, then one per file
    pub fn build_requests(&self, options: &HashOptions) -> Result<Vec<WorkRequest>> {
        let mut requests = match &options.resume {
            Some(path) => load_requests(path)?,
            None => Vec::new(),
        };
        let algorithms = self.algorithms();
        requests.extend(
            options
                .files
                .iter()
                .map(|file| WorkRequest::new(file, algorithms.iter().cloned())),
        );
        Ok(requests)
    }

    /// Hash everything, printing through `formatter`, until done or `shutdown` fires
    ///
    /// Stopped requests are written to the configured save-state file.
    pub async fn run<F>(
        &self,
        options: &HashOptions,
        formatter: &dyn OutputFormatter,
        shutdown: F,
    ) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let requests = self.build_requests(options)?;
        debug!("Submitting {} request(s)", requests.len());

        let (manager, stream) = Manager::new(self.config.engine.clone(), Arc::clone(&self.registry));
        if let Err(error) = manager.submit_many(requests).await {
            debug!("Batch rejected: {error}");
        }

        let mut summary = drive(manager, stream, formatter, shutdown).await?;

        if !summary.stopped.is_empty() {
            let path = &self.config.hashing.save_state;
            save_requests(path, &summary.stopped)?;
            info!("Saved {} stopped request(s) to {}", summary.stopped.len(), path.display());
            summary.saved_to = Some(path.clone());
        }
        Ok(summary)
    }
}

/// Drain the stream to its end, cancelling everything once `shutdown` fires
async fn drive<F>(
    manager: Manager,
    mut stream: MessageStream,
    formatter: &dyn OutputFormatter,
    shutdown: F,
) -> Result<RunSummary>
where
    F: Future<Output = ()>,
{
    let root = manager.root_token().clone();
    let join = tokio::spawn(manager.join());
    let mut shutdown = std::pin::pin!(shutdown);
    let mut summary = RunSummary::default();

    loop {
        tokio::select! {
            _ = &mut shutdown, if !summary.interrupted => {
                warn!("Interrupted, stopping all tasks");
                summary.interrupted = true;
                root.cancel();
            }
            message = stream.recv() => {
                let Some(message) = message else { break };
                summary.record(&message);
                if let Some(line) = formatter.format_message(&message)? {
                    emit(line);
                }
            }
        }
    }

    join.await.context("Hashing manager failed")?;
    Ok(summary)
}

/// Read a JSON array of requests written by [`save_requests`]
pub fn load_requests(path: &Path) -> Result<Vec<WorkRequest>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read resume file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid resume file {}", path.display()))
}

/// Write requests as a pretty JSON array
pub fn save_requests(path: &Path, requests: &[WorkRequest]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(requests)?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write resume file {}", path.display()))
}
