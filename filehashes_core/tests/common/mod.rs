//! Shared helpers for the integration tests

#![allow(dead_code)]

use filehashes_core::{
    AlgorithmId, AlgorithmRegistry, Checksum, EngineConfig, Event, Manager, Message,
    MessageStream, TaskId,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Deterministic, non-repeating-per-block test content
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8 ^ (i >> 8) as u8).collect()
}

/// Write `pattern(len)` to `dir/name` and return the path with its content
pub fn write_pattern_file(dir: &Path, name: &str, len: usize) -> (PathBuf, Vec<u8>) {
    let path = dir.join(name);
    let data = pattern(len);
    std::fs::write(&path, &data).unwrap();
    (path, data)
}

pub fn test_manager(config: EngineConfig) -> (Manager, MessageStream) {
    Manager::new(config, Arc::new(AlgorithmRegistry::builtin()))
}

/// Checksums of `data` computed in one go, for comparison with task output
pub fn expected_checksums(data: &[u8], algorithms: &[AlgorithmId]) -> BTreeMap<AlgorithmId, Checksum> {
    let registry = AlgorithmRegistry::builtin();
    algorithms
        .iter()
        .map(|id| (id.clone(), registry.get(id).unwrap().hash_bytes(data).unwrap()))
        .collect()
}

/// Drain the stream until it ends, failing the test if that takes too long
pub async fn drain(stream: &mut MessageStream) -> Vec<Message> {
    let mut messages = Vec::new();
    loop {
        match tokio::time::timeout(Duration::from_secs(30), stream.recv()).await {
            Ok(Some(message)) => messages.push(message),
            Ok(None) => return messages,
            Err(_) => panic!("message stream stalled after {} messages", messages.len()),
        }
    }
}

/// Receive the next message, failing the test if none arrives in time
pub async fn next(stream: &mut MessageStream) -> Message {
    tokio::time::timeout(Duration::from_secs(30), stream.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("message stream ended early")
}

pub fn events_of(messages: &[Message], id: TaskId) -> Vec<&Event> {
    messages
        .iter()
        .filter(|message| message.task_id == Some(id))
        .map(|message| &message.event)
        .collect()
}

pub fn kinds_of(messages: &[Message], id: TaskId) -> Vec<&'static str> {
    events_of(messages, id).into_iter().map(Event::kind).collect()
}

pub fn progress_of(messages: &[Message], id: TaskId) -> Vec<u8> {
    events_of(messages, id)
        .into_iter()
        .filter_map(|event| match event {
            Event::ProgressUpdated(percent) => Some(*percent),
            _ => None,
        })
        .collect()
}

pub fn done_of(messages: &[Message], id: TaskId) -> Option<BTreeMap<AlgorithmId, Checksum>> {
    events_of(messages, id).into_iter().find_map(|event| match event {
        Event::Done(checksums) => Some(checksums.clone()),
        _ => None,
    })
}

/// Join the manager while draining its stream, returning every message
pub async fn finish(manager: Manager, mut stream: MessageStream) -> Vec<Message> {
    let collector = tokio::spawn(async move { drain(&mut stream).await });
    manager.join().await;
    collector.await.unwrap()
}
