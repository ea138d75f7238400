//! filehashes core library
//!
//! Concurrent, cancellable and resumable file hashing. Callers submit
//! [`WorkRequest`]s to a [`Manager`] and drain the [`MessageStream`] it
//! returns. A task cancelled mid-file reports a `Stopped` message carrying
//! a request with a [`ResumeState`]; resubmitting it continues where the
//! first run left off.
//!
//! ```no_run
//! use filehashes_core::{AlgorithmId, AlgorithmRegistry, EngineConfig, Event, Manager, WorkRequest};
//! use std::sync::Arc;
//!
//! # async fn demo() {
//! let (manager, mut stream) = Manager::new(
//!     EngineConfig::default(),
//!     Arc::new(AlgorithmRegistry::builtin()),
//! );
//! manager.submit_one(WorkRequest::new("movie.mkv", [AlgorithmId::SHA256]));
//! manager.join().await;
//!
//! while let Some(message) = stream.recv().await {
//!     if let Event::Done(checksums) = message.event {
//!         println!("{checksums:?}");
//!     }
//! }
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hashing;
pub mod limiter;
pub mod manager;
pub mod message;
pub mod request;
pub mod state;
mod task;

pub use config::EngineConfig;
pub use error::{Error, Result};
pub use hashing::{Accumulator, AlgorithmId, AlgorithmRegistry, Checksum, HashAlgorithmImpl};
pub use limiter::{Limiter, LimiterPermit};
pub use manager::{Manager, TaskHandle};
pub use message::{Event, Message, MessageStream, TaskId};
pub use request::WorkRequest;
pub use state::{ResumeState, StateBlob};
