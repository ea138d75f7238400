//! Command orchestrators
//!
//! Orchestrators sit between the CLI layer and the core manager: they build
//! requests from arguments, drive the message stream and report results.

pub mod hash_orchestrator;
