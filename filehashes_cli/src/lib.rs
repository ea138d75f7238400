//! Command line front end for the filehashes engine
//!
//! The binary is a thin layer over [`orchestrators::hash_orchestrator`];
//! configuration loading and output formatting live here so they can be
//! tested without spawning the process.

pub mod config;
pub mod orchestrators;
pub mod output;
