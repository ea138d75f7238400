//! Resume state of an interrupted hashing task
//!
//! A [`ResumeState`] is everything needed to continue hashing a file
//! without re-reading the bytes already processed. The engine never stores
//! it; callers keep it between runs, typically as JSON:
//!
//! ```json
//! {"summed_size": "4194304", "progress": 40, "datas": {"sha1": "c2hhAW..."}}
//! ```

use crate::Result;
use crate::error::ValidationError;
use crate::hashing::AlgorithmId;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Snapshot of all accumulators of a stopped task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeState {
    /// Bytes already fed to the accumulators; also the resume offset
    #[serde(with = "u64_string")]
    pub summed_size: u64,
    /// Last progress percentage reported before stopping
    pub progress: u8,
    /// Exported accumulator state per algorithm
    #[serde(rename = "datas")]
    pub per_algorithm_state: BTreeMap<AlgorithmId, StateBlob>,
}

impl ResumeState {
    pub fn new(
        summed_size: u64,
        progress: u8,
        per_algorithm_state: BTreeMap<AlgorithmId, StateBlob>,
    ) -> Self {
        Self {
            summed_size,
            progress,
            per_algorithm_state,
        }
    }

    /// Check that this state covers exactly `algorithms` and is in range
    pub fn validate_against(&self, algorithms: &BTreeSet<AlgorithmId>) -> Result<()> {
        if self.progress > 100 {
            return Err(ValidationError::invalid_resume_state(format!(
                "progress {} is above 100",
                self.progress
            ))
            .into());
        }

        let missing: Vec<_> = algorithms
            .iter()
            .filter(|id| !self.per_algorithm_state.contains_key(*id))
            .map(AlgorithmId::as_str)
            .collect();
        let unexpected: Vec<_> = self
            .per_algorithm_state
            .keys()
            .filter(|id| !algorithms.contains(*id))
            .map(AlgorithmId::as_str)
            .collect();

        if missing.is_empty() && unexpected.is_empty() {
            return Ok(());
        }

        let mut reasons = Vec::new();
        if !missing.is_empty() {
            reasons.push(format!("missing state for {}", missing.join(", ")));
        }
        if !unexpected.is_empty() {
            reasons.push(format!("unexpected state for {}", unexpected.join(", ")));
        }
        Err(ValidationError::invalid_resume_state(reasons.join("; ")).into())
    }
}

/// Opaque exported accumulator state, base64 on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateBlob(Vec<u8>);

impl StateBlob {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for StateBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for StateBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

/// `u64` carried as a decimal string, so JavaScript front ends keep full precision
mod u64_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Text(String),
            Number(u64),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(text) => text.parse().map_err(de::Error::custom),
            Repr::Number(number) => Ok(number),
        }
    }
}
