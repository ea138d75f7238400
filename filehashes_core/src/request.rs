//! Work requests submitted to the manager

use crate::Result;
use crate::error::ValidationError;
use crate::hashing::{AlgorithmId, AlgorithmRegistry};
use crate::state::ResumeState;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// One file to hash, the algorithms to use, and optionally where to resume
///
/// Serialized as `{"file": ..., "hash_algs": [...], "stat": ResumeState | null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkRequest {
    #[serde(rename = "file")]
    file_path: PathBuf,
    #[serde(rename = "hash_algs")]
    algorithms: BTreeSet<AlgorithmId>,
    #[serde(rename = "stat", default)]
    resume_state: Option<ResumeState>,
}

impl WorkRequest {
    /// Create a request that hashes `file_path` from the beginning
    pub fn new<I, A>(file_path: impl Into<PathBuf>, algorithms: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<AlgorithmId>,
    {
        Self {
            file_path: file_path.into(),
            algorithms: algorithms.into_iter().map(Into::into).collect(),
            resume_state: None,
        }
    }

    /// Attach resume state to this request
    pub fn with_resume_state(mut self, state: ResumeState) -> Self {
        self.resume_state = Some(state);
        self
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn algorithms(&self) -> &BTreeSet<AlgorithmId> {
        &self.algorithms
    }

    pub fn resume_state(&self) -> Option<&ResumeState> {
        self.resume_state.as_ref()
    }

    pub fn is_resume(&self) -> bool {
        self.resume_state.is_some()
    }

    /// Same file and algorithms, continuing from `state`
    pub fn resumed_at(&self, state: ResumeState) -> Self {
        Self {
            file_path: self.file_path.clone(),
            algorithms: self.algorithms.clone(),
            resume_state: Some(state),
        }
    }

    /// Same file and algorithms, starting over from byte 0
    pub fn restarted(&self) -> Self {
        Self {
            file_path: self.file_path.clone(),
            algorithms: self.algorithms.clone(),
            resume_state: None,
        }
    }

    /// Validate everything that can be checked without touching the file
    ///
    /// Checks, in order: at least one algorithm, every algorithm registered,
    /// and, when resuming, the resume state covering exactly the requested
    /// algorithms and every algorithm being resumable.
    pub fn validate(&self, registry: &AlgorithmRegistry) -> Result<()> {
        if self.algorithms.is_empty() {
            return Err(ValidationError::NoHashAlgorithms.into());
        }

        let mut resolved = Vec::with_capacity(self.algorithms.len());
        for id in &self.algorithms {
            let algorithm = registry
                .get(id)
                .ok_or_else(|| ValidationError::algorithm_unavailable(id))?;
            resolved.push(algorithm);
        }

        let Some(state) = &self.resume_state else {
            return Ok(());
        };
        state.validate_against(&self.algorithms)?;
        match resolved.iter().find(|algorithm| !algorithm.supports_resume()) {
            Some(algorithm) => Err(ValidationError::resume_unsupported(&algorithm.id()).into()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for WorkRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithms: Vec<_> = self.algorithms.iter().map(AlgorithmId::as_str).collect();
        write!(
            f,
            "{} ({})",
            self.file_path.display(),
            algorithms.join(", ")
        )?;
        if let Some(state) = &self.resume_state {
            write!(f, " from byte {}", state.summed_size)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InternalError;
    use crate::hashing::{Accumulator, Checksum, HashAlgorithmImpl};
    use crate::state::StateBlob;
    use crate::Error;
    use std::collections::BTreeMap;

    /// Byte counter that cannot save its state
    struct CountOnly;

    struct CountAccumulator(u64);

    impl Accumulator for CountAccumulator {
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.0 += data.len() as u64;
            Ok(())
        }

        fn bytes_written(&self) -> u64 {
            self.0
        }

        fn final_checksum(&self) -> Checksum {
            Checksum::new(self.0.to_be_bytes())
        }

        fn export_state(&self) -> Result<Vec<u8>> {
            Err(InternalError::accumulator(&AlgorithmId::new("count"), "no state").into())
        }

        fn import_state(&mut self, _state: &[u8]) -> Result<()> {
            Err(InternalError::accumulator(&AlgorithmId::new("count"), "no state").into())
        }
    }

    impl HashAlgorithmImpl for CountOnly {
        fn id(&self) -> AlgorithmId {
            AlgorithmId::new("count")
        }

        fn display_name(&self) -> &'static str {
            "COUNT"
        }

        fn supports_resume(&self) -> bool {
            false
        }

        fn create_accumulator(&self) -> Box<dyn Accumulator> {
            Box::new(CountAccumulator(0))
        }
    }

    fn registry_with_count() -> AlgorithmRegistry {
        let mut registry = AlgorithmRegistry::builtin();
        registry.register(CountOnly);
        registry
    }

    fn state_for(ids: &[AlgorithmId]) -> ResumeState {
        let datas: BTreeMap<_, _> = ids
            .iter()
            .map(|id| (id.clone(), StateBlob::new(vec![0u8; 4])))
            .collect();
        ResumeState::new(0, 0, datas)
    }

    #[test]
    fn test_wire_format_without_state() {
        let request = WorkRequest::new("/data/a.iso", ["SHA1", "md5"]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["file"], "/data/a.iso");
        assert_eq!(json["hash_algs"], serde_json::json!(["md5", "sha1"]));
        assert!(json["stat"].is_null());
    }

    #[test]
    fn test_deserialize_front_end_request() {
        let request: WorkRequest = serde_json::from_str(
            r#"{"file": "/data/b.bin", "hash_algs": ["sha256"], "stat": null}"#,
        )
        .unwrap();

        assert_eq!(request.file_path(), Path::new("/data/b.bin"));
        assert!(request.algorithms().contains(&AlgorithmId::SHA256));
        assert!(!request.is_resume());
    }

    #[test]
    fn test_stat_field_is_optional() {
        let request: WorkRequest =
            serde_json::from_str(r#"{"file": "x", "hash_algs": ["crc32"]}"#).unwrap();
        assert!(request.resume_state().is_none());
    }

    #[test]
    fn test_validate_empty_algorithms() {
        let registry = AlgorithmRegistry::builtin();
        let request = WorkRequest::new("x", Vec::<AlgorithmId>::new());

        assert!(matches!(
            request.validate(&registry),
            Err(Error::Validation(ValidationError::NoHashAlgorithms))
        ));
    }

    #[test]
    fn test_validate_unknown_algorithm() {
        let registry = AlgorithmRegistry::builtin();
        let request = WorkRequest::new("x", ["sha1", "whirlpool"]);

        assert!(matches!(
            request.validate(&registry),
            Err(Error::Validation(ValidationError::AlgorithmUnavailable { .. }))
        ));
    }

    #[test]
    fn test_validate_resume_with_non_resumable_algorithm() {
        let registry = registry_with_count();
        let count = AlgorithmId::new("count");
        let request = WorkRequest::new("x", [count.clone(), AlgorithmId::SHA1])
            .with_resume_state(state_for(&[count.clone(), AlgorithmId::SHA1]));

        assert!(matches!(
            request.validate(&registry),
            Err(Error::Validation(ValidationError::ResumeUnsupported { algorithm })) if algorithm == count
        ));
    }

    #[test]
    fn test_key_mismatch_wins_over_non_resumable_algorithm() {
        let registry = registry_with_count();
        let request = WorkRequest::new("x", [AlgorithmId::new("count"), AlgorithmId::SHA1])
            .with_resume_state(state_for(&[AlgorithmId::SHA1]));

        assert!(matches!(
            request.validate(&registry),
            Err(Error::Validation(ValidationError::InvalidResumeState { .. }))
        ));
    }

    #[test]
    fn test_non_resumable_algorithm_without_state_is_valid() {
        let registry = registry_with_count();
        let request = WorkRequest::new("x", ["count", "md5"]);
        assert!(request.validate(&registry).is_ok());
    }

    #[test]
    fn test_validate_md5_resume() {
        let registry = AlgorithmRegistry::builtin();
        let request = WorkRequest::new("x", [AlgorithmId::MD5, AlgorithmId::SHA1])
            .with_resume_state(state_for(&[AlgorithmId::MD5, AlgorithmId::SHA1]));
        assert!(request.validate(&registry).is_ok());
    }

    #[test]
    fn test_validate_state_key_mismatch() {
        let registry = AlgorithmRegistry::builtin();
        let request = WorkRequest::new("x", [AlgorithmId::SHA1, AlgorithmId::SHA256])
            .with_resume_state(state_for(&[AlgorithmId::SHA1]));

        assert!(matches!(
            request.validate(&registry),
            Err(Error::Validation(ValidationError::InvalidResumeState { .. }))
        ));
    }

    #[test]
    fn test_resumed_and_restarted_keep_file_and_algorithms() {
        let request = WorkRequest::new("x", [AlgorithmId::SHA1]);
        let resumed = request.resumed_at(state_for(&[AlgorithmId::SHA1]));

        assert_eq!(resumed.file_path(), request.file_path());
        assert!(resumed.is_resume());
        assert_eq!(resumed.restarted(), request);
    }

    #[test]
    fn test_display() {
        let request = WorkRequest::new("/a.bin", ["sha1", "crc32"]);
        assert_eq!(request.to_string(), "/a.bin (crc32, sha1)");
    }
}
