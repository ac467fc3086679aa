//! On-disk model format and atomic save/load
//!
//! The whole model lives in one JSON file. Loads read the entire file;
//! saves serialize the entire store and replace the file through a
//! temp-file rename so readers never observe a partial write.

use atomicwrites::{AtomicFile, OverwriteBehavior::AllowOverwrite};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillmatch_core::{Error, Result, Scaler};
use skillmatch_engine::store::MIN_FIT_SIZE;
use skillmatch_engine::{Candidate, MatcherStore};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Format version written into every saved model
pub const MODEL_VERSION: &str = "2.0.0";

/// The serialized model as stored on disk
///
/// `scaler_mean`/`scaler_scale` are empty when the model was saved unfit
/// (fewer than two candidates) and must round-trip back to an unfit store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedModel {
    pub version: String,
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub scaler_mean: Vec<f64>,
    #[serde(default)]
    pub scaler_scale: Vec<f64>,
    pub saved_at: DateTime<Utc>,
}

impl PersistedModel {
    /// Snapshot a store; fields for an unfit store hold empty scaler vectors
    #[must_use]
    pub fn from_store(store: &MatcherStore) -> Self {
        let (scaler_mean, scaler_scale) = match store.scaler() {
            Some(scaler) if store.is_fitted() => {
                (scaler.mean().to_vec(), scaler.scale().to_vec())
            }
            _ => (Vec::new(), Vec::new()),
        };
        Self {
            version: MODEL_VERSION.to_string(),
            candidates: store.candidates().to_vec(),
            scaler_mean,
            scaler_scale,
            saved_at: Utc::now(),
        }
    }

    /// Reconstruct the in-memory store
    ///
    /// The scaler is rebuilt only when both persisted vectors are non-empty;
    /// otherwise the store comes back unfit.
    pub fn into_store(self) -> Result<MatcherStore> {
        let scaler = if !self.scaler_mean.is_empty() && !self.scaler_scale.is_empty() {
            Some(Scaler::from_parts(&self.scaler_mean, &self.scaler_scale)?)
        } else {
            None
        };
        Ok(MatcherStore::from_parts(self.candidates, scaler))
    }
}

/// Handle to the single persisted model location
#[derive(Debug, Clone)]
pub struct ModelFile {
    path: PathBuf,
}

impl ModelFile {
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the whole model into memory
    pub fn load(&self) -> Result<MatcherStore> {
        if !self.path.exists() {
            return Err(Error::NotFound(self.path.display().to_string()));
        }
        let bytes = std::fs::read(&self.path)?;
        let model: PersistedModel = serde_json::from_slice(&bytes)
            .map_err(|e| Error::CorruptModel(e.to_string()))?;
        let store = model.into_store()?;
        debug!(
            path = %self.path.display(),
            candidates = store.len(),
            fitted = store.is_fitted(),
            "loaded model"
        );
        Ok(store)
    }

    /// Load the model, or start a fresh empty store when none exists yet
    pub fn load_or_create(&self) -> Result<MatcherStore> {
        match self.load() {
            Ok(store) => Ok(store),
            Err(Error::NotFound(_)) => {
                debug!(path = %self.path.display(), "no existing model, starting empty");
                Ok(MatcherStore::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Persist the store, fitting it first when possible
    ///
    /// A stale store with enough candidates is refit so the saved scaler
    /// always matches the saved population; an undersized store is written
    /// with empty scaler fields.
    pub fn save(&self, store: &mut MatcherStore) -> Result<()> {
        if !store.is_fitted() && store.len() >= MIN_FIT_SIZE {
            store.fit()?;
        }
        let model = PersistedModel::from_store(store);
        let bytes = serde_json::to_vec_pretty(&model)
            .map_err(|e| Error::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        AtomicFile::new(&self.path, AllowOverwrite)
            .write(|f| f.write_all(&bytes))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(err) | atomicwrites::Error::User(err) => {
                    Error::Io(err)
                }
            })?;
        debug!(
            path = %self.path.display(),
            candidates = store.len(),
            fitted = store.is_fitted(),
            "saved model"
        );
        Ok(())
    }
}
