//! # skillmatch Storage
//!
//! Persistence layer for the matcher model: a single JSON file holding the
//! candidate population and the fitted scaler statistics, loaded whole into
//! memory on every query and rewritten atomically on every mutation.

pub mod model;

pub use model::{ModelFile, PersistedModel, MODEL_VERSION};
